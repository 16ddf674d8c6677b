//! # Action Descriptor
//!
//! The structured description of an operation an agent wants to perform.

use serde::{Deserialize, Serialize};

/// A proposed operation under review.
///
/// `command` is what the evaluator inspects. `context` records why the action
/// was proposed; it is carried into the ledger for auditors but never
/// evaluated. Both fields are private so a descriptor cannot change after it
/// has been evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDescriptor {
    command: String,
    #[serde(default)]
    context: String,
}

impl ActionDescriptor {
    /// Describe an action.
    pub fn new(command: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            context: context.into(),
        }
    }

    /// The operation to perform, as free text.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Why the operation was proposed.
    pub fn context(&self) -> &str {
        &self.context
    }
}
