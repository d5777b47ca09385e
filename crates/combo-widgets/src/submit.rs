#![forbid(unsafe_code)]

//! Submission validation and host notification.
//!
//! Submitting checks the field's value for exact, case-sensitive membership
//! in the reference list and reports the outcome through a host-provided
//! [`Notifier`] exactly once. A failed validation is an ordinary outcome,
//! not an `Err`: the host always gets a message to show.

use std::fmt;

/// Message sent when the value is not a reference entry.
pub const INVALID_SUBMISSION_MESSAGE: &str = "Please submit a valid country from the autocomplete.";

/// Prefix of the message sent for an accepted value.
pub const SUBMITTING_PREFIX: &str = "Submitting country ";

/// Host alerting collaborator.
pub trait Notifier {
    /// Deliver one user-facing message.
    fn notify(&mut self, message: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn notify(&mut self, message: &str) {
        self(message);
    }
}

/// Notifier that keeps every message, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNotifier {
    messages: Vec<String>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Forget recorded messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Why a submitted value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The field was empty.
    Empty,
    /// The value is not exactly one of the reference entries.
    NotInReference {
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(INVALID_SUBMISSION_MESSAGE)
    }
}

impl std::error::Error for ValidationError {}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The value matched this reference entry exactly.
    Accepted {
        /// The matched entry.
        entry: String,
    },
    /// The value failed validation.
    Rejected(ValidationError),
}

impl SubmitOutcome {
    /// Validate `value` with `is_member` as the exact-membership test.
    pub fn validate(value: &str, is_member: impl FnOnce(&str) -> bool) -> Self {
        if value.is_empty() {
            Self::Rejected(ValidationError::Empty)
        } else if is_member(value) {
            Self::Accepted {
                entry: value.to_string(),
            }
        } else {
            Self::Rejected(ValidationError::NotInReference {
                value: value.to_string(),
            })
        }
    }

    /// The user-facing message for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Accepted { entry } => format!("{SUBMITTING_PREFIX}{entry}"),
            Self::Rejected(err) => err.to_string(),
        }
    }

    /// True for [`SubmitOutcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}
