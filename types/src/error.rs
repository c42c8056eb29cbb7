//! The stable error-code taxonomy surfaced with every engine error.
//!
//! Each engine crate defines its own `thiserror` enum; every variant maps to
//! exactly one of these codes via a `code()` accessor. The calling layer maps
//! codes to transport responses — the engines know nothing about transport.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable error class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The targeted user/veto/flag/ban/fact does not exist.
    NotFound,
    /// The action was already applied or conflicts with current state.
    Conflict,
    /// The request itself is malformed (empty reason, bad vote value, ...).
    Validation,
    /// The caller is not allowed to perform this action.
    PermissionDenied,
    /// The feature is switched off by configuration.
    FeatureDisabled,
    /// A capacity limit (e.g. moderator slots) is exhausted.
    CapacityExceeded,
    /// The storage backend failed; the call may be retried.
    Internal,
}

impl ErrorCode {
    /// The wire-stable code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Validation => "VALIDATION_ERROR",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::FeatureDisabled => "FEATURE_DISABLED",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
