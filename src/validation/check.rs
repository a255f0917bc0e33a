//! Ordered predicate checks and the result type shared by every validator.
//!
//! Each entity declares a fixed list of [`Check`]s. Checks run in declaration
//! order and the first failing one decides the error message; callers and
//! tests rely on that precedence.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single named constraint with a fixed failure message.
pub struct Check<T> {
    /// Stable identifier used in logs and metrics.
    pub name: &'static str,
    /// Human-readable message reported when the check fails.
    pub message: &'static str,
    /// Returns `true` when the value satisfies the constraint.
    pub passes: fn(&T) -> bool,
}

/// The first failed check of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub check: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    /// Error used when the input could not even be read into the expected shape.
    pub fn malformed(message: &'static str) -> Self {
        Self {
            check: "shape",
            message,
        }
    }
}

/// Run `checks` against `value`, stopping at the first failure.
pub fn run_checks<T>(checks: &[Check<T>], value: &T) -> Result<(), ValidationError> {
    match checks.iter().find(|check| !(check.passes)(value)) {
        Some(check) => Err(ValidationError {
            check: check.name,
            message: check.message,
        }),
        None => Ok(()),
    }
}

/// Read an untyped value into `T`, mapping any shape error to `fallback`.
pub(crate) fn read_value<T: DeserializeOwned>(
    value: &Value,
    fallback: &'static str,
) -> Result<T, ValidationError> {
    T::deserialize(value).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed input");
        ValidationError::malformed(fallback)
    })
}

/// `deserialize_with` for optional fields that may be absent but not `null`.
///
/// Pair with `#[serde(default)]` so an absent field still reads as `None`.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Outcome reported to API callers: `success` or an `error` message, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for ValidationResult {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::fail(e.message),
        }
    }
}

/// `true` when every character of `s` satisfies `allowed`.
pub(crate) fn all_chars(s: &str, allowed: fn(char) -> bool) -> bool {
    s.chars().all(allowed)
}

/// Length in characters, not bytes.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
