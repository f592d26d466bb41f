//! # Error Types
//!
//! Defines the codec and validation errors shared across crates.

use thiserror::Error;

/// Errors raised while decoding or encoding entity and network configs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// No codec is registered for the entity type or network config kind.
    #[error("no codec registered for {0}")]
    UnregisteredType(String),

    /// The config bytes are not a valid encoding of the registered model.
    #[error("failed to decode {type_name}: {message}")]
    Decode { type_name: String, message: String },

    /// The config value could not be encoded.
    #[error("failed to encode {type_name}: {message}")]
    Encode { type_name: String, message: String },

    /// The config decoded but failed model validation.
    #[error("invalid {type_name}: {source}")]
    Invalid {
        type_name: String,
        #[source]
        source: ValidationError,
    },
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path} in body {reason}")]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `records.0.domain`.
    pub path: String,
    /// Human readable reason.
    pub reason: String,
}

impl FieldViolation {
    /// Create a violation for `path`.
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the path with a parent field name.
    pub fn nested_under(mut self, parent: &str) -> Self {
        self.path = format!("{}.{}", parent, self.path);
        self
    }
}

/// Composite validation failure carrying every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failure list: {}", join_violations(.violations))]
pub struct ValidationError {
    /// All violations, in field order.
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Return `Ok(())` when nothing was collected.
    pub fn from_violations(violations: Vec<FieldViolation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    /// Whether a violation was recorded for `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
