//! Validation error types

use std::fmt;

/// Validation error for note input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent from the request
    Missing { field: &'static str },

    /// Field is empty (or only whitespace) when it shouldn't be
    Empty { field: &'static str },

    /// Field present but of the wrong JSON type
    InvalidType { field: &'static str, expected: &'static str },

    /// Value outside a closed set
    InvalidVariant { field: &'static str, value: String },
}

impl ValidationError {
    /// Dotted path of the offending field (e.g. `tags.label`)
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::Empty { field }
            | Self::InvalidType { field, .. }
            | Self::InvalidVariant { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidType { field, expected } => write!(f, "{} must be {}", field, expected),
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
