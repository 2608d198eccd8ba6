use std::fmt::Display;

use thiserror::Error;

/// Result type returned from functions that can have our `Error`s.
pub type Result<T, E = FunkeysError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FunkeysError {
    /// The external attribute could not be read or written.
    #[error("Attribute {attribute} is unavailable: {reason}")]
    AttributeUnavailable { attribute: String, reason: String },

    /// `min`/`max`/`steps` do not describe a usable scale.
    #[error("Degenerate range: min {min}, max {max}, steps {steps}")]
    DegenerateRange { min: f64, max: f64, steps: i64 },

    /// The logarithm of a value that is not strictly positive was requested.
    #[error("Value {0} is not positive and has no logarithmic step")]
    NonPositiveValue(i64),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("{0}")]
    DBus(#[from] zbus::Error),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub(crate) trait ResultExt<T> {
    /// Turn any error into [`FunkeysError::AttributeUnavailable`] for `attribute`.
    fn unavailable(self, attribute: &str) -> Result<T>;
}

impl<T, E: Display> ResultExt<T> for std::result::Result<T, E> {
    fn unavailable(self, attribute: &str) -> Result<T> {
        self.map_err(|e| FunkeysError::AttributeUnavailable {
            attribute: attribute.to_string(),
            reason: e.to_string(),
        })
    }
}
