//! Small helpers: opaque message errors and deferred-call logging.

use core::fmt;
use std::error::Error as StdError;

/// A plain message error, used for opaque causes reconstructed from decoded
/// documents and as a lightweight chain terminator.
///
/// # Examples
///
/// ```
/// use error_loom::{str_error, Error};
///
/// let err = Error::untraced().with_op("fetch").with_cause(str_error("boom"));
/// assert!(err.to_string().contains("cause [boom]"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrError(String);

impl StrError {
    pub fn new(text: impl Into<String>) -> Self {
        StrError(text.into())
    }
}

impl fmt::Display for StrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for StrError {}

/// Creates a plain message error.
pub fn str_error(text: impl Into<String>) -> StrError {
    StrError::new(text)
}

/// Runs the given fallible function and discards its error. Useful for
/// cleanup calls whose failure carries no information.
pub fn ignore<T, E>(f: impl FnOnce() -> Result<T, E>) {
    let _ = f();
}

/// Runs the given fallible function and logs its error, if any, through
/// `tracing`. Useful for cleanup calls that should not fail silently.
#[cfg(feature = "tracing")]
pub fn log<T, E>(f: impl FnOnce() -> Result<T, E>)
where
    E: fmt::Display,
{
    if let Err(err) = f() {
        tracing::error!(error = %err, "deferred call returned an error");
    }
}
