//! Crate-wide error type.

use thiserror::Error;

/// Errors reported by the fallible entry points of this crate.
///
/// Undefined densities met while sampling are not errors: the sampler turns
/// them into rejections and never surfaces them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration value or model argument is out of its domain.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for building an [`Error::InvalidParameters`].
pub(crate) fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidParameters(msg.into())
}
