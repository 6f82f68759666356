//! Error classification.
//!
//! A [`Kind`] is a coarse-grained category attached to an error, such as
//! [`Kind::IO`] or [`Kind::NOT_FOUND`]. Kinds are string-valued so that they
//! survive serialization and can be reconstructed from decoded documents.
//!
//! # Examples
//!
//! ```
//! use error_loom::{Error, Kind};
//!
//! let err = Error::untraced().with_op("download").with_kind(Kind::IO);
//! assert_eq!(err.kind(), Kind::IO);
//! assert_eq!(Kind::IO.to_string(), "I/O error");
//! ```

use core::fmt;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A coarse-grained error category.
///
/// Use the predefined associated constants where possible; [`Kind::new`]
/// creates ad-hoc kinds (decoding a serialized error produces these, since
/// the wire format only carries the kind text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// Unclassified error. This is the baseline returned by
    /// [`Error::kind`](crate::Error::kind) when no kind is set anywhere in
    /// the cause chain.
    pub const OTHER: Kind = Kind::from_static("unclassified error");
    /// The functionality is not yet implemented.
    pub const NOT_IMPLEMENTED: Kind = Kind::from_static("not implemented");
    /// Invalid operation for this type of item.
    pub const INVALID: Kind = Kind::from_static("invalid");
    /// Permission denied.
    pub const PERMISSION: Kind = Kind::from_static("permission denied");
    /// External I/O error such as network failure.
    pub const IO: Kind = Kind::from_static("I/O error");
    /// Item already exists.
    pub const EXIST: Kind = Kind::from_static("item already exists");
    /// Item does not exist. Also see [`Kind::NOT_FOUND`].
    pub const NOT_EXIST: Kind = Kind::from_static("item does not exist");
    /// Item should exist but cannot be found. Also see [`Kind::NOT_EXIST`].
    pub const NOT_FOUND: Kind = Kind::from_static("item cannot be found");
    /// Generic internal error.
    pub const INTERNAL: Kind = Kind::from_static("internal error");
    /// The service cannot handle the request temporarily.
    pub const UNAVAILABLE: Kind = Kind::from_static("service unavailable");
    /// The operation was cancelled.
    pub const CANCELLED: Kind = Kind::from_static("operation cancelled");
    /// The operation timed out.
    pub const TIMEOUT: Kind = Kind::from_static("operation timed out");
    /// Not an actual error, but a warning that something might be wrong.
    pub const WARN: Kind = Kind::from_static("warning");

    const fn from_static(text: &'static str) -> Self {
        Kind(Cow::Borrowed(text))
    }

    /// Creates an ad-hoc kind from arbitrary text.
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Kind(Cow::Owned(text.into()))
    }

    /// Returns the kind text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Kind {
    fn from(text: &'static str) -> Self {
        Kind(Cow::Borrowed(text))
    }
}

impl From<String> for Kind {
    fn from(text: String) -> Self {
        Kind(Cow::Owned(text))
    }
}
