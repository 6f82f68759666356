//! Structured error values with operations, kinds, ordered context fields
//! and coalesced stack traces.
//!
//! An [`Error`] carries:
//!
//! - an **operation**: a short label naming the action that failed,
//! - a **[`Kind`]**: a coarse classification that is resolved through the
//!   cause chain (an explicit kind anywhere in the chain beats any default),
//! - a **cause**: the wrapped underlying error, forming a chain,
//! - **context fields**: arbitrary key/value pairs in insertion order,
//! - a **stack trace** captured at creation time; when nested errors carry
//!   their own traces, rendering merges them into one de-duplicated trace.
//!
//! Errors serialize to JSON and deserialize back with their exact field
//! order intact, even though JSON objects are nominally unordered.
//!
//! # Examples
//!
//! ## Building and formatting
//!
//! ```
//! use error_loom::{err, Kind};
//!
//! let cause = std::io::Error::other("connection reset");
//! let err = err!(op: "download", kind: Kind::IO, cause: cause, "file" => "f.txt");
//!
//! assert_eq!(
//!     err.format_error(false, &[]),
//!     "op [download] kind [I/O error] file [f.txt] cause [connection reset]"
//! );
//! ```
//!
//! ## Kind inheritance
//!
//! ```
//! use error_loom::{err, Kind};
//!
//! let inner = err!(kind: Kind::TIMEOUT);
//! let outer = err!(op: "fetch", default_kind: Kind::INVALID, cause: inner);
//! // the nested explicit kind overrides the outer default
//! assert_eq!(outer.kind(), Kind::TIMEOUT);
//! ```
//!
//! ## Order-preserving JSON round trip
//!
//! ```
//! use error_loom::Error;
//!
//! let json = r#"{"op":"download","b":2,"a":1}"#;
//! let err = Error::from_json(json).unwrap();
//! assert_eq!(err.to_json().unwrap(), r#"{"op":"download","kind":"unclassified error","b":2,"a":1}"#);
//! ```

/// Rendering and serialization configuration.
pub mod config;
/// The structured error value and its cause chain.
pub mod error;
/// Insertion-ordered key/value context store.
pub mod fields;
/// Error classification kinds.
pub mod kind;
/// Error aggregation lists.
pub mod list;
/// Construction macros.
pub mod macros;
/// Convenience re-exports for quick starts.
pub mod prelude;
/// Call-stack capture and coalescing.
pub mod stack;
/// Opaque message errors and deferred-call helpers.
pub mod util;

mod format;
mod json;

pub use config::{Config, DEFAULT_FIELD_ORDER};
pub use error::{wrap, Cause, Error};
pub use fields::{Field, FieldMap, MISSING_VALUE};
pub use kind::Kind;
pub use list::ErrorList;
pub use stack::{capture_stacks, set_capture_stacks, Frame};
pub use util::{ignore, str_error, StrError};

#[cfg(feature = "tracing")]
pub use util::log;

// field values are plain JSON values; `json!` is the easiest way to build
// them from arbitrary serializable data
pub use serde_json::{json, Value};
