//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use error_loom::prelude::*;
//!
//! fn read_config(path: &str) -> Result<String, Error> {
//!     std::fs::read_to_string(path)
//!         .map_err(|e| err!(op: "read config", kind: Kind::IO, cause: e, "path" => path))
//! }
//! ```

pub use crate::{err, fields, json};

pub use crate::config::Config;
pub use crate::error::{wrap, Cause, Error};
pub use crate::fields::FieldMap;
pub use crate::kind::Kind;
pub use crate::list::ErrorList;
pub use crate::util::str_error;
pub use crate::Value;
