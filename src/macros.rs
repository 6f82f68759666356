//! Construction macros.
//!
//! - [`err!`](crate::err) builds an [`Error`](crate::Error) from optional
//!   `op:`/`kind:`/`default_kind:`/`cause:` clauses and `key => value`
//!   context pairs, in any mix.
//! - [`fields!`](macro@crate::fields) builds a token list for
//!   [`Error::with_fields`](crate::Error::with_fields) or
//!   [`FieldMap::append`](crate::FieldMap::append).
//!
//! # Examples
//!
//! ```
//! use error_loom::{err, Kind};
//!
//! let file = "f.txt";
//! let err = err!(op: "download", kind: Kind::IO, "file" => file);
//! assert_eq!(err.op(), "download");
//! assert_eq!(err.kind(), Kind::IO);
//! ```

/// Builds an [`Error`](crate::Error), capturing a stack trace unless
/// capture is disabled.
///
/// Accepts, in order, optional `op:`, `kind:`, `default_kind:` and `cause:`
/// clauses followed by any number of `key => value` pairs. Values go
/// through [`json!`](macro@crate::json), so anything serializable works.
///
/// # Examples
///
/// ```
/// use error_loom::{err, Kind};
///
/// let inner = err!(op: "read", kind: Kind::NOT_EXIST);
/// let outer = err!(op: "load config", cause: inner, "path" => "/etc/app.toml");
/// assert_eq!(outer.kind(), Kind::NOT_EXIST);
/// ```
#[macro_export]
macro_rules! err {
    () => {
        $crate::Error::new()
    };
    ($($clause:tt)+) => {
        $crate::__err_clauses!($crate::Error::new(); $($clause)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __err_clauses {
    ($e:expr;) => { $e };
    ($e:expr; op: $op:expr $(, $($rest:tt)*)?) => {
        $crate::__err_clauses!($e.with_op($op); $($($rest)*)?)
    };
    ($e:expr; kind: $kind:expr $(, $($rest:tt)*)?) => {
        $crate::__err_clauses!($e.with_kind($kind); $($($rest)*)?)
    };
    ($e:expr; default_kind: $kind:expr $(, $($rest:tt)*)?) => {
        $crate::__err_clauses!($e.with_default_kind($kind); $($($rest)*)?)
    };
    ($e:expr; cause: $cause:expr $(, $($rest:tt)*)?) => {
        $crate::__err_clauses!($e.with_cause($cause); $($($rest)*)?)
    };
    ($e:expr; $key:literal => $val:expr $(, $($rest:tt)*)?) => {
        $crate::__err_clauses!($e.with($key, $crate::json!($val)); $($($rest)*)?)
    };
}

/// Builds a `Vec` of field tokens for
/// [`Error::with_fields`](crate::Error::with_fields) or
/// [`FieldMap::append`](crate::FieldMap::append). Tokens alternate between
/// keys and values; a trailing key without a value is stored with the
/// `"<missing>"` sentinel.
///
/// # Examples
///
/// ```
/// use error_loom::{fields, Error};
///
/// let err = Error::untraced().with_fields(fields!["file", "f.txt", "attempt", 3]);
/// assert_eq!(err.get_field("attempt").as_deref(), Some("3"));
/// ```
#[macro_export]
macro_rules! fields {
    ($($token:expr),* $(,)?) => {
        ::std::vec![$($crate::json!($token)),*]
    };
}
