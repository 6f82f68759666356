//! The structured error value.
//!
//! [`Error`] carries an operation name, a classification [`Kind`], a causal
//! chain, ordered key/value context and an optionally captured call stack.
//! Values are built with the builder methods (or the [`err!`](crate::err)
//! macro) and are meant to be treated as immutable once published.
//!
//! # Examples
//!
//! ```
//! use error_loom::{Error, Kind};
//!
//! let cause = std::io::Error::other("connection reset");
//! let err = Error::untraced()
//!     .with_op("download")
//!     .with_kind(Kind::IO)
//!     .with_cause(cause)
//!     .with("file", "f.txt");
//!
//! assert_eq!(
//!     err.format_error(false, &[]),
//!     "op [download] kind [I/O error] file [f.txt] cause [connection reset]"
//! );
//! ```

use crate::config::Config;
use crate::fields::{value_text, FieldMap, MISSING_VALUE};
use crate::format;
use crate::kind::Kind;
use crate::stack::{capture_stacks, combine_traces, Frame, Stack};
use crate::util::StrError;
use core::fmt;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;

/// The wrapped underlying error of an [`Error`]: either another structured
/// error (continuing the chain) or an opaque external error (terminating
/// it).
#[derive(Debug, Clone)]
pub enum Cause {
    /// A nested structured error.
    Structured(Box<Error>),
    /// An opaque external error.
    Opaque(Arc<dyn StdError + Send + Sync + 'static>),
}

impl Cause {
    /// Returns the nested structured error, if this cause is one.
    #[inline]
    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Cause::Structured(e) => Some(e),
            Cause::Opaque(_) => None,
        }
    }

    pub(crate) fn as_dyn(&self) -> &(dyn StdError + 'static) {
        match self {
            Cause::Structured(e) => e.as_ref(),
            Cause::Opaque(e) => e.as_ref(),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Structured(e) => f.write_str(&e.format_error(false, &[])),
            Cause::Opaque(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// A structured error value.
///
/// All parts are optional; a value with none of them set is "zero" and
/// renders as nothing when nested as a cause.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Error {
    pub(crate) op: Option<String>,
    pub(crate) kind: Option<Kind>,
    pub(crate) default_kind: Option<Kind>,
    pub(crate) cause: Option<Cause>,
    pub(crate) fields: FieldMap,
    pub(crate) stack: Option<Stack>,
    /// Set exactly when the error was produced by decoding: the captured
    /// text does not correspond to the execution point that renders it.
    pub(crate) ignore_stack: bool,
    pub(crate) decoded_stacktrace: Option<String>,
}

impl Error {
    /// Creates an empty error, capturing the current call stack unless
    /// capture is disabled via
    /// [`set_capture_stacks`](crate::set_capture_stacks).
    pub fn new() -> Self {
        let mut e = Error::default();
        if capture_stacks() {
            e.stack = Some(Stack::capture());
        }
        e
    }

    /// Creates an empty error without capturing a stack. Use where the
    /// trace is not desired regardless of the global capture setting.
    pub fn untraced() -> Self {
        Error::default()
    }

    /// An empty error produced by decoding: never carries a live stack.
    pub(crate) fn decoded() -> Self {
        Error {
            ignore_stack: true,
            ..Error::default()
        }
    }

    /// Sets the operation. An empty string is ignored.
    ///
    /// The op should name the action that failed, e.g. "download" or "load
    /// config" - not an error message like "download failed": the fact that
    /// the operation failed is implied by the error itself.
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        let op = op.into();
        if !op.is_empty() {
            self.op = Some(op);
        }
        self
    }

    /// Sets the explicit kind. An empty kind is ignored.
    pub fn with_kind(mut self, kind: impl Into<Kind>) -> Self {
        let kind = kind.into();
        if !kind.as_str().is_empty() {
            self.kind = Some(kind);
        }
        self
    }

    /// Sets the fallback kind, consulted only when no explicit kind is
    /// found anywhere in the cause chain. See [`Error::kind`].
    pub fn with_default_kind(mut self, kind: impl Into<Kind>) -> Self {
        self.default_kind = Some(kind.into());
        self
    }

    /// Sets the underlying cause. A cause that is itself an [`Error`]
    /// continues the structured chain; any other error terminates it as an
    /// opaque cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(cause);
        self.cause = Some(match boxed.downcast::<Error>() {
            Ok(e) => Cause::Structured(e),
            Err(other) => Cause::Opaque(Arc::from(other)),
        });
        self
    }

    pub(crate) fn with_cause_value(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Upserts a context field.
    ///
    /// The structural keys `"op"`, `"kind"` and `"cause"` are never stored
    /// as ordinary entries; they are routed to the dedicated setters (a
    /// string value for `"cause"` becomes an opaque cause).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "op" => {
                if let Value::String(op) = value {
                    self = self.with_op(op);
                }
            }
            "kind" => self = self.with_kind(Kind::new(value_text(&value))),
            "cause" => {
                if !value.is_null() {
                    self = self.with_cause(StrError::new(value_text(&value)));
                }
            }
            _ => self.fields.set(key, value),
        }
        self
    }

    /// Appends context fields from alternating key/value tokens, with the
    /// same semantics as [`FieldMap::append`]: a trailing key with no value
    /// is stored with the `"<missing>"` sentinel, and duplicate keys may
    /// coexist. Structural keys are routed like in [`Error::with`].
    pub fn with_fields<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut tokens = tokens.into_iter();
        while let Some(key) = tokens.next() {
            let key = value_text(&key);
            match tokens.next() {
                None => self
                    .fields
                    .push(key, Value::String(MISSING_VALUE.into())),
                Some(value) => match key.as_str() {
                    "op" => {
                        if let Value::String(op) = value {
                            self = self.with_op(op);
                        }
                    }
                    "kind" => self = self.with_kind(Kind::new(value_text(&value))),
                    "cause" => {
                        if !value.is_null() {
                            self = self.with_cause(StrError::new(value_text(&value)));
                        }
                    }
                    _ => self.fields.push(key, value),
                },
            }
        }
        self
    }

    /// Returns the operation, or `""` if none is set.
    #[inline]
    pub fn op(&self) -> &str {
        self.op.as_deref().unwrap_or("")
    }

    /// Resolves the effective kind.
    ///
    /// An explicit kind at any depth of the structured cause chain takes
    /// precedence over any default kind; when only defaults are set, the
    /// innermost visited default wins. Falls back to [`Kind::OTHER`].
    pub fn kind(&self) -> Kind {
        self.effective_kind(Kind::OTHER)
    }

    fn effective_kind(&self, mut default: Kind) -> Kind {
        if let Some(kind) = &self.kind {
            return kind.clone();
        }
        if let Some(fallback) = &self.default_kind {
            default = fallback.clone();
        }
        if let Some(Cause::Structured(inner)) = &self.cause {
            return inner.effective_kind(default);
        }
        default
    }

    /// Returns the cause, if any.
    #[inline]
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Returns a reference to the context fields.
    #[inline]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Retrieves the field with the given key as a string, searching this
    /// error first and then, recursively, its structured causes. The keys
    /// `"op"`, `"kind"` and `"cause"` resolve to the structural parts.
    pub fn get_field(&self, key: &str) -> Option<String> {
        let mut current = self;
        loop {
            match key {
                "op" => {
                    if let Some(op) = &current.op {
                        return Some(op.clone());
                    }
                }
                "kind" => return Some(current.kind().to_string()),
                "cause" => {
                    if let Some(cause) = &current.cause {
                        return Some(cause.to_string());
                    }
                }
                _ => {
                    if let Some(value) = current.fields.get(key) {
                        return Some(value_text(value));
                    }
                }
            }
            match current.cause.as_ref().and_then(Cause::as_error) {
                Some(inner) => current = inner,
                None => return None,
            }
        }
    }

    /// True if no op, kind, cause or fields are set.
    pub fn is_zero(&self) -> bool {
        self.op.is_none() && self.kind.is_none() && self.cause.is_none() && self.fields.is_empty()
    }

    /// The textual stack snapshot carried over from a decoded document, if
    /// any. Display-only: it is never merged or re-resolved.
    #[inline]
    pub fn decoded_stacktrace(&self) -> Option<&str> {
        self.decoded_stacktrace.as_deref()
    }

    /// True if this error or any structured cause carries a live stack.
    pub fn has_stack(&self) -> bool {
        if self.stack.is_some() {
            return true;
        }
        match self.cause.as_ref().and_then(Cause::as_error) {
            Some(inner) => inner.has_stack(),
            None => false,
        }
    }

    /// The coalesced trace: this error's frames merged with the cause
    /// chain's, de-duplicating the shared trailing run at every level.
    pub(crate) fn coalesced_frames(&self) -> Vec<Frame> {
        let own: &[Frame] = self.stack.as_ref().map(Stack::frames).unwrap_or(&[]);
        match self.cause.as_ref().and_then(Cause::as_error) {
            Some(inner) => combine_traces(own, &inner.coalesced_frames()),
            None => own.to_vec(),
        }
    }

    /// Removes the top `n` frames of the captured stack, anchoring the
    /// trace at the true logical call site of a wrapping helper.
    pub fn drop_stack_frames(mut self, n: usize) -> Self {
        if let Some(stack) = &mut self.stack {
            stack.drop_frames(n);
        }
        self
    }

    /// Returns a copy of this error with the stack removed from it and from
    /// all structured causes, including any decoded snapshot and literal
    /// `stacktrace`/`remote_stack` context fields. The copy shares no field
    /// storage with the original.
    pub fn clear_stacktrace(&self) -> Error {
        let mut clone = self.clone();
        clone.stack = None;
        clone.decoded_stacktrace = None;
        clone.fields.delete("stacktrace");
        clone.fields.delete("remote_stack");
        if let Some(Cause::Structured(inner)) = &self.cause {
            clone.cause = Some(Cause::Structured(Box::new(inner.clear_stacktrace())));
        }
        clone
    }

    /// Compares this error against `other`: every part set on `self` must
    /// equal the corresponding part of `other` (kind is compared against
    /// `other`'s effective kind); parts present only on `other` are
    /// ignored. Causes recurse; opaque causes compare by display string.
    pub fn matches(&self, other: &Error) -> bool {
        if let Some(op) = &self.op {
            if other.op.as_deref() != Some(op) {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if *kind != other.kind() {
                return false;
            }
        }
        for field in self.fields.iter() {
            if other.fields.get(&field.key) != Some(&field.value) {
                return false;
            }
        }
        match &self.cause {
            None => true,
            Some(cause) => match &other.cause {
                None => false,
                Some(other_cause) => causes_match(cause, other_cause),
            },
        }
    }

    /// True if this error or any structured cause resolves to the expected
    /// kind.
    pub fn is_kind(&self, expected: &Kind) -> bool {
        let mut current = self;
        loop {
            if current.kind() == *expected {
                return true;
            }
            match current.cause.as_ref().and_then(Cause::as_error) {
                Some(inner) => current = inner,
                None => return false,
            }
        }
    }

    /// The innermost structured error of the chain.
    pub fn root(&self) -> &Error {
        let mut current = self;
        while let Some(inner) = current.cause.as_ref().and_then(Cause::as_error) {
            current = inner;
        }
        current
    }

    /// The first nested cause that is not a structured error, if any.
    pub fn root_cause(&self) -> Option<&(dyn StdError + 'static)> {
        match self.root().cause.as_ref() {
            Some(Cause::Opaque(e)) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Renders this error with the given configuration, including the stack
    /// trace when the configuration allows it.
    pub fn render(&self, config: &Config) -> String {
        format::render(self, config, true, None)
    }

    /// Renders this error with the default configuration, printing fields
    /// according to `field_order` (empty means the default order). The
    /// stack trace (if available) is printed iff `print_stack` is true.
    pub fn format_error(&self, print_stack: bool, field_order: &[&str]) -> String {
        let order = if field_order.is_empty() {
            None
        } else {
            Some(field_order)
        };
        format::render(self, &Config::default(), print_stack, order)
    }
}

fn causes_match(a: &Cause, b: &Cause) -> bool {
    match (a, b) {
        (Cause::Structured(e1), Cause::Structured(e2)) => e1.matches(e2),
        (Cause::Opaque(e1), Cause::Opaque(e2)) => e1.to_string() == e2.to_string(),
        // an opaque expectation may be satisfied deeper in the structured
        // chain
        (Cause::Opaque(_), Cause::Structured(e2)) => match &e2.cause {
            Some(inner) => causes_match(a, inner),
            None => false,
        },
        (Cause::Structured(_), Cause::Opaque(_)) => false,
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::render(self, &Config::default(), true, None))
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(Cause::as_dyn)
    }
}

/// Wraps the given error in an [`Error`] unless it already is one, in which
/// case it is returned unchanged (preserving its captured stack).
pub fn wrap<E>(err: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    let boxed: Box<dyn StdError + Send + Sync> = Box::new(err);
    match boxed.downcast::<Error>() {
        Ok(e) => *e,
        Err(other) => Error::new().with_cause_value(Cause::Opaque(Arc::from(other))),
    }
}
