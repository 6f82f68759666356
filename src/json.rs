//! Order-preserving serialization.
//!
//! An error serializes to a map document whose members appear in the
//! configured field order: `op`, `kind`, the context fields in store order,
//! the recursively encoded `cause` (without its own stack - only the
//! outermost error's trace is included) and, if enabled, a trailing
//! `stacktrace` member.
//!
//! Deserialization reconstructs the original field order exactly even
//! though JSON objects are nominally unordered: a manual visitor consumes
//! map entries in document order (a guarantee of serde's self-describing
//! JSON deserializer) and replays them, in that order, through the error's
//! upsert path. Nested values are decoded into order-preserving
//! [`serde_json::Value`] maps, so nested causes keep their order too.
//!
//! # Examples
//!
//! ```
//! use error_loom::{Error, Kind};
//!
//! let err = Error::untraced()
//!     .with_op("download")
//!     .with_kind(Kind::IO)
//!     .with("file", "f.txt");
//! let json = err.to_json().unwrap();
//! assert_eq!(json, r#"{"op":"download","kind":"I/O error","file":"f.txt"}"#);
//!
//! let decoded = Error::from_json(&json).unwrap();
//! assert_eq!(decoded.format_error(false, &[]), err.format_error(false, &[]));
//! ```

use crate::config::Config;
use crate::error::{Cause, Error};
use crate::fields::value_text;
use crate::format::{walk_fields, FieldRef};
use crate::kind::Kind;
use crate::stack::write_trace;
use crate::util::StrError;
use core::fmt;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;

impl Error {
    /// Serializes this error as a JSON object using the default
    /// configuration.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes this error as a JSON object using the given
    /// configuration.
    pub fn to_json_with(&self, config: &Config) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ErrorSer {
            error: self,
            config,
            include_stack: true,
        })
    }

    /// Deserializes an error from a JSON object, retaining the order of
    /// fields according to the document.
    pub fn from_json(text: &str) -> Result<Error, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Rebuilds an error from an ordered document map, replaying the
    /// members in document order.
    pub(crate) fn from_document(document: Map<String, Value>) -> Error {
        let mut e = Error::decoded();
        for (key, value) in document {
            e.apply_decoded(key, value);
        }
        e
    }

    /// Replays one decoded member. Structural members are diverted to the
    /// dedicated setters; `stacktrace` becomes a display-only textual
    /// snapshot; everything else is upserted into the field store at its
    /// visit position.
    pub(crate) fn apply_decoded(&mut self, key: String, value: Value) {
        match key.as_str() {
            "stacktrace" => {
                self.decoded_stacktrace = Some(match value {
                    Value::Array(lines) => {
                        let mut text = String::new();
                        for line in &lines {
                            if !text.is_empty() {
                                text.push('\n');
                            }
                            text.push('\t');
                            text.push_str(&value_text(line));
                        }
                        text
                    }
                    other => value_text(&other),
                });
            }
            "op" => {
                if let Value::String(op) = value {
                    if !op.is_empty() {
                        self.op = Some(op);
                    }
                }
            }
            "kind" => {
                let kind = value_text(&value);
                if !kind.is_empty() {
                    self.kind = Some(Kind::new(kind));
                }
            }
            "cause" => match value {
                Value::Object(map) => {
                    self.cause = Some(Cause::Structured(Box::new(Error::from_document(map))));
                }
                Value::Null => {}
                other => {
                    self.cause = Some(Cause::Opaque(Arc::new(StrError::new(value_text(&other)))));
                }
            },
            _ => self.fields.set(key, value),
        }
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ErrorSer {
            error: self,
            config: &Config::default(),
            include_stack: true,
        }
        .serialize(serializer)
    }
}

/// Serialization adapter binding an error to a configuration.
/// `include_stack` is false for nested causes: only the outermost error's
/// trace is ever encoded.
pub(crate) struct ErrorSer<'a> {
    pub(crate) error: &'a Error,
    pub(crate) config: &'a Config,
    pub(crate) include_stack: bool,
}

impl Serialize for ErrorSer<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let config = self.config;
        let order = config.order();
        let mut map = serializer.serialize_map(None)?;

        walk_fields::<S::Error>(
            self.error,
            &order,
            config.print_stack,
            &mut |key, field| match field {
                FieldRef::Op(op) => map.serialize_entry(key, op),
                FieldRef::Kind(kind) => map.serialize_entry(key, kind.as_str()),
                FieldRef::Value(value) => map.serialize_entry(key, value),
                FieldRef::Cause(Cause::Structured(inner)) => map.serialize_entry(
                    key,
                    &ErrorSer {
                        error: inner,
                        config,
                        include_stack: false,
                    },
                ),
                FieldRef::Cause(Cause::Opaque(cause)) => {
                    map.serialize_entry(key, &cause.to_string())
                }
            },
        )?;

        if self.include_stack
            && config.serialize_stack
            && !self.error.ignore_stack
            && self.error.has_stack()
        {
            let mut trace = String::new();
            write_trace(
                &self.error.coalesced_frames(),
                config.pretty_stack,
                &mut trace,
            );
            if config.serialize_stack_as_array {
                map.serialize_entry("stacktrace", &trace_lines(&trace))?;
            } else {
                map.serialize_entry("stacktrace", &trace)?;
            }
        }

        map.end()
    }
}

/// Splits a printed trace into trimmed lines, dropping surrounding
/// whitespace.
fn trace_lines(trace: &str) -> Vec<String> {
    let trimmed = trace.trim_matches(['\n', '\t', ' ']);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('\n')
        .map(|line| line.trim_matches(['\t', '\n', ' ']).to_owned())
        .collect()
}

impl<'de> Deserialize<'de> for Error {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ErrorVisitor;

        impl<'de> Visitor<'de> for ErrorVisitor {
            type Value = Error;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a structured error object")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Error, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Entries arrive in document order; replaying them in that
                // order reconstructs the original field order losslessly.
                let mut e = Error::decoded();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    e.apply_decoded(key, value);
                }
                Ok(e)
            }

            fn visit_unit<E>(self) -> Result<Error, E>
            where
                E: serde::de::Error,
            {
                Ok(Error::decoded())
            }
        }

        deserializer.deserialize_any(ErrorVisitor)
    }
}
