//! Error aggregation.
//!
//! [`ErrorList`] is a thin, flat collection of errors. Pushing a list into
//! a list splices the nested elements instead of nesting the container, so
//! a list is always one level deep. The wire format is
//! `{"errors": [<object|string>, ...]}`; decoding reuses the per-error
//! decode step and drops empty elements.
//!
//! # Examples
//!
//! ```
//! use error_loom::{str_error, Error, ErrorList, Kind};
//!
//! let mut list = ErrorList::new();
//! list.push(Error::untraced().with_op("op1").with_kind(Kind::IO));
//! list.push(str_error("EOF"));
//! assert_eq!(list.len(), 2);
//! assert!(list.to_string().starts_with("error-list count [2]"));
//! ```

use crate::error::{Cause, Error};
use crate::fields::value_text;
use crate::util::StrError;
use core::fmt;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;

/// A flat collection of errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorList {
    errors: Vec<Cause>,
}

impl ErrorList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error. A nested [`ErrorList`] is flattened into its
    /// elements; an [`Error`] keeps its structure; anything else is stored
    /// as an opaque error.
    pub fn push<E>(&mut self, err: E)
    where
        E: StdError + Send + Sync + 'static,
    {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(err);
        match boxed.downcast::<ErrorList>() {
            Ok(list) => self.errors.extend(list.errors),
            Err(boxed) => match boxed.downcast::<Error>() {
                Ok(e) => self.errors.push(Cause::Structured(e)),
                Err(other) => self.errors.push(Cause::Opaque(Arc::from(other))),
            },
        }
    }

    /// The collected errors in insertion order.
    pub fn errors(&self) -> &[Cause] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the list if it holds any errors, `None` otherwise. Allows
    /// accumulate-then-check usage where an empty list means success.
    pub fn error_or_nil(self) -> Option<ErrorList> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Deserializes a list from its JSON wire format.
    pub fn from_json(text: &str) -> Result<ErrorList, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => Ok(()),
            [single] => fmt::Display::fmt(single, f),
            errors => {
                write!(f, "error-list count [{}]", errors.len())?;
                for (idx, err) in errors.iter().enumerate() {
                    write!(f, "\n\t{idx}: {err}")?;
                }
                writeln!(f)
            }
        }
    }
}

impl StdError for ErrorList {}

impl Serialize for ErrorList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // structured errors keep their object encoding, opaque errors
        // degrade to their display string
        struct Element<'a>(&'a Cause);
        impl Serialize for Element<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self.0 {
                    Cause::Structured(e) => e.serialize(serializer),
                    Cause::Opaque(e) => serializer.serialize_str(&e.to_string()),
                }
            }
        }

        let elements: Vec<Element<'_>> = self.errors.iter().map(Element).collect();
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("errors", &elements)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ErrorList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(default)]
            errors: Vec<Value>,
        }

        let wire = Wire::deserialize(deserializer)?;
        let mut list = ErrorList::new();
        for element in wire.errors {
            match element {
                Value::Object(map) if !map.is_empty() => list
                    .errors
                    .push(Cause::Structured(Box::new(Error::from_document(map)))),
                // empty objects, empty strings and nulls are dropped
                Value::Object(_) | Value::Null => {}
                Value::String(s) if s.is_empty() => {}
                other => list
                    .errors
                    .push(Cause::Opaque(Arc::new(StrError::new(value_text(&other))))),
            }
        }
        Ok(list)
    }
}
