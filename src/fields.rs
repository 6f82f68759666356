//! Insertion-ordered key/value context store.
//!
//! [`FieldMap`] behaves like a map but keeps its entries in a flat,
//! insertion-ordered array. It should only be used for a small number of
//! entries with infrequent modifications and lookups, which is exactly the
//! shape of error context data.
//!
//! # Examples
//!
//! ```
//! use error_loom::{fields, FieldMap};
//!
//! let mut map = FieldMap::new();
//! map.append(fields!["file", "f.txt", "attempt", 3]);
//! map.set("attempt", 4.into());
//! assert_eq!(map.to_string(), "{file:f.txt, attempt:4}");
//! ```

use core::fmt;
use serde_json::Value;
use smallvec::SmallVec;

/// Sentinel stored for a trailing key without a value in
/// [`FieldMap::append`].
pub const MISSING_VALUE: &str = "<missing>";

/// A single context entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

/// SmallVec-backed entry list. Inline storage for a handful of entries keeps
/// the common case allocation-free.
type FieldVec = SmallVec<[Field; 4]>;

/// An insertion-ordered associative container mapping string keys to
/// arbitrary JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(FieldVec);

impl FieldMap {
    /// Creates an empty field map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the given tokens interpreted as alternating key/value pairs.
    ///
    /// Non-string keys are stringified before storage. A trailing key with
    /// no following value is stored with the [`MISSING_VALUE`] sentinel.
    /// Append never dedups: duplicate keys may coexist; use [`FieldMap::set`]
    /// to upsert.
    pub fn append<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let mut tokens = tokens.into_iter();
        while let Some(key) = tokens.next() {
            let key = value_text(&key);
            match tokens.next() {
                Some(value) => self.push(key, value),
                None => self.push(key, Value::String(MISSING_VALUE.into())),
            }
        }
    }

    /// Appends a single entry unconditionally.
    #[inline]
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.0.push(Field { key: key.into(), value });
    }

    /// Upserts: replaces the value at the existing position of `key`, or
    /// appends a new trailing entry.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.0.iter_mut().find(|f| f.key == key) {
            Some(field) => field.value = value,
            None => self.0.push(Field { key, value }),
        }
    }

    /// Removes all entries matching `key`, preserving the relative order of
    /// the rest.
    pub fn delete(&mut self, key: &str) {
        self.0.retain(|f| f.key != key);
    }

    /// Returns the first value stored under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    /// Removes all entries.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in insertion order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Field> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a Field;
    type IntoIter = core::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, field) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", field.key, value_text(&field.value))?;
        }
        f.write_str("}")
    }
}

/// Renders a value in its bare string form: strings are unquoted, `null` is
/// empty, everything else is its JSON text.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
