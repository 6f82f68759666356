//! Rendering and serialization configuration.
//!
//! Instead of ambient process-wide toggles, formatting and serialization
//! take an explicit immutable [`Config`]. The only process-wide setting is
//! construction-time stack capture, since constructors take no config
//! argument (see [`set_capture_stacks`](crate::set_capture_stacks)).

/// The implicit field order used when [`Config::field_order`] is `None`.
///
/// The empty string acts as alias for all fields that are unreferenced in
/// the order slice; they are emitted in the order they were added. `op` and
/// `kind` are emitted first among the unreferenced fields, `cause` last.
pub const DEFAULT_FIELD_ORDER: [&str; 4] = ["op", "kind", "", "cause"];

/// Configuration for formatting and serializing errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Append the stack trace to textual renderings.
    pub print_stack: bool,
    /// Column-align trace frames; plain tab-separated form otherwise.
    pub pretty_stack: bool,
    /// Include a `stacktrace` member when serializing.
    pub serialize_stack: bool,
    /// Serialize the stack as an array of frame strings instead of a single
    /// string blob.
    pub serialize_stack_as_array: bool,
    /// Field ordering policy; `None` is equivalent to
    /// [`DEFAULT_FIELD_ORDER`].
    pub field_order: Option<Vec<String>>,
    /// Separator introducing a nested structured cause.
    pub separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            print_stack: true,
            pretty_stack: true,
            serialize_stack: true,
            serialize_stack_as_array: true,
            field_order: None,
            separator: ":\n\t".into(),
        }
    }
}

impl Config {
    /// A configuration that neither prints nor serializes stack traces.
    pub fn no_stack() -> Self {
        Self {
            print_stack: false,
            serialize_stack: false,
            ..Self::default()
        }
    }

    /// Sets the field ordering policy.
    pub fn with_field_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the nested-cause separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// The effective field order as string slices.
    pub(crate) fn order(&self) -> Vec<&str> {
        match &self.field_order {
            Some(order) => order.iter().map(String::as_str).collect(),
            None => DEFAULT_FIELD_ORDER.to_vec(),
        }
    }
}
