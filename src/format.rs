//! Field-order driven rendering.
//!
//! Both the text formatter and the serializer walk an error's fields in the
//! order mandated by the configured policy (see
//! [`DEFAULT_FIELD_ORDER`](crate::DEFAULT_FIELD_ORDER)): explicitly named
//! fields first, then - at the position of the `""` wildcard - all
//! unreferenced fields in store order, with `op`/`kind` leading and `cause`
//! trailing the wildcard group.

use crate::config::Config;
use crate::error::{Cause, Error};
use crate::fields::value_text;
use crate::kind::Kind;
use crate::stack::write_trace;
use core::convert::Infallible;
use serde_json::Value;

/// A borrowed view of one field as the walker emits it.
pub(crate) enum FieldRef<'a> {
    Op(&'a str),
    Kind(Kind),
    Value(&'a Value),
    Cause(&'a Cause),
}

impl Error {
    /// Resolves one policy name to the corresponding field, if present.
    /// `kind` is always present (it resolves through the cause chain).
    pub(crate) fn lookup(&self, key: &str) -> Option<FieldRef<'_>> {
        match key {
            "op" => self.op.as_deref().map(FieldRef::Op),
            "kind" => Some(FieldRef::Kind(self.kind())),
            "cause" => self.cause.as_ref().map(FieldRef::Cause),
            _ => self.fields.get(key).map(FieldRef::Value),
        }
    }
}

/// Walks the error's fields in policy order, invoking `emit` for each
/// present field. Policy names absent from the error are skipped silently.
/// The wildcard group is emitted at most once; if the policy does not
/// contain `""`, the group is emitted after all named fields.
pub(crate) fn walk_fields<E>(
    err: &Error,
    order: &[&str],
    print_stack: bool,
    emit: &mut dyn FnMut(&str, FieldRef<'_>) -> Result<(), E>,
) -> Result<(), E> {
    let mut group_done = false;
    for key in order {
        if key.is_empty() {
            if !group_done {
                group_done = true;
                emit_unreferenced(err, order, print_stack, emit)?;
            }
        } else if let Some(field) = err.lookup(key) {
            emit(key, field)?;
        }
    }
    if !group_done {
        emit_unreferenced(err, order, print_stack, emit)?;
    }
    Ok(())
}

fn emit_unreferenced<E>(
    err: &Error,
    order: &[&str],
    print_stack: bool,
    emit: &mut dyn FnMut(&str, FieldRef<'_>) -> Result<(), E>,
) -> Result<(), E> {
    // A literal "stacktrace" context field is suppressed along with the
    // trace itself when stack printing is off.
    let unreferenced =
        |key: &str| (key != "stacktrace" || print_stack) && !order.contains(&key);

    if let Some(op) = err.op.as_deref() {
        if unreferenced("op") {
            emit("op", FieldRef::Op(op))?;
        }
    }
    if unreferenced("kind") {
        emit("kind", FieldRef::Kind(err.kind()))?;
    }
    for field in err.fields.iter() {
        if unreferenced(&field.key) {
            emit(&field.key, FieldRef::Value(&field.value))?;
        }
    }
    if let Some(cause) = &err.cause {
        if unreferenced("cause") {
            emit("cause", FieldRef::Cause(cause))?;
        }
    }
    Ok(())
}

/// Renders the error to its textual form. `print_stack` additionally gates
/// the trace on top of `config.print_stack`; `order_override` replaces the
/// configured field order for the outermost error only (nested causes
/// always use the configured order).
pub(crate) fn render(
    err: &Error,
    config: &Config,
    print_stack: bool,
    order_override: Option<&[&str]>,
) -> String {
    let configured = config.order();
    let order: &[&str] = order_override.unwrap_or(&configured);

    let mut out = String::new();
    let _ = walk_fields::<Infallible>(err, order, config.print_stack, &mut |key, field| {
        write_key_val(&mut out, key, &field, config);
        Ok(())
    });

    if print_stack && config.print_stack && !err.ignore_stack && err.has_stack() {
        out.push('\n');
        write_trace(&err.coalesced_frames(), config.pretty_stack, &mut out);
    }
    out
}

fn write_key_val(out: &mut String, key: &str, field: &FieldRef<'_>, config: &Config) {
    if let FieldRef::Cause(Cause::Structured(inner)) = field {
        if !inner.is_zero() {
            pad(out);
            out.push_str("cause");
            out.push_str(&config.separator);
            out.push_str(&render(inner, config, false, None));
        }
        return;
    }

    pad(out);
    out.push_str(key);
    out.push_str(" [");
    match field {
        FieldRef::Op(op) => out.push_str(op),
        FieldRef::Kind(kind) => out.push_str(kind.as_str()),
        FieldRef::Value(value) => out.push_str(&value_text(value)),
        FieldRef::Cause(cause) => out.push_str(&cause.to_string()),
    }
    out.push(']');
}

/// Appends a separator iff the buffer already has some data.
fn pad(out: &mut String) {
    if !out.is_empty() {
        out.push(' ');
    }
}
