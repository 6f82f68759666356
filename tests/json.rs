use error_loom::{str_error, Config, Error, Kind};

#[test]
fn encodes_members_in_field_order() {
    let err = Error::untraced()
        .with_op("download")
        .with_kind(Kind::IO)
        .with("file", "f.txt")
        .with("attempt", 3);

    assert_eq!(
        err.to_json().unwrap(),
        r#"{"op":"download","kind":"I/O error","file":"f.txt","attempt":3}"#
    );
}

#[test]
fn kind_member_is_always_present() {
    assert_eq!(
        Error::untraced().to_json().unwrap(),
        r#"{"kind":"unclassified error"}"#
    );
}

#[test]
fn nested_cause_is_encoded_recursively() {
    let inner = Error::untraced().with_op("read").with("path", "/x");
    let outer = Error::untraced()
        .with_op("load")
        .with_kind(Kind::IO)
        .with_cause(inner);

    assert_eq!(
        outer.to_json().unwrap(),
        r#"{"op":"load","kind":"I/O error","cause":{"op":"read","kind":"unclassified error","path":"/x"}}"#
    );
}

#[test]
fn opaque_cause_is_encoded_as_its_display_string() {
    let err = Error::untraced().with_op("fetch").with_cause(str_error("EOF"));
    assert_eq!(
        err.to_json().unwrap(),
        r#"{"op":"fetch","kind":"unclassified error","cause":"EOF"}"#
    );
}

#[test]
fn config_field_order_applies_to_encoding() {
    let err = Error::untraced().with_op("download").with("file", "f.txt");
    let config = Config::no_stack().with_field_order(["file", "", "op"]);

    assert_eq!(
        err.to_json_with(&config).unwrap(),
        r#"{"file":"f.txt","kind":"unclassified error","op":"download"}"#
    );
}

#[test]
fn decode_reconstructs_document_member_order() {
    let err = Error::from_json(r#"{"zeta":1,"op":"x","alpha":2,"kind":"invalid"}"#).unwrap();

    assert_eq!(err.op(), "x");
    assert_eq!(err.kind(), Kind::INVALID);
    let keys: Vec<&str> = err.fields().iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, ["zeta", "alpha"]);

    assert_eq!(
        err.to_json().unwrap(),
        r#"{"op":"x","kind":"invalid","zeta":1,"alpha":2}"#
    );
}

#[test]
fn decode_preserves_order_in_nested_causes() {
    let json = r#"{"op":"outer","cause":{"b":2,"a":1,"op":"inner"}}"#;
    let err = Error::from_json(json).unwrap();

    let inner = err.cause().unwrap().as_error().unwrap();
    assert_eq!(inner.op(), "inner");
    let keys: Vec<&str> = inner.fields().iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, ["b", "a"]);
}

#[test]
fn decode_treats_scalar_cause_as_opaque() {
    let err = Error::from_json(r#"{"op":"fetch","cause":"EOF"}"#).unwrap();
    let cause = err.cause().unwrap();
    assert!(cause.as_error().is_none());
    assert_eq!(cause.to_string(), "EOF");
    assert!(err
        .format_error(false, &[])
        .ends_with("cause [EOF]"));
}

#[test]
fn render_round_trips_when_stack_printing_is_disabled() {
    let err = Error::untraced()
        .with_op("download")
        .with_kind(Kind::IO)
        .with_cause(
            Error::untraced()
                .with_op("read")
                .with("path", "/tmp/x")
                .with_cause(str_error("EOF")),
        )
        .with("file", "f.txt")
        .with("attempt", 3);

    let decoded = Error::from_json(&err.to_json().unwrap()).unwrap();
    assert_eq!(
        decoded.format_error(false, &[]),
        err.format_error(false, &[])
    );
}

#[test]
fn empty_document_decodes_to_a_zero_error() {
    let err = Error::from_json("{}").unwrap();
    assert!(err.is_zero());
    assert_eq!(Error::from_json("null").unwrap().is_zero(), true);
}

#[test]
fn malformed_documents_fail() {
    assert!(Error::from_json("[1,2]").is_err());
    assert!(Error::from_json(r#""just a string""#).is_err());
    assert!(Error::from_json("{\"op\":").is_err());
}

#[test]
fn decoded_stacktrace_string_is_kept_as_textual_snapshot() {
    let err =
        Error::from_json(r#"{"op":"x","stacktrace":"\ta.rs:1\tf()\n\tb.rs:2\tg()"}"#).unwrap();
    assert_eq!(
        err.decoded_stacktrace(),
        Some("\ta.rs:1\tf()\n\tb.rs:2\tg()")
    );
    // the snapshot is display-only: it does not count as a live stack and
    // is not rendered or re-encoded
    assert!(!err.has_stack());
    assert_eq!(err.to_string(), "op [x] kind [unclassified error]");
    assert_eq!(
        err.to_json().unwrap(),
        r#"{"op":"x","kind":"unclassified error"}"#
    );
}

#[test]
fn decoded_stacktrace_array_is_joined_with_tab_prefixed_lines() {
    let err = Error::from_json(r#"{"stacktrace":["a.rs:1 f()","b.rs:2 g()"]}"#).unwrap();
    assert_eq!(err.decoded_stacktrace(), Some("\ta.rs:1 f()\n\tb.rs:2 g()"));
}

#[test]
fn clear_stacktrace_drops_the_decoded_snapshot() {
    let err = Error::from_json(r#"{"op":"x","stacktrace":"\ta.rs:1\tf()"}"#).unwrap();
    let cleared = err.clear_stacktrace();
    assert!(cleared.decoded_stacktrace().is_none());
    assert_eq!(err.decoded_stacktrace(), Some("\ta.rs:1\tf()"));
}

#[test]
fn serde_serialize_trait_matches_to_json() {
    let err = Error::untraced().with_op("download").with("file", "f.txt");
    assert_eq!(serde_json::to_string(&err).unwrap(), err.to_json().unwrap());
}
