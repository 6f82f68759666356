use error_loom::{str_error, Error, Kind};

#[test]
fn unset_kind_resolves_to_other() {
    assert_eq!(Error::untraced().kind(), Kind::OTHER);
    assert_eq!(
        Error::untraced().with_op("op").kind().to_string(),
        "unclassified error"
    );
}

#[test]
fn outer_explicit_wins_over_inner_explicit() {
    let inner = Error::untraced().with_kind(Kind::NOT_EXIST);
    let outer = Error::untraced().with_kind(Kind::INVALID).with_cause(inner);
    assert_eq!(outer.kind(), Kind::INVALID);
}

#[test]
fn explicit_kind_is_inherited_from_the_cause() {
    let inner = Error::untraced().with_kind(Kind::NOT_EXIST);
    let outer = Error::untraced().with_op("load").with_cause(inner);
    assert_eq!(outer.kind(), Kind::NOT_EXIST);
}

#[test]
fn default_kind_applies_when_chain_has_no_explicit_kind() {
    let outer = Error::untraced()
        .with_default_kind(Kind::INVALID)
        .with_cause(Error::untraced());
    assert_eq!(outer.kind(), Kind::INVALID);
}

#[test]
fn inner_explicit_beats_outer_default() {
    let outer = Error::untraced()
        .with_default_kind(Kind::INVALID)
        .with_cause(Error::untraced().with_kind(Kind::TIMEOUT));
    assert_eq!(outer.kind(), Kind::TIMEOUT);
}

#[test]
fn inner_default_beats_outer_default() {
    // the default is re-evaluated while descending: the innermost visited
    // default wins when no explicit kind exists anywhere
    let outer = Error::untraced()
        .with_default_kind(Kind::INVALID)
        .with_cause(Error::untraced().with_default_kind(Kind::PERMISSION));
    assert_eq!(outer.kind(), Kind::PERMISSION);
}

#[test]
fn default_kind_is_not_masked_by_an_opaque_cause() {
    let outer = Error::untraced()
        .with_default_kind(Kind::IO)
        .with_cause(str_error("boom"));
    assert_eq!(outer.kind(), Kind::IO);
}

#[test]
fn is_kind_searches_the_chain() {
    let inner = Error::untraced().with_kind(Kind::NOT_EXIST);
    let outer = Error::untraced().with_kind(Kind::IO).with_cause(inner);
    assert!(outer.is_kind(&Kind::IO));
    assert!(outer.is_kind(&Kind::NOT_EXIST));
    assert!(!outer.is_kind(&Kind::TIMEOUT));
}

#[test]
fn ad_hoc_kinds_compare_by_text() {
    assert_eq!(Kind::new("I/O error"), Kind::IO);
    let e = Error::untraced().with_kind(Kind::new("quota exceeded"));
    assert_eq!(e.kind().as_str(), "quota exceeded");
}
