use ucum::{ErrorKind, validate};

// UCUM grammar is ASCII-only: the micro prefix is the ASCII letter "u", not
// the Unicode micro sign. A literal "µg" is not a recognised atom.
#[test]
fn unicode_micro_sign_is_not_an_atom() {
    let err = validate("\u{b5}g").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownAtom { .. } | ErrorKind::InvalidExpression { .. }
    ));
}

#[test]
fn ascii_micro_prefix_resolves() {
    assert!(validate("ug").is_ok());
    assert!(validate("umol/L").is_ok());
}
