use ucum::{ErrorKind, validate};

#[test]
fn repeated_division_is_allowed() {
    // `kg/m/s` is left-to-right: `(kg/m)/s`. UCUM does not special-case a
    // second slash.
    assert!(validate("kg/m/s").is_ok());
}

#[test]
fn double_prefix_is_rejected() {
    let err = validate("mcg").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DoublePrefix { .. }));
}

#[test]
fn unknown_atom_is_reported_by_token() {
    let err = validate("wobblefluxon").unwrap_err();
    match err.kind {
        ErrorKind::UnknownAtom { token } => assert_eq!(token, "wobblefluxon"),
        other => panic!("expected UnknownAtom, got {other:?}"),
    }
}

#[test]
fn unbalanced_parentheses_is_reported() {
    let err = validate("(kg.m/s2").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnbalancedParentheses { .. }));
}

#[test]
fn empty_input_is_reported() {
    let err = validate("").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EmptyInput));
}
