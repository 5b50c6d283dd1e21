//! Error taxonomy for the UCUM engine.
//!
//! `UcumError` carries structured data per variant (not just a message) so
//! callers can branch on `kind()` without string matching. Rendering is a
//! hand-written `Display` impl rather than a `thiserror` derive: several
//! variants need to quote a byte span of the offending input with emphasis
//! markers, which reads more clearly as an explicit `fmt` body than as a
//! derive template.

use crate::dimension::Dimension;
use std::fmt;

/// A byte range into the original input string, used to quote the
/// offending substring in parser error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn point(at: usize) -> Self {
        Self {
            start: at,
            end: at,
        }
    }

    /// Render `source` with the span wrapped in `»…«` markers.
    pub fn quote(&self, source: &str) -> String {
        let start = self.start.min(source.len());
        let end = self.end.min(source.len()).max(start);
        format!("{}»{}«{}", &source[..start], &source[start..end], &source[end..])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// `validate("")` and friends: no input given at all.
    EmptyInput,
    /// Input longer than the engine's bound (64 KiB).
    InputTooLong { len: usize, max: usize },
    /// A token could not be resolved to a known atom or prefixed atom.
    UnknownAtom { token: String },
    UnbalancedParentheses { span: Span },
    UnbalancedBrackets { span: Span },
    /// `power` was asked for a non-integer exponent and no compatibility
    /// flag was set.
    NonIntegerExponent { value: f64 },
    /// e.g. `mcg`: `m` is not a valid prefix of the prefixed atom `cg`.
    DoublePrefix { token: String },
    IncommensurableUnits { from: String, to: String },
    NonRatioMultiplication,
    NonRatioDivision,
    NonRatioPower,
    NonRatioInvert,
    ArbitraryUnitNotConvertible { unit: String },
    MolecularWeightRequired { from: String, to: String },
    /// A special-function name referenced by an atom is not registered.
    /// This is an internal/data bug, not a user input error.
    UnknownSpecialFunction { name: String },
    /// Dimensions present but mismatched in a context other than
    /// conversion (e.g. `validate_in_property`).
    DimensionMismatch {
        expected: Dimension,
        found: Dimension,
        operation: String,
    },
    /// Generic malformed-expression failure with a free-text reason,
    /// used by parser paths whose failure mode has no dedicated variant
    /// above (e.g. a stray `+` outside an exponent, an `1e3`-style literal).
    InvalidExpression { reason: String },
}

#[derive(Debug, Clone)]
pub struct UcumError {
    pub kind: ErrorKind,
    /// Accumulated non-fatal advisory messages (sibling-number repair,
    /// case-insensitive fallback, bracket/annotation advisories) that
    /// preceded this failure, oldest first.
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl UcumError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInput)
    }

    pub fn input_too_long(len: usize, max: usize) -> Self {
        Self::new(ErrorKind::InputTooLong { len, max })
    }

    pub fn unknown_atom(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownAtom {
            token: token.into(),
        })
    }

    pub fn double_prefix(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::DoublePrefix {
            token: token.into(),
        })
    }

    pub fn incommensurable(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncommensurableUnits {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn arbitrary_unit(unit: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArbitraryUnitNotConvertible { unit: unit.into() })
    }

    pub fn molecular_weight_required(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ErrorKind::MolecularWeightRequired {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn unknown_special_function(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownSpecialFunction { name: name.into() })
    }

    pub fn invalid_expression(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidExpression {
            reason: reason.into(),
        })
    }

    /// True for error kinds that are internal/data bugs rather than
    /// ordinary invalid-input outcomes (§7 of the design: these surface as
    /// `status=Error`, not `Invalid`/`Failed`).
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownSpecialFunction { .. })
    }
}

impl fmt::Display for UcumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::EmptyInput => write!(f, "No unit string specified."),
            ErrorKind::InputTooLong { len, max } => {
                write!(f, "Input of {len} bytes exceeds the {max}-byte limit.")
            }
            ErrorKind::UnknownAtom { token } => {
                write!(f, "{token} is not a valid UCUM code.")
            }
            ErrorKind::UnbalancedParentheses { span } => {
                write!(f, "Missing close parenthesis for open parenthesis at {}.", span.start)
            }
            ErrorKind::UnbalancedBrackets { span } => {
                write!(f, "Missing close bracket for open bracket at {}.", span.start)
            }
            ErrorKind::NonIntegerExponent { value } => {
                write!(f, "{value} is not a valid integer exponent.")
            }
            ErrorKind::DoublePrefix { token } => {
                write!(f, "{token} combines two prefixes, which UCUM does not allow.")
            }
            ErrorKind::IncommensurableUnits { from, to } => {
                write!(f, "Sorry. {from} cannot be converted to {to}.")
            }
            ErrorKind::NonRatioMultiplication => {
                write!(f, "Cannot multiply: at most one operand may be on a non-ratio scale.")
            }
            ErrorKind::NonRatioDivision => {
                write!(f, "Cannot divide: both operands must be on a ratio scale.")
            }
            ErrorKind::NonRatioPower => {
                write!(f, "Cannot raise a non-ratio-scale unit to a power.")
            }
            ErrorKind::NonRatioInvert => {
                write!(f, "Cannot invert a non-ratio-scale unit.")
            }
            ErrorKind::ArbitraryUnitNotConvertible { unit } => {
                write!(f, "{unit} is an arbitrary unit and cannot be converted.")
            }
            ErrorKind::MolecularWeightRequired { from: _, to: _ } => {
                write!(f, "The units are not compatible without specifying a molecular weight.")
            }
            ErrorKind::UnknownSpecialFunction { name } => {
                write!(f, "Unknown special function '{name}' referenced by the atom table.")
            }
            ErrorKind::DimensionMismatch {
                expected,
                found,
                operation,
            } => {
                write!(
                    f,
                    "Dimension mismatch in {operation}: expected {expected}, found {found}."
                )
            }
            ErrorKind::InvalidExpression { reason } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for UcumError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_quotes_offending_range() {
        let span = Span::new(1, 2);
        assert_eq!(span.quote("(abc"), "(»a«bc");
    }

    #[test]
    fn display_matches_stable_prefixes() {
        assert_eq!(UcumError::empty_input().to_string(), "No unit string specified.");
        assert_eq!(
            UcumError::unknown_atom("xyz").to_string(),
            "xyz is not a valid UCUM code."
        );
        assert_eq!(
            UcumError::incommensurable("g", "/g").to_string(),
            "Sorry. g cannot be converted to /g."
        );
    }
}
