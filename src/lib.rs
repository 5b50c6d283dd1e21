//! UCUM — parser, dimensional algebra and conversion engine for the
//! Unified Code for Units of Measure.
//!
//! [`dimension`] is the fixed-length exponent vector, [`registry`] is the
//! atom/prefix catalog, [`unit`] is the algebraic `Unit` value and its
//! operations, [`special_units`] is the registry of non-linear conversion
//! functions, [`parser`] reduces a UCUM expression string straight to a
//! `Unit`, [`engine`] is the public `validate`/`convert_unit_to`/
//! `convert_to_base_units`/`check_synonyms` surface, and [`suggestions`]
//! ranks candidate atoms for an unrecognised token. [`display`] builds the
//! human-facing `UnitInfo` the engine attaches to its results;
//! [`precision`] and [`performance`] are the ambient numeric-accuracy and
//! caching concerns layered on top.

mod dimension;
mod display;
mod engine;
mod error;
mod parser;
pub mod performance;
pub mod precision;
mod registry;
pub mod special_units;
pub mod suggestions;
mod unit;

pub use crate::dimension::{DIM_LEN, Dimension};
pub use crate::display::UnitInfo;
pub use crate::engine::{
    BaseUnitsResult, ConvertResult, Status, SuggestionBlock, SuggestionSet, SynonymResult,
    ValidateResult, check_synonyms, convert_to_base_units, convert_unit_to,
};
pub use crate::error::{ErrorKind, Span, UcumError};
pub use crate::registry::{Prefix, UnitRecord};
pub use crate::special_units::{
    LogarithmicHandler, SpecialFnPair, SpecialUnitHandler, SpecialUnitRegistry, TemperatureHandler,
};
pub use crate::suggestions::SuggestionEngine;
pub use crate::unit::{ConvKind, Unit};

/// Lookup a unit atom by its case-sensitive code.
pub fn find_unit(code: &str) -> Option<&'static UnitRecord> {
    registry::atom_by_cs(code)
}

/// Every atom in the catalog, in registration order.
pub fn get_all_units() -> &'static [UnitRecord] {
    registry::UNITS
}

/// Lookup a metric prefix by its case-sensitive code.
pub fn find_prefix(code: &str) -> Option<&'static Prefix> {
    registry::prefix_by_cs(code)
}

/// Parse and fully validate a UCUM expression string, exactly as
/// `engine::validate` does but collapsed to a plain `Result` for callers
/// that only care whether the expression is well-formed.
///
/// # Examples
///
/// ```
/// use ucum::validate;
///
/// assert!(validate("m/s").is_ok());
/// assert!(validate("kg.m/s2").is_ok());
/// assert!(validate("not_a_unit").is_err());
/// ```
pub fn validate(expression: &str) -> Result<(), UcumError> {
    parser::parse(expression).map(|_| ())
}

/// Detailed analysis of a parsed UCUM expression: its dimension vector, its
/// coherent magnitude, and whether it carries a non-ratio (special)
/// conversion. A convenience wrapper over the Conversion Engine for callers
/// that want the parsed shape rather than a pass/fail result.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitAnalysis {
    pub expression: String,
    pub dimension: Dimension,
    pub magnitude: f64,
    pub is_dimensionless: bool,
    pub is_special: bool,
    pub is_arbitrary: bool,
}

pub fn analyse(expression: &str) -> Result<UnitAnalysis, UcumError> {
    let outcome = parser::parse(expression)?;
    let unit = outcome.unit;
    Ok(UnitAnalysis {
        expression: expression.to_string(),
        dimension: unit.dimension,
        magnitude: unit.magnitude,
        is_dimensionless: unit.dimension.is_zero(),
        is_special: !unit.is_ratio(),
        is_arbitrary: unit.is_arbitrary,
    })
}

/// Whether two UCUM expressions denote commensurable (dimensionally equal,
/// non-arbitrary) units — the question `convert_unit_to` answers
/// implicitly by succeeding or failing, surfaced here as a plain boolean
/// for callers that only want a yes/no check before attempting a
/// conversion.
pub fn is_comparable(a: &str, b: &str) -> Result<bool, UcumError> {
    let ua = parser::parse(a)?.unit;
    let ub = parser::parse(b)?.unit;
    Ok(!ua.is_arbitrary && !ub.is_arbitrary && ua.dimension == ub.dimension)
}

/// Validate that a unit expression carries the dimension expected for a
/// named physical property (`"length"`, `"mass"`, `"pressure"`, …).
pub fn validate_in_property(expression: &str, property: &str) -> Result<bool, UcumError> {
    let unit = parser::parse(expression)?.unit;
    let expected = property_dimension(property)
        .ok_or_else(|| UcumError::invalid_expression(format!("unknown property '{property}'")))?;
    Ok(unit.dimension == expected)
}

fn property_dimension(property: &str) -> Option<Dimension> {
    Some(match property.to_lowercase().as_str() {
        "mass" => Dimension([1, 0, 0, 0, 0, 0, 0]),
        "length" => Dimension([0, 1, 0, 0, 0, 0, 0]),
        "time" => Dimension([0, 0, 1, 0, 0, 0, 0]),
        "plane-angle" | "angle" => Dimension([0, 0, 0, 1, 0, 0, 0]),
        "temperature" => Dimension([0, 0, 0, 0, 1, 0, 0]),
        "electric-charge" | "charge" => Dimension([0, 0, 0, 0, 0, 1, 0]),
        "luminous-intensity" | "luminosity" => Dimension([0, 0, 0, 0, 0, 0, 1]),
        "area" => Dimension([0, 2, 0, 0, 0, 0, 0]),
        "volume" => Dimension([0, 3, 0, 0, 0, 0, 0]),
        "velocity" => Dimension([0, 1, -1, 0, 0, 0, 0]),
        "acceleration" => Dimension([0, 1, -2, 0, 0, 0, 0]),
        "force" => Dimension([1, 1, -2, 0, 0, 0, 0]),
        "energy" => Dimension([1, 2, -2, 0, 0, 0, 0]),
        "power" => Dimension([1, 2, -3, 0, 0, 0, 0]),
        "pressure" => Dimension([1, -1, -2, 0, 0, 0, 0]),
        "frequency" => Dimension([0, 0, -1, 0, 0, 0, 0]),
        "dimensionless" => Dimension::zero(),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_well_formed_expressions() {
        assert!(validate("m/s").is_ok());
        assert!(validate("kg.m/s2").is_ok());
    }

    #[test]
    fn validate_rejects_unknown_atoms() {
        assert!(validate("not_a_unit").is_err());
    }

    #[test]
    fn analyse_reports_dimension_and_specialness() {
        let a = analyse("kg.m/s2").unwrap();
        assert_eq!(a.dimension, Dimension([1, 1, -2, 0, 0, 0, 0]));
        assert!(!a.is_special);

        let cel = analyse("Cel").unwrap();
        assert!(cel.is_special);
    }

    #[test]
    fn is_comparable_matches_dimension_equality() {
        assert!(is_comparable("m", "[ft_i]").unwrap());
        assert!(!is_comparable("m", "s").unwrap());
        assert!(!is_comparable("[iU]", "[iU]").unwrap());
    }

    #[test]
    fn validate_in_property_checks_expected_dimension() {
        assert!(validate_in_property("kg", "mass").unwrap());
        assert!(!validate_in_property("kg", "length").unwrap());
    }

    #[test]
    fn find_unit_and_find_prefix_reach_the_registry() {
        assert!(find_unit("m").is_some());
        assert!(find_prefix("k").is_some());
        assert!(find_unit("not-a-code").is_none());
    }
}
