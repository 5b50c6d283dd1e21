//! Conversion Engine (Component F): the crate's main entry points.
//!
//! Ties the Expression Parser (E), Unit Algebra (C), Special Functions (D)
//! and Suggestion Index (G) together into the four operations callers
//! actually want — `validate`, `convert_unit_to`, `convert_to_base_units`,
//! `check_synonyms` — and owns the response shapes (`ValidateResult`,
//! `ConvertResult`, `BaseUnitsResult`, `SynonymResult`) those operations
//! return.

use crate::dimension::Dimension;
use crate::display::{self, UnitInfo};
use crate::error::UcumError;
use crate::parser;
use crate::registry;
use crate::unit::Unit;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Valid,
    Invalid,
    Succeeded,
    Failed,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionBlock {
    pub message: String,
    pub invalid_unit: String,
    pub candidates: Vec<UnitInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionSet {
    pub from: Vec<SuggestionBlock>,
    pub to: Vec<SuggestionBlock>,
}

impl SuggestionSet {
    fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ValidateResult {
    pub status: Status,
    pub messages: Vec<String>,
    pub ucum_code: Option<String>,
    pub unit: Option<UnitInfo>,
    pub suggestions: Option<SuggestionSet>,
}

#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub status: Status,
    pub to_val: Option<f64>,
    pub from_unit: Option<UnitInfo>,
    pub to_unit: Option<UnitInfo>,
    pub messages: Vec<String>,
    pub suggestions: Option<SuggestionSet>,
}

#[derive(Debug, Clone)]
pub struct BaseUnitsResult {
    pub status: Status,
    pub magnitude: Option<f64>,
    pub from_unit_is_special: bool,
    pub unit_to_exp: BTreeMap<String, i32>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SynonymResult {
    pub status: Status,
    pub units: Vec<UnitInfo>,
    pub message: Option<String>,
}

/// `validate(input)`: parse `input` and report what it means, or why it
/// doesn't.
pub fn validate(input: &str, suggest_mode: bool) -> ValidateResult {
    if input.trim().is_empty() {
        return ValidateResult {
            status: Status::Error,
            messages: vec![UcumError::empty_input().to_string()],
            ucum_code: None,
            unit: None,
            suggestions: None,
        };
    }
    match parser::parse(input) {
        Ok(outcome) => ValidateResult {
            status: Status::Valid,
            messages: outcome.warnings,
            ucum_code: Some(outcome.unit.code.clone()),
            unit: Some(display::describe(&outcome.unit)),
            suggestions: None,
        },
        Err(e) => {
            let status = if e.is_internal() { Status::Error } else { Status::Invalid };
            let mut messages = e.warnings.clone();
            messages.push(e.to_string());
            let suggestions = suggestion_block_for(input, &e, suggest_mode)
                .map(|block| SuggestionSet { from: vec![block], to: Vec::new() });
            ValidateResult {
                status,
                messages,
                ucum_code: None,
                unit: None,
                suggestions,
            }
        }
    }
}

/// `convert_unit_to(from, value, to)`: convert `value` expressed in `from`
/// into the equivalent value in `to`. `molecular_weight`, in g/mol, enables
/// the mass-to-substance-amount (or back) rewrite when the two sides differ
/// by exactly a mass dimension (e.g. `mg/dL` vs `mmol/L`).
pub fn convert_unit_to(
    from_str: &str,
    value: f64,
    to_str: &str,
    suggest_mode: bool,
    molecular_weight: Option<f64>,
) -> ConvertResult {
    if from_str.trim().is_empty() || to_str.trim().is_empty() {
        return ConvertResult {
            status: Status::Error,
            to_val: None,
            from_unit: None,
            to_unit: None,
            messages: vec![UcumError::empty_input().to_string()],
            suggestions: None,
        };
    }

    let mut messages = Vec::new();
    let mut suggestions = SuggestionSet::default();
    let mut failed = false;

    let from_parsed = parser::parse(from_str);
    let to_parsed = parser::parse(to_str);

    let from_unit = match &from_parsed {
        Ok(o) => {
            messages.extend(o.warnings.clone());
            Some(&o.unit)
        }
        Err(e) => {
            messages.extend(e.warnings.clone());
            messages.push(format!(
                "Unable to find a unit for {from_str}, so no conversion could be performed."
            ));
            if let Some(block) = suggestion_block_for(from_str, e, suggest_mode) {
                suggestions.from.push(block);
            }
            failed = true;
            None
        }
    };
    let to_unit = match &to_parsed {
        Ok(o) => {
            messages.extend(o.warnings.clone());
            Some(&o.unit)
        }
        Err(e) => {
            messages.extend(e.warnings.clone());
            messages.push(format!(
                "Unable to find a unit for {to_str}, so no conversion could be performed."
            ));
            if let Some(block) = suggestion_block_for(to_str, e, suggest_mode) {
                suggestions.to.push(block);
            }
            failed = true;
            None
        }
    };

    if failed {
        return ConvertResult {
            status: Status::Failed,
            to_val: None,
            from_unit: None,
            to_unit: None,
            messages,
            suggestions: (!suggestions.is_empty()).then_some(suggestions),
        };
    }

    let from_unit = from_unit.expect("checked above");
    let to_unit = to_unit.expect("checked above");

    if from_unit.is_arbitrary || to_unit.is_arbitrary {
        let bad = if from_unit.is_arbitrary { from_str } else { to_str };
        messages.push(UcumError::arbitrary_unit(bad).to_string());
        return ConvertResult {
            status: Status::Failed,
            to_val: None,
            from_unit: Some(display::describe(from_unit)),
            to_unit: Some(display::describe(to_unit)),
            messages,
            suggestions: None,
        };
    }

    let outcome = if from_unit.dimension == to_unit.dimension {
        to_unit.convert_from(value, from_unit)
    } else {
        match mass_mole_bridge(from_unit, to_unit, molecular_weight) {
            Some(Ok(bridged_from)) => to_unit.convert_from(value, &bridged_from),
            Some(Err(e)) => Err(e),
            None => Err(UcumError::incommensurable(from_str, to_str)),
        }
    };

    match outcome {
        Ok(converted) => ConvertResult {
            status: Status::Succeeded,
            to_val: Some(converted),
            from_unit: Some(display::describe(from_unit)),
            to_unit: Some(display::describe(to_unit)),
            messages,
            suggestions: None,
        },
        Err(e) => {
            messages.push(e.to_string());
            ConvertResult {
                status: Status::Failed,
                to_val: None,
                from_unit: Some(display::describe(from_unit)),
                to_unit: Some(display::describe(to_unit)),
                messages,
                suggestions: None,
            }
        }
    }
}

/// `convert_to_base_units(input, value)`: express `value input` as a
/// coherent magnitude over the seven base atoms.
pub fn convert_to_base_units(input: &str, value: f64) -> BaseUnitsResult {
    if input.trim().is_empty() {
        return BaseUnitsResult {
            status: Status::Error,
            magnitude: None,
            from_unit_is_special: false,
            unit_to_exp: BTreeMap::new(),
            messages: vec![UcumError::empty_input().to_string()],
        };
    }
    let outcome = match parser::parse(input) {
        Ok(o) => o,
        Err(e) => {
            let mut messages = e.warnings.clone();
            messages.push(e.to_string());
            return BaseUnitsResult {
                status: if e.is_internal() { Status::Error } else { Status::Failed },
                magnitude: None,
                from_unit_is_special: false,
                unit_to_exp: BTreeMap::new(),
                messages,
            };
        }
    };
    match outcome.unit.convert_coherent(value) {
        Ok((magnitude, _dim, is_special)) => BaseUnitsResult {
            status: Status::Succeeded,
            magnitude: Some(magnitude),
            from_unit_is_special: is_special,
            unit_to_exp: outcome.unit.mutate_coherent(),
            messages: outcome.warnings,
        },
        Err(e) => {
            let mut messages = outcome.warnings;
            messages.push(e.to_string());
            BaseUnitsResult {
                status: Status::Failed,
                magnitude: None,
                from_unit_is_special: false,
                unit_to_exp: BTreeMap::new(),
                messages,
            }
        }
    }
}

/// `check_synonyms(term)`: does any atom in the catalog go by this name?
pub fn check_synonyms(term: &str) -> SynonymResult {
    if term.trim().is_empty() {
        return SynonymResult {
            status: Status::Error,
            units: Vec::new(),
            message: Some(UcumError::empty_input().to_string()),
        };
    }
    let mut hits = registry::atoms_by_synonym(term);
    if hits.is_empty() {
        if let Some(atom) = registry::atom_by_name(term) {
            hits.push(atom);
        }
    }
    if hits.is_empty() {
        SynonymResult {
            status: Status::Invalid,
            units: Vec::new(),
            message: Some(format!("No unit is known by the name '{term}'.")),
        }
    } else {
        SynonymResult {
            status: Status::Valid,
            units: hits
                .into_iter()
                .map(|atom| UnitInfo {
                    code: atom.cs_code.to_string(),
                    name: atom.name.to_string(),
                    guidance: display::guidance_for(atom),
                })
                .collect(),
            message: None,
        }
    }
}

fn suggestion_block_for(input: &str, error: &UcumError, suggest_mode: bool) -> Option<SuggestionBlock> {
    if !suggest_mode || error.suggestions.is_empty() {
        return None;
    }
    let candidates = error
        .suggestions
        .iter()
        .filter_map(|code| registry::atom_by_cs(code))
        .map(|atom| UnitInfo {
            code: atom.cs_code.to_string(),
            name: atom.name.to_string(),
            guidance: display::guidance_for(atom),
        })
        .collect();
    Some(SuggestionBlock {
        message: error.to_string(),
        invalid_unit: input.to_string(),
        candidates,
    })
}

fn mass_dim() -> Dimension {
    Dimension([1, 0, 0, 0, 0, 0, 0])
}

/// When `from` and `to` differ by exactly a mass dimension — a mass unit on
/// one side, a substance-amount (mole-based) unit on the other — and a
/// molecular weight (g/mol) is supplied, build a version of `from` bridged
/// through that weight so the two sides become dimensionally comparable.
/// Returns `None` when the shape isn't a mass/mole pair at all (the caller
/// falls back to a plain incommensurable-units error); `Some(Err(..))` when
/// it is the right shape but no weight was given.
fn mass_mole_bridge(
    from: &Unit,
    to: &Unit,
    molecular_weight: Option<f64>,
) -> Option<Result<Unit, UcumError>> {
    let diff = from.dimension.sub(&to.dimension);
    let mass = mass_dim();
    if diff != mass && diff != mass.minus() {
        return None;
    }
    match molecular_weight {
        None => Some(Err(UcumError::molecular_weight_required(
            from.code.clone(),
            to.code.clone(),
        ))),
        Some(weight) => {
            let mw_unit = Unit::ratio(weight, mass, "g/mol");
            let bridged = if diff == mass {
                from.divide(&mw_unit)
            } else {
                from.multiply(&mw_unit)
            };
            Some(bridged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_error_status() {
        let result = validate("", true);
        assert_eq!(result.status, Status::Error);
    }

    #[test]
    fn double_prefix_is_invalid() {
        let result = validate("mcg", true);
        assert_eq!(result.status, Status::Invalid);
    }

    #[test]
    fn standalone_annotation_is_valid_with_advisory() {
        let result = validate("{g}", true);
        assert_eq!(result.status, Status::Valid);
        assert!(!result.messages.is_empty());
    }

    #[test]
    fn carat_to_gram_conversion() {
        let result = convert_unit_to("g", 56.0, "[car_m]", true, None);
        assert_eq!(result.status, Status::Succeeded);
        assert!((result.to_val.unwrap() - 280.0).abs() < 1e-9);
    }

    #[test]
    fn fahrenheit_zero_to_celsius() {
        let result = convert_unit_to("[degF]", 0.0, "Cel", true, None);
        assert_eq!(result.status, Status::Succeeded);
        assert_eq!((result.to_val.unwrap() * 100.0).round() as i64, -1778);
    }

    #[test]
    fn mass_to_substance_amount_needs_molecular_weight() {
        let result = convert_unit_to("mmol/L", 5.33, "mg/dL", true, None);
        assert_eq!(result.status, Status::Failed);
    }

    #[test]
    fn mass_to_substance_amount_with_molecular_weight() {
        let result = convert_unit_to("mmol/L", 5.33, "mg/dL", true, Some(180.156));
        assert_eq!(result.status, Status::Succeeded);
        assert!((result.to_val.unwrap() - 96.0).abs() < 1.0);
    }

    #[test]
    fn incommensurable_units_fail_with_exact_wording() {
        let result = convert_unit_to("g", 1.0, "/g", true, None);
        assert_eq!(result.status, Status::Failed);
        assert!(result
            .messages
            .iter()
            .any(|m| m == "Sorry. g cannot be converted to /g."));
    }

    #[test]
    fn convert_to_base_units_reports_exponent_map() {
        let result = convert_to_base_units("cm2/ms3", 1.0);
        assert_eq!(result.status, Status::Succeeded);
        assert!((result.magnitude.unwrap() - 100_000.0).abs() < 1e-6);
        assert_eq!(result.unit_to_exp.get("m"), Some(&2));
        assert_eq!(result.unit_to_exp.get("s"), Some(&-3));
    }

    #[test]
    fn convert_to_base_units_reports_special_flag() {
        let result = convert_to_base_units("[degF]", 32.0);
        assert_eq!(result.status, Status::Succeeded);
        assert!(result.from_unit_is_special);
        assert!((result.magnitude.unwrap() - 273.15).abs() < 1e-6);
        assert_eq!(result.unit_to_exp.get("K"), Some(&1));
    }

    #[test]
    fn check_synonyms_finds_known_name() {
        let result = check_synonyms("meter");
        assert_eq!(result.status, Status::Valid);
        assert!(result.units.iter().any(|u| u.code == "m"));
    }

    #[test]
    fn check_synonyms_rejects_unknown_name() {
        let result = check_synonyms("wobblefluxon");
        assert_eq!(result.status, Status::Invalid);
    }
}
