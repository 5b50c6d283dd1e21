//! Human-facing unit description: builds the `UnitInfo` the Conversion
//! Engine attaches to a successful `validate`/`convert_unit_to` result.
//!
//! The previous AST-walking version of this module (`generate_display_name`
//! over `OwnedUnitExpr`) is gone along with the AST itself — a parsed
//! expression is now already a single reduced `unit::Unit`, so describing
//! it is a registry lookup rather than a tree walk. An exact atom code
//! (`"m"`, `"[degF]"`, a prefixed atom like `"mmol"`) resolves to its
//! catalog name and synonyms; a multi-atom product/quotient code (`"kg.m/s2"`)
//! has no single catalog entry, so it falls back to describing itself.

use crate::registry::{self, UnitRecord};
use crate::unit::Unit;

#[derive(Debug, Clone, PartialEq)]
pub struct UnitInfo {
    pub code: String,
    pub name: String,
    pub guidance: String,
}

/// Describe a resolved `Unit` for display, preferring an exact atom-table
/// match (including one level of prefix decomposition) over the raw code.
pub fn describe(unit: &Unit) -> UnitInfo {
    if let Some(atom) = registry::atom_by_cs(&unit.code) {
        return UnitInfo {
            code: unit.code.clone(),
            name: atom.name.to_string(),
            guidance: guidance_for(atom),
        };
    }
    if let Some((prefix, atom)) = decompose_prefixed(&unit.code) {
        return UnitInfo {
            code: unit.code.clone(),
            name: format!("{}{}", prefix_name(prefix.cs_code), atom.name),
            guidance: guidance_for(atom),
        };
    }
    UnitInfo {
        code: unit.code.clone(),
        name: unit.code.clone(),
        guidance: format!("derived unit {}", unit.code),
    }
}

pub fn guidance_for(atom: &UnitRecord) -> String {
    if atom.synonyms.is_empty() {
        atom.name.to_string()
    } else {
        format!("{} (also: {})", atom.name, atom.synonyms.join(", "))
    }
}

fn decompose_prefixed(code: &str) -> Option<(&'static registry::Prefix, &'static UnitRecord)> {
    for prefix in registry::prefixes_longest_first() {
        if code.len() <= prefix.cs_code.len() || !code.starts_with(prefix.cs_code) {
            continue;
        }
        if let Some(atom) = registry::atom_by_cs(&code[prefix.cs_code.len()..]) {
            if atom.is_metric {
                return Some((prefix, atom));
            }
        }
    }
    None
}

fn prefix_name(cs_code: &str) -> &'static str {
    match cs_code {
        "Y" => "yotta",
        "Z" => "zetta",
        "E" => "exa",
        "P" => "peta",
        "T" => "tera",
        "G" => "giga",
        "M" => "mega",
        "k" => "kilo",
        "h" => "hecto",
        "da" => "deka",
        "d" => "deci",
        "c" => "centi",
        "m" => "milli",
        "u" => "micro",
        "n" => "nano",
        "p" => "pico",
        "f" => "femto",
        "a" => "atto",
        "z" => "zepto",
        "y" => "yocto",
        _ => "",
    }
}
