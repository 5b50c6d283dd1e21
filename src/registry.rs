//! Atom Table (Component B): the catalog of UCUM prefixes and unit atoms.
//!
//! Rather than generating this data at build time from an external essence
//! file, this module hand-authors the `&'static` prefix and unit tables
//! directly — a representative catalog rather than the full UCUM set — and
//! keeps the lookup functions the rest of the crate calls as the only way
//! in, so swapping this module for a generated one later is a non-event
//! for every caller.

use crate::dimension::Dimension;
use phf::phf_map;

/// A single metric prefix (`k`, `m`, `da`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub cs_code: &'static str,
    pub exponent: i32,
}

impl Prefix {
    pub fn factor(&self) -> f64 {
        10f64.powi(self.exponent)
    }
}

/// A single unit atom.
#[derive(Debug, Clone, Copy)]
pub struct UnitRecord {
    pub cs_code: &'static str,
    /// Case-insensitive code, used only as a fallback lookup.
    pub ci_code: &'static str,
    pub name: &'static str,
    /// `None` for the seven base atoms; `Some(factor)` otherwise, the
    /// coherent scale relative to the base atom of the same dimension.
    pub factor: Option<f64>,
    pub dimension: Dimension,
    /// Whether a metric prefix may be attached (`g`, `m`, `L`, `Hz`, …).
    /// Non-metric atoms (`[car_m]`, `h` for hour, special units) reject
    /// prefixing entirely.
    pub is_metric: bool,
    /// Bracket-delimited units with no defined relationship to any other
    /// unit (`[iU]`): never commensurable with anything, even each other.
    pub is_arbitrary: bool,
    /// Name of the entry in `special_units::REGISTRY` that converts this
    /// atom to and from its dimension's ratio-scale base. `None` for plain
    /// ratio-scale atoms.
    pub special: Option<&'static str>,
    pub synonyms: &'static [&'static str],
}

pub const PREFIXES: &[Prefix] = &[
    Prefix { cs_code: "Y", exponent: 24 },
    Prefix { cs_code: "Z", exponent: 21 },
    Prefix { cs_code: "E", exponent: 18 },
    Prefix { cs_code: "P", exponent: 15 },
    Prefix { cs_code: "T", exponent: 12 },
    Prefix { cs_code: "G", exponent: 9 },
    Prefix { cs_code: "M", exponent: 6 },
    Prefix { cs_code: "k", exponent: 3 },
    Prefix { cs_code: "h", exponent: 2 },
    Prefix { cs_code: "da", exponent: 1 },
    Prefix { cs_code: "d", exponent: -1 },
    Prefix { cs_code: "c", exponent: -2 },
    Prefix { cs_code: "m", exponent: -3 },
    Prefix { cs_code: "u", exponent: -6 },
    Prefix { cs_code: "n", exponent: -9 },
    Prefix { cs_code: "p", exponent: -12 },
    Prefix { cs_code: "f", exponent: -15 },
    Prefix { cs_code: "a", exponent: -18 },
    Prefix { cs_code: "z", exponent: -21 },
    Prefix { cs_code: "y", exponent: -24 },
];

/// Compile-time index from prefix code to its position in `PREFIXES`. The
/// UCUM prefix set is fixed, so a perfect-hash map costs nothing to maintain
/// and turns the hottest atom-resolution lookup (every prefixed atom probes
/// this) into O(1) instead of a 20-entry linear scan, while `PREFIXES` stays
/// the single source of truth for the data itself.
static PREFIX_INDEX: phf::Map<&'static str, usize> = phf_map! {
    "Y" => 0, "Z" => 1, "E" => 2, "P" => 3, "T" => 4, "G" => 5,
    "M" => 6, "k" => 7, "h" => 8, "da" => 9, "d" => 10, "c" => 11,
    "m" => 12, "u" => 13, "n" => 14, "p" => 15, "f" => 16, "a" => 17,
    "z" => 18, "y" => 19,
};

const DIMLESS: Dimension = Dimension::zero();

pub const UNITS: &[UnitRecord] = &[
    // Base atoms, one per dimension, `factor: None`.
    UnitRecord {
        cs_code: "m", ci_code: "M", name: "meter", factor: None,
        dimension: Dimension([0, 1, 0, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["meter", "metre"],
    },
    UnitRecord {
        cs_code: "s", ci_code: "S", name: "second", factor: None,
        dimension: Dimension([0, 0, 1, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["second"],
    },
    UnitRecord {
        cs_code: "g", ci_code: "G", name: "gram", factor: None,
        dimension: Dimension([1, 0, 0, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["gram", "gramme"],
    },
    UnitRecord {
        cs_code: "rad", ci_code: "RAD", name: "radian", factor: None,
        dimension: Dimension([0, 0, 0, 1, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["radian"],
    },
    UnitRecord {
        cs_code: "K", ci_code: "K", name: "kelvin", factor: None,
        dimension: Dimension([0, 0, 0, 0, 1, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["kelvin"],
    },
    UnitRecord {
        cs_code: "C", ci_code: "C", name: "coulomb", factor: None,
        dimension: Dimension([0, 0, 0, 0, 0, 1, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["coulomb"],
    },
    UnitRecord {
        cs_code: "cd", ci_code: "CD", name: "candela", factor: None,
        dimension: Dimension([0, 0, 0, 0, 0, 0, 1]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["candela"],
    },
    // Derived metric units, coherent (factor 1.0) or not.
    UnitRecord {
        cs_code: "L", ci_code: "L", name: "liter", factor: Some(1.0e-3),
        dimension: Dimension([0, 3, 0, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["liter", "litre"],
    },
    UnitRecord {
        cs_code: "Hz", ci_code: "HZ", name: "hertz", factor: Some(1.0),
        dimension: Dimension([0, 0, -1, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["hertz"],
    },
    UnitRecord {
        cs_code: "N", ci_code: "N", name: "newton", factor: Some(1.0),
        dimension: Dimension([1, 1, -2, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["newton"],
    },
    UnitRecord {
        cs_code: "Pa", ci_code: "PAL", name: "pascal", factor: Some(1.0),
        dimension: Dimension([1, -1, -2, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["pascal"],
    },
    UnitRecord {
        cs_code: "J", ci_code: "J", name: "joule", factor: Some(1.0),
        dimension: Dimension([1, 2, -2, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["joule"],
    },
    UnitRecord {
        cs_code: "W", ci_code: "W", name: "watt", factor: Some(1.0),
        dimension: Dimension([1, 2, -3, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["watt"],
    },
    UnitRecord {
        cs_code: "V", ci_code: "V", name: "volt", factor: Some(1.0),
        dimension: Dimension([1, 2, -2, 0, 0, -1, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["volt"],
    },
    UnitRecord {
        cs_code: "mol", ci_code: "MOL", name: "mole", factor: Some(1.0),
        dimension: DIMLESS, is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["mole"],
    },
    // Non-metric time units whose codes collide with prefix letters; exact
    // atom lookup always runs before prefix splitting, so `h` (hour) and
    // `d` (day) resolve correctly and `hPa`/`daN`-style prefixed atoms are
    // unaffected.
    UnitRecord {
        cs_code: "min", ci_code: "MIN", name: "minute", factor: Some(60.0),
        dimension: Dimension([0, 0, 1, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["minute"],
    },
    UnitRecord {
        cs_code: "h", ci_code: "HR", name: "hour", factor: Some(3600.0),
        dimension: Dimension([0, 0, 1, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["hour"],
    },
    UnitRecord {
        cs_code: "d", ci_code: "D", name: "day", factor: Some(86400.0),
        dimension: Dimension([0, 0, 1, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["day"],
    },
    UnitRecord {
        cs_code: "wk", ci_code: "WK", name: "week", factor: Some(604_800.0),
        dimension: Dimension([0, 0, 1, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["week"],
    },
    UnitRecord {
        cs_code: "a", ci_code: "AR", name: "year", factor: Some(3.1556952e7),
        dimension: Dimension([0, 0, 1, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["year", "annum"],
    },
    // Non-metric mass unit used in seed scenario 4.
    UnitRecord {
        cs_code: "[car_m]", ci_code: "[CAR_M]", name: "carat", factor: Some(0.2),
        dimension: Dimension([1, 0, 0, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["carat"],
    },
    // Special (non-ratio) units.
    UnitRecord {
        cs_code: "Cel", ci_code: "CEL", name: "degree Celsius", factor: Some(1.0),
        dimension: Dimension([0, 0, 0, 0, 1, 0, 0]), is_metric: false,
        is_arbitrary: false, special: Some("Cel"), synonyms: &["celsius", "degC"],
    },
    UnitRecord {
        cs_code: "[degF]", ci_code: "[DEGF]", name: "degree Fahrenheit", factor: Some(1.0),
        dimension: Dimension([0, 0, 0, 0, 1, 0, 0]), is_metric: false,
        is_arbitrary: false, special: Some("[degF]"), synonyms: &["fahrenheit"],
    },
    UnitRecord {
        cs_code: "[degR]", ci_code: "[DEGR]", name: "degree Rankine", factor: Some(1.0),
        dimension: Dimension([0, 0, 0, 0, 1, 0, 0]), is_metric: false,
        is_arbitrary: false, special: Some("[degR]"), synonyms: &["rankine"],
    },
    UnitRecord {
        cs_code: "B", ci_code: "B", name: "bel", factor: Some(1.0),
        dimension: DIMLESS, is_metric: false,
        is_arbitrary: false, special: Some("B"), synonyms: &["bel"],
    },
    UnitRecord {
        cs_code: "dB", ci_code: "DB", name: "decibel", factor: Some(1.0),
        dimension: DIMLESS, is_metric: false,
        is_arbitrary: false, special: Some("dB"), synonyms: &["decibel"],
    },
    UnitRecord {
        cs_code: "Np", ci_code: "NEP", name: "neper", factor: Some(1.0),
        dimension: DIMLESS, is_metric: false,
        is_arbitrary: false, special: Some("Np"), synonyms: &["neper"],
    },
    UnitRecord {
        cs_code: "pH", ci_code: "[PH]", name: "pH", factor: Some(1.0),
        dimension: DIMLESS, is_metric: false,
        is_arbitrary: false, special: Some("pH"), synonyms: &["ph"],
    },
    UnitRecord {
        cs_code: "B[SPL]", ci_code: "B[SPL]", name: "bel sound pressure", factor: Some(1.0),
        dimension: Dimension([1, -1, -2, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: Some("B[SPL]"), synonyms: &[],
    },
    UnitRecord {
        cs_code: "B[V]", ci_code: "B[V]", name: "bel volt", factor: Some(1.0),
        dimension: Dimension([1, 2, -2, 0, 0, -1, 0]), is_metric: false,
        is_arbitrary: false, special: Some("B[V]"), synonyms: &[],
    },
    UnitRecord {
        cs_code: "B[W]", ci_code: "B[W]", name: "bel watt", factor: Some(1.0),
        dimension: Dimension([1, 2, -3, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: Some("B[W]"), synonyms: &[],
    },
    // Further non-metric/derived units rounding out the representative
    // catalog for realistic clinical and physical expressions.
    UnitRecord {
        cs_code: "%", ci_code: "%", name: "percent", factor: Some(0.01),
        dimension: DIMLESS, is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["percent"],
    },
    UnitRecord {
        cs_code: "eq", ci_code: "EQ", name: "equivalent", factor: Some(1.0),
        dimension: DIMLESS, is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["equivalent", "equivalents"],
    },
    UnitRecord {
        cs_code: "U", ci_code: "U", name: "enzyme unit", factor: Some(1.0),
        dimension: DIMLESS, is_metric: true,
        is_arbitrary: true, special: None, synonyms: &["enzyme unit"],
    },
    UnitRecord {
        cs_code: "bar", ci_code: "BAR", name: "bar", factor: Some(1.0e5),
        dimension: Dimension([1, -1, -2, 0, 0, 0, 0]), is_metric: true,
        is_arbitrary: false, special: None, synonyms: &["bar"],
    },
    UnitRecord {
        cs_code: "atm", ci_code: "ATM", name: "standard atmosphere", factor: Some(101_325.0),
        dimension: Dimension([1, -1, -2, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["atmosphere"],
    },
    UnitRecord {
        cs_code: "mm[Hg]", ci_code: "MM[HG]", name: "millimeter of mercury", factor: Some(133.322),
        dimension: Dimension([1, -1, -2, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["millimeter of mercury"],
    },
    UnitRecord {
        cs_code: "[in_i]", ci_code: "[IN_I]", name: "inch", factor: Some(0.0254),
        dimension: Dimension([0, 1, 0, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["inch"],
    },
    UnitRecord {
        cs_code: "[ft_i]", ci_code: "[FT_I]", name: "foot", factor: Some(0.3048),
        dimension: Dimension([0, 1, 0, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["foot"],
    },
    UnitRecord {
        cs_code: "[lb_av]", ci_code: "[LB_AV]", name: "pound", factor: Some(453.592_37),
        dimension: Dimension([1, 0, 0, 0, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["pound"],
    },
    UnitRecord {
        cs_code: "deg", ci_code: "DEG", name: "degree", factor: Some(std::f64::consts::PI / 180.0),
        dimension: Dimension([0, 0, 0, 1, 0, 0, 0]), is_metric: false,
        is_arbitrary: false, special: None, synonyms: &["degree"],
    },
    // Arbitrary (non-commensurable) units.
    UnitRecord {
        cs_code: "[iU]", ci_code: "[IU]", name: "international unit", factor: Some(1.0),
        dimension: DIMLESS, is_metric: false,
        is_arbitrary: true, special: None, synonyms: &["international unit", "IU"],
    },
    UnitRecord {
        cs_code: "[arb'U]", ci_code: "[ARB'U]", name: "arbitrary unit", factor: Some(1.0),
        dimension: DIMLESS, is_metric: false,
        is_arbitrary: true, special: None, synonyms: &["arbitrary unit"],
    },
];

pub fn prefix_by_cs(code: &str) -> Option<&'static Prefix> {
    PREFIX_INDEX.get(code).map(|&i| &PREFIXES[i])
}

pub fn atom_by_cs(code: &str) -> Option<&'static UnitRecord> {
    UNITS.iter().find(|u| u.cs_code == code)
}

pub fn atom_by_ci(code: &str) -> Option<&'static UnitRecord> {
    let upper = code.to_uppercase();
    UNITS.iter().find(|u| u.ci_code.eq_ignore_ascii_case(&upper))
}

pub fn atom_by_name(name: &str) -> Option<&'static UnitRecord> {
    UNITS.iter().find(|u| u.name.eq_ignore_ascii_case(name))
}

pub fn atoms_by_synonym(text: &str) -> Vec<&'static UnitRecord> {
    UNITS
        .iter()
        .filter(|u| u.synonyms.iter().any(|s| s.eq_ignore_ascii_case(text)))
        .collect()
}

pub fn atoms_by_dimension(dim: Dimension) -> Vec<&'static UnitRecord> {
    UNITS.iter().filter(|u| u.dimension == dim).collect()
}

/// All registered prefixes and atoms, longest code first, used by atom
/// resolution to try longer prefixes before shorter ones (`da` before `d`).
pub fn prefixes_longest_first() -> Vec<&'static Prefix> {
    let mut v: Vec<&'static Prefix> = PREFIXES.iter().collect();
    v.sort_by_key(|p| std::cmp::Reverse(p.cs_code.len()));
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_atoms_have_no_factor() {
        assert!(atom_by_cs("g").unwrap().factor.is_none());
        assert!(atom_by_cs("m").unwrap().factor.is_none());
    }

    #[test]
    fn hour_exact_atom_beats_hecto_prefix() {
        let hour = atom_by_cs("h").unwrap();
        assert_eq!(hour.name, "hour");
        assert!(!hour.is_metric);
    }

    #[test]
    fn carat_factor_matches_jewellery_convention() {
        assert_eq!(atom_by_cs("[car_m]").unwrap().factor, Some(0.2));
    }

    #[test]
    fn prefix_index_agrees_with_prefixes_array() {
        for (i, p) in PREFIXES.iter().enumerate() {
            assert_eq!(PREFIX_INDEX.get(p.cs_code), Some(&i));
            assert_eq!(prefix_by_cs(p.cs_code).unwrap().exponent, p.exponent);
        }
    }

    #[test]
    fn prefixes_sorted_longest_first_puts_deka_before_deci() {
        let sorted = prefixes_longest_first();
        let da_pos = sorted.iter().position(|p| p.cs_code == "da").unwrap();
        let d_pos = sorted.iter().position(|p| p.cs_code == "d").unwrap();
        assert!(da_pos < d_pos);
    }

    #[test]
    fn dimension_lookup_finds_all_time_units() {
        let time_dim = Dimension([0, 0, 1, 0, 0, 0, 0]);
        let found = atoms_by_dimension(time_dim);
        assert!(found.iter().any(|u| u.cs_code == "s"));
        assert!(found.iter().any(|u| u.cs_code == "h"));
    }
}
