//! Suggestion Index (Component G): turns an unrecognised token into a short
//! ranked list of atoms the caller probably meant.
//!
//! Layers a small table of common-typo corrections in front of
//! `fuzzy-matcher`'s `SkimMatcherV2` scoring over the full atom table. Exact
//! synonym matches (full-word names like "meter") always win over fuzzy
//! scoring; the fuzzy pass only runs once those are exhausted.

use crate::registry::{self, UnitRecord};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

pub struct SuggestionEngine {
    matcher: SkimMatcherV2,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Up to `limit` candidate atoms for an unrecognised token, ranked:
    /// known-typo correction, then exact synonym, then fuzzy code/name match.
    pub fn suggest(&self, token: &str, limit: usize) -> Vec<&'static UnitRecord> {
        if let Some(atom) = Self::common_typo(token).and_then(registry::atom_by_cs) {
            return vec![atom];
        }
        let synonyms = registry::atoms_by_synonym(token);
        if !synonyms.is_empty() {
            return synonyms.into_iter().take(limit).collect();
        }
        let mut scored: Vec<(i64, &'static UnitRecord)> = registry::UNITS
            .iter()
            .filter_map(|u| {
                let by_code = self.matcher.fuzzy_match(u.cs_code, token).unwrap_or(0);
                let by_name = self.matcher.fuzzy_match(u.name, token).unwrap_or(0);
                let score = by_code.max(by_name);
                (score > 0).then_some((score, u))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, u)| u).collect()
    }

    /// A short table of spellings that show up often enough in practice
    /// (full English names, common misspellings of special units) to be
    /// worth resolving directly rather than leaving to fuzzy scoring.
    fn common_typo(token: &str) -> Option<&'static str> {
        match token {
            "degC" | "degc" | "celsius" | "Celsius" => Some("Cel"),
            "degF" | "fahrenheit" | "Fahrenheit" => Some("[degF]"),
            "meter" | "metre" | "meters" | "metres" => Some("m"),
            "gram" | "grams" | "gramme" | "grammes" => Some("g"),
            "second" | "seconds" | "sec" | "secs" => Some("s"),
            "liter" | "litre" | "liters" | "litres" => Some("L"),
            "mole" | "moles" => Some("mol"),
            _ => None,
        }
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_typo_resolves_directly() {
        let engine = SuggestionEngine::new();
        let hits = engine.suggest("celsius", 3);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].cs_code, "Cel");
    }

    #[test]
    fn fuzzy_match_finds_close_codes() {
        let engine = SuggestionEngine::new();
        let hits = engine.suggest("meterz", 3);
        assert!(hits.iter().any(|u| u.cs_code == "m"));
    }

    #[test]
    fn suggestions_are_capped_at_limit() {
        let engine = SuggestionEngine::new();
        let hits = engine.suggest("e", 2);
        assert!(hits.len() <= 2);
    }
}
