//! Conversion result caching: a process-wide cache of `validate` results and
//! ratio-scale conversion factors, reached through `with_global_cache`.
//! Parsing is the hot path under repeated conversion of the same unit pair,
//! so both the parsed `ValidateResult` and the numeric factor for a
//! `(from, to)` pair are memoized, each behind its own hit/miss counters.

use crate::engine::{self, ValidateResult};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub validate_hits: u64,
    pub validate_misses: u64,
    pub factor_hits: u64,
    pub factor_misses: u64,
}

impl CacheStats {
    pub fn validate_hit_ratio(&self) -> f64 {
        ratio(self.validate_hits, self.validate_misses)
    }

    pub fn factor_hit_ratio(&self) -> f64 {
        ratio(self.factor_hits, self.factor_misses)
    }
}

fn ratio(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// A process-wide cache of `validate` results and ratio-scale conversion
/// factors, keyed by the caller's literal input strings.
pub struct EvaluationCache {
    validate_cache: Mutex<HashMap<String, ValidateResult>>,
    factor_cache: Mutex<HashMap<(String, String), f64>>,
    stats: Mutex<CacheStats>,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self {
            validate_cache: Mutex::new(HashMap::new()),
            factor_cache: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn validate_cached(&self, expression: &str) -> ValidateResult {
        if let Some(hit) = self.validate_cache.lock().unwrap().get(expression) {
            self.stats.lock().unwrap().validate_hits += 1;
            return hit.clone();
        }
        self.stats.lock().unwrap().validate_misses += 1;
        let result = engine::validate(expression, true);
        self.validate_cache
            .lock()
            .unwrap()
            .insert(expression.to_string(), result.clone());
        result
    }

    /// Cache a pure ratio-scale conversion factor for a `(from, to)` pair.
    /// Special-unit and mass/mole-bridged conversions are not linear in the
    /// input value, so they are never stored here.
    pub fn factor_cached(&self, from: &str, to: &str) -> Option<f64> {
        let key = (from.to_string(), to.to_string());
        if let Some(&factor) = self.factor_cache.lock().unwrap().get(&key) {
            self.stats.lock().unwrap().factor_hits += 1;
            return Some(factor);
        }
        self.stats.lock().unwrap().factor_misses += 1;
        let result = engine::convert_unit_to(from, 1.0, to, false, None);
        let factor = result.to_val?;
        self.factor_cache.lock().unwrap().insert(key, factor);
        Some(factor)
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock().unwrap()
    }

    pub fn clear(&self) {
        self.validate_cache.lock().unwrap().clear();
        self.factor_cache.lock().unwrap().clear();
        *self.stats.lock().unwrap() = CacheStats::default();
    }

    pub fn sizes(&self) -> (usize, usize) {
        (
            self.validate_cache.lock().unwrap().len(),
            self.factor_cache.lock().unwrap().len(),
        )
    }
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_CACHE: EvaluationCache = EvaluationCache::new();
}

pub fn with_global_cache<F, R>(f: F) -> R
where
    F: FnOnce(&EvaluationCache) -> R,
{
    f(&GLOBAL_CACHE)
}

pub fn clear_global_cache() {
    with_global_cache(EvaluationCache::clear);
}

pub fn get_cache_stats() -> CacheStats {
    with_global_cache(EvaluationCache::stats)
}

pub fn get_cache_sizes() -> (usize, usize) {
    with_global_cache(EvaluationCache::sizes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_validation_hits_the_cache() {
        let cache = EvaluationCache::new();
        let _ = cache.validate_cached("kg.m/s2");
        let _ = cache.validate_cached("kg.m/s2");
        let stats = cache.stats();
        assert_eq!(stats.validate_hits, 1);
        assert_eq!(stats.validate_misses, 1);
    }

    #[test]
    fn factor_cache_stores_ratio_scale_conversions() {
        let cache = EvaluationCache::new();
        let a = cache.factor_cached("g", "[car_m]").unwrap();
        let b = cache.factor_cached("g", "[car_m]").unwrap();
        assert!((a - b).abs() < 1e-12);
        assert_eq!(cache.stats().factor_hits, 1);
    }

    #[test]
    fn clear_resets_sizes_and_stats() {
        let cache = EvaluationCache::new();
        let _ = cache.validate_cached("m");
        cache.clear();
        assert_eq!(cache.sizes(), (0, 0));
        assert_eq!(cache.stats().validate_hits, 0);
    }
}
