//! Special Functions registry (Component D).
//!
//! A process-wide, stateless registry mapping a special-unit name to a pure
//! `(from, to)` function pair: `from(x)` maps a value on the special scale
//! to the unit's ratio-scale base, `to(x)` is its inverse. Handlers are
//! objects behind a `SpecialUnitHandler` trait
//! (`TemperatureHandler`/`LogarithmicHandler`) rather than a single lookup
//! function, because the trait additionally reports the unit's dimension,
//! which the parser needs when building a `Unit` from a special atom.
//! Arbitrary (bracket-delimited) units such as `[iU]` never reach this
//! registry at all: the parser builds them via `Unit::arbitrary` directly,
//! and the Conversion Engine rejects them before any conversion math runs.

use crate::dimension::Dimension;
use crate::error::UcumError;
use crate::precision::{Number, from_f64, to_f64};

/// A resolved forward/inverse function pair for one special-unit name.
/// Fallible: a value a handler explicitly rejects (the logarithmic family's
/// non-positive-input guard) propagates as an error rather than being
/// silently passed through unconverted.
pub struct SpecialFnPair {
    pub from: Box<dyn Fn(Number) -> Result<Number, UcumError> + Send + Sync>,
    pub to: Box<dyn Fn(Number) -> Result<Number, UcumError> + Send + Sync>,
}

pub trait SpecialUnitHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn can_handle(&self, unit_code: &str) -> bool;
    fn convert_from(&self, value: Number, unit_code: &str) -> Result<Number, UcumError>;
    fn convert_to(&self, value: Number, unit_code: &str) -> Result<Number, UcumError>;
    fn dimension(&self, unit_code: &str) -> Dimension;
}

/// Handler for temperature units requiring both a scale and an offset:
/// Celsius, Fahrenheit, Rankine.
pub struct TemperatureHandler;

impl SpecialUnitHandler for TemperatureHandler {
    fn name(&self) -> &'static str {
        "Temperature"
    }

    fn can_handle(&self, unit_code: &str) -> bool {
        matches!(unit_code, "Cel" | "[degF]" | "[degR]")
    }

    fn convert_from(&self, value: Number, unit_code: &str) -> Result<Number, UcumError> {
        match unit_code {
            "Cel" => Ok(value + from_f64(273.15)),
            "[degF]" => Ok((value + from_f64(459.67)) * from_f64(5.0 / 9.0)),
            "[degR]" => Ok(value * from_f64(5.0 / 9.0)),
            _ => Err(UcumError::unknown_special_function(unit_code)),
        }
    }

    fn convert_to(&self, value: Number, unit_code: &str) -> Result<Number, UcumError> {
        match unit_code {
            "Cel" => Ok(value - from_f64(273.15)),
            "[degF]" => Ok(value * from_f64(9.0 / 5.0) - from_f64(459.67)),
            "[degR]" => Ok(value * from_f64(9.0 / 5.0)),
            _ => Err(UcumError::unknown_special_function(unit_code)),
        }
    }

    fn dimension(&self, _unit_code: &str) -> Dimension {
        Dimension([0, 0, 0, 0, 1, 0, 0])
    }
}

/// Handler for logarithmic scales: Bel/decibel variants, Neper, pH family.
pub struct LogarithmicHandler;

impl LogarithmicHandler {
    fn base(unit_code: &str) -> f64 {
        match unit_code {
            "Np" | "ln" => std::f64::consts::E,
            "log2" => 2.0,
            _ => 10.0,
        }
    }

    fn scale(unit_code: &str) -> f64 {
        match unit_code {
            "dB" => 10.0,
            "pH" | "pOH" | "pKa" | "pKw" | "pK" => -1.0,
            "B[SPL]" | "B[V]" | "B[mV]" | "B[uV]" | "B[10.nV]" => 20.0,
            "B[W]" | "B[kW]" => 10.0,
            _ => 1.0,
        }
    }

    fn bel_reference(unit_code: &str) -> f64 {
        match unit_code {
            "B[SPL]" => 2e-5,
            "B[V]" => 1.0,
            "B[mV]" => 1e-3,
            "B[uV]" => 1e-6,
            "B[10.nV]" => 10e-9,
            "B[W]" => 1.0,
            "B[kW]" => 1e3,
            _ => 1.0,
        }
    }
}

impl SpecialUnitHandler for LogarithmicHandler {
    fn name(&self) -> &'static str {
        "Logarithmic"
    }

    fn can_handle(&self, unit_code: &str) -> bool {
        matches!(
            unit_code,
            "B" | "dB"
                | "Np"
                | "pH"
                | "pOH"
                | "pKa"
                | "pKw"
                | "pK"
                | "ln"
                | "log"
                | "log2"
                | "B[SPL]"
                | "B[V]"
                | "B[mV]"
                | "B[uV]"
                | "B[10.nV]"
                | "B[W]"
                | "B[kW]"
        )
    }

    fn convert_from(&self, value: Number, unit_code: &str) -> Result<Number, UcumError> {
        let val = to_f64(value);
        let base = Self::base(unit_code);
        let scale = Self::scale(unit_code);
        let result = match unit_code {
            "B" | "Np" | "ln" | "log" | "log2" => base.powf(val),
            "dB" => base.powf(val / scale),
            "B[SPL]" | "B[V]" | "B[mV]" | "B[uV]" | "B[10.nV]" | "B[W]" | "B[kW]" => {
                Self::bel_reference(unit_code) * base.powf(val / scale)
            }
            "pH" | "pOH" | "pKa" | "pKw" | "pK" => base.powf(scale * val),
            _ => return Err(UcumError::unknown_special_function(unit_code)),
        };
        Ok(from_f64(result))
    }

    fn convert_to(&self, value: Number, unit_code: &str) -> Result<Number, UcumError> {
        let val = to_f64(value);
        if matches!(
            unit_code,
            "pH" | "pOH" | "pKa" | "pKw" | "pK" | "B" | "dB" | "Np" | "ln" | "log" | "log2"
        ) && val <= 0.0
        {
            return Err(UcumError::invalid_expression(format!(
                "cannot take the logarithm of a non-positive value for '{unit_code}'"
            )));
        }
        let base = Self::base(unit_code);
        let scale = Self::scale(unit_code);
        let result = match unit_code {
            "B" | "ln" => val.log(base),
            "dB" | "pH" | "pOH" | "pKa" | "pKw" | "pK" => scale * val.log(base),
            "Np" => val.ln(),
            "log" => val.log10(),
            "log2" => val.log2(),
            "B[SPL]" | "B[V]" | "B[mV]" | "B[uV]" | "B[10.nV]" | "B[W]" | "B[kW]" => {
                scale * (val / Self::bel_reference(unit_code)).log(base)
            }
            _ => return Err(UcumError::unknown_special_function(unit_code)),
        };
        Ok(from_f64(result))
    }

    fn dimension(&self, unit_code: &str) -> Dimension {
        match unit_code {
            "B[SPL]" => Dimension([1, -1, -2, 0, 0, 0, 0]),
            "B[V]" | "B[mV]" | "B[uV]" | "B[10.nV]" => Dimension([1, 2, -3, -1, 0, 0, 0]),
            "B[W]" | "B[kW]" => Dimension([1, 2, -3, 0, 0, 0, 0]),
            _ => Dimension::zero(),
        }
    }
}

/// Registry of special-unit handlers, searched in order.
pub struct SpecialUnitRegistry {
    handlers: Vec<Box<dyn SpecialUnitHandler>>,
}

impl SpecialUnitRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![Box::new(TemperatureHandler), Box::new(LogarithmicHandler)],
        }
    }

    pub fn find(&self, unit_code: &str) -> Option<&dyn SpecialUnitHandler> {
        self.handlers
            .iter()
            .find(|h| h.can_handle(unit_code))
            .map(|h| h.as_ref())
    }
}

impl Default for SpecialUnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    static ref REGISTRY: SpecialUnitRegistry = SpecialUnitRegistry::new();
}

/// `forName(name) -> {from, to}` lookup required by the Unit Algebra's
/// `convert_from`. Fails with `UnknownSpecialFunction` for a name no
/// handler recognises (an atom-table data bug, not a user input error).
pub fn pair(name: &str) -> Result<SpecialFnPair, UcumError> {
    if REGISTRY.find(name).is_none() {
        return Err(UcumError::unknown_special_function(name));
    }
    let from_name = name.to_string();
    let to_name = name.to_string();
    Ok(SpecialFnPair {
        from: Box::new(move |x| {
            REGISTRY
                .find(&from_name)
                .ok_or_else(|| UcumError::unknown_special_function(from_name.clone()))
                .and_then(|h| h.convert_from(x, &from_name))
        }),
        to: Box::new(move |x| {
            REGISTRY
                .find(&to_name)
                .ok_or_else(|| UcumError::unknown_special_function(to_name.clone()))
                .and_then(|h| h.convert_to(x, &to_name))
        }),
    })
}

pub fn dimension_for(name: &str) -> Option<Dimension> {
    REGISTRY.find(name).map(|h| h.dimension(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_roundtrips() {
        let handler = TemperatureHandler;
        let k = handler.convert_from(from_f64(0.0), "Cel").unwrap();
        assert!((to_f64(k) - 273.15).abs() < 1e-9);
        let c = handler.convert_to(k, "Cel").unwrap();
        assert!(to_f64(c).abs() < 1e-9);
    }

    #[test]
    fn fahrenheit_zero_is_255_372_kelvin() {
        let handler = TemperatureHandler;
        let k = handler.convert_from(from_f64(0.0), "[degF]").unwrap();
        assert!((to_f64(k) - 255.372_222_222_222_2).abs() < 1e-6);
    }

    #[test]
    fn decibel_roundtrips() {
        let handler = LogarithmicHandler;
        let ratio = handler.convert_from(from_f64(20.0), "dB").unwrap();
        assert!((to_f64(ratio) - 100.0).abs() < 1e-9);
        let db = handler.convert_to(ratio, "dB").unwrap();
        assert!((to_f64(db) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_name_is_an_internal_error() {
        let err = pair("not-a-function").unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn pair_propagates_non_positive_logarithm_error_instead_of_passthrough() {
        let db = pair("dB").unwrap();
        let err = (db.to)(from_f64(-1.0)).unwrap_err();
        assert!(!err.is_internal());
    }
}
