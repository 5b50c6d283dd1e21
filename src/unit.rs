//! Unit Algebra (Component C): the carrier type the parser reduces an
//! expression down to, and the operations that combine and convert it.
//!
//! A `Unit` pairs a numeric factor with a `Dimension` and a `ConvKind` tag
//! for whether it converts linearly (`Ratio`) or through a named special
//! function: ratio-scale multiplication, division, inversion and integer
//! powers are only ever valid between two ratio-scale units, and a special
//! unit may only ever appear bare on one side of a conversion, never
//! combined algebraically with another unit.

use crate::dimension::{self, Dimension};
use crate::error::UcumError;
use crate::precision::to_f64;
use crate::special_units;
use std::collections::BTreeMap;

/// How a unit's coherent value relates to its own numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvKind {
    /// `value * magnitude` converts to the dimension's ratio-scale base.
    Ratio,
    /// `value` is converted through the named special function pair,
    /// scaled by `inner_scale` on the way in and out (see
    /// `to_coherent_value`/`from_coherent_value`); `magnitude` stays `1.0`
    /// for a bare special unit and only `inner_scale` moves when one is
    /// combined with a dimensionless scalar (a prefix, a leading numeric
    /// literal) via `multiply`/`multiply_scalar`.
    Special { name: String, inner_scale: f64 },
}

/// A fully reduced unit: one numeric coherent factor, one dimension
/// vector, one conversion kind. Built by the parser from an expression's
/// atoms and combined by the operations below; never partially applied.
#[derive(Debug, Clone)]
pub struct Unit {
    pub magnitude: f64,
    pub dimension: Dimension,
    pub conv: ConvKind,
    pub is_arbitrary: bool,
    /// The textual code this unit was built from or derived from, used
    /// only to phrase error messages (`"Sorry. {code} cannot be..."`).
    pub code: String,
}

/// Base atoms in dimension-index order, used to build the canonical
/// coherent-unit code for `convert_to_base_units`.
const BASE_ATOM_CODES: [&str; dimension::DIM_LEN] = ["g", "m", "s", "rad", "K", "C", "cd"];

impl Unit {
    pub fn dimensionless(code: impl Into<String>) -> Self {
        Self {
            magnitude: 1.0,
            dimension: Dimension::zero(),
            conv: ConvKind::Ratio,
            is_arbitrary: false,
            code: code.into(),
        }
    }

    pub fn ratio(magnitude: f64, dimension: Dimension, code: impl Into<String>) -> Self {
        Self {
            magnitude,
            dimension,
            conv: ConvKind::Ratio,
            is_arbitrary: false,
            code: code.into(),
        }
    }

    pub fn special(name: impl Into<String>, dimension: Dimension, code: impl Into<String>) -> Self {
        Self {
            magnitude: 1.0,
            dimension,
            conv: ConvKind::Special { name: name.into(), inner_scale: 1.0 },
            is_arbitrary: false,
            code: code.into(),
        }
    }

    /// A bare positive-integer (or sibling-number-repaired decimal) literal:
    /// dimensionless, magnitude `n`. Covers the grammar's `Number` production.
    pub fn numeric(magnitude: f64, code: impl Into<String>) -> Self {
        Self {
            magnitude,
            dimension: Dimension::zero(),
            conv: ConvKind::Ratio,
            is_arbitrary: false,
            code: code.into(),
        }
    }

    pub fn arbitrary(dimension: Dimension, code: impl Into<String>) -> Self {
        Self {
            magnitude: 1.0,
            dimension,
            conv: ConvKind::Ratio,
            is_arbitrary: true,
            code: code.into(),
        }
    }

    pub fn is_ratio(&self) -> bool {
        matches!(self.conv, ConvKind::Ratio)
    }

    /// Scale this unit by a plain numeric factor (a prefix, or a leading
    /// numeric literal like `78.4` in `78.4(mmol/L)`). A ratio-scale unit
    /// has its `magnitude` scaled; a special unit has its `inner_scale`
    /// scaled instead, since its `magnitude` plays no part in its own
    /// conversion math.
    pub fn multiply_scalar(&self, factor: f64) -> Result<Unit, UcumError> {
        let (magnitude, conv) = match &self.conv {
            ConvKind::Ratio => (self.magnitude * factor, ConvKind::Ratio),
            ConvKind::Special { name, inner_scale } => (
                self.magnitude,
                ConvKind::Special { name: name.clone(), inner_scale: inner_scale * factor },
            ),
        };
        Ok(Unit {
            magnitude,
            dimension: self.dimension,
            conv,
            is_arbitrary: self.is_arbitrary,
            code: self.code.clone(),
        })
    }

    /// Ratio-scale `.` usually folds magnitudes and adds dimensions. When
    /// exactly one side is special and the other is a dimensionless ratio
    /// unit with no conversion of its own (a bare scalar), the result stays
    /// special: the ratio side's magnitude rolls into the special side's
    /// `inner_scale` instead of the two being combined as ordinary ratio
    /// units. Combining two special units, or a special unit with a
    /// dimensioned ratio unit, is never valid.
    pub fn multiply(&self, other: &Unit) -> Result<Unit, UcumError> {
        match (&self.conv, &other.conv) {
            (ConvKind::Ratio, ConvKind::Ratio) => Ok(Unit {
                magnitude: self.magnitude * other.magnitude,
                dimension: self.dimension.add(&other.dimension),
                conv: ConvKind::Ratio,
                is_arbitrary: self.is_arbitrary || other.is_arbitrary,
                code: format!("{}.{}", self.code, other.code),
            }),
            (ConvKind::Special { name, inner_scale }, ConvKind::Ratio)
                if other.dimension.is_zero() =>
            {
                Ok(Unit {
                    magnitude: self.magnitude,
                    dimension: self.dimension,
                    conv: ConvKind::Special {
                        name: name.clone(),
                        inner_scale: inner_scale * other.magnitude,
                    },
                    is_arbitrary: self.is_arbitrary || other.is_arbitrary,
                    code: format!("{}.{}", self.code, other.code),
                })
            }
            (ConvKind::Ratio, ConvKind::Special { name, inner_scale })
                if self.dimension.is_zero() =>
            {
                Ok(Unit {
                    magnitude: other.magnitude,
                    dimension: other.dimension,
                    conv: ConvKind::Special {
                        name: name.clone(),
                        inner_scale: inner_scale * self.magnitude,
                    },
                    is_arbitrary: self.is_arbitrary || other.is_arbitrary,
                    code: format!("{}.{}", self.code, other.code),
                })
            }
            _ => Err(UcumError::new(crate::error::ErrorKind::NonRatioMultiplication)),
        }
    }

    /// Fold a whole slice of factors into one product; used by the parser
    /// once it has collected every term of a `.`-joined chain.
    pub fn multiply_these(units: &[Unit]) -> Result<Unit, UcumError> {
        let mut iter = units.iter();
        let first = iter
            .next()
            .cloned()
            .unwrap_or_else(|| Unit::dimensionless(""));
        iter.try_fold(first, |acc, u| acc.multiply(u))
    }

    pub fn divide(&self, other: &Unit) -> Result<Unit, UcumError> {
        if !self.is_ratio() || !other.is_ratio() {
            return Err(UcumError::new(crate::error::ErrorKind::NonRatioDivision));
        }
        if other.magnitude == 0.0 {
            return Err(UcumError::invalid_expression("division by a zero-magnitude unit"));
        }
        Ok(Unit {
            magnitude: self.magnitude / other.magnitude,
            dimension: self.dimension.sub(&other.dimension),
            conv: ConvKind::Ratio,
            is_arbitrary: self.is_arbitrary || other.is_arbitrary,
            code: format!("{}/{}", self.code, other.code),
        })
    }

    pub fn invert(&self) -> Result<Unit, UcumError> {
        if !self.is_ratio() {
            return Err(UcumError::new(crate::error::ErrorKind::NonRatioInvert));
        }
        if self.magnitude == 0.0 {
            return Err(UcumError::invalid_expression("cannot invert a zero-magnitude unit"));
        }
        Ok(Unit {
            magnitude: 1.0 / self.magnitude,
            dimension: self.dimension.minus(),
            conv: ConvKind::Ratio,
            is_arbitrary: self.is_arbitrary,
            code: invert_code(&self.code),
        })
    }

    /// Raise to an integer power. Non-integer exponents are rejected by
    /// the parser before this is ever called (see `ErrorKind::NonIntegerExponent`).
    pub fn power(&self, exponent: i32) -> Result<Unit, UcumError> {
        if !self.is_ratio() {
            return Err(UcumError::new(crate::error::ErrorKind::NonRatioPower));
        }
        Ok(Unit {
            magnitude: self.magnitude.powi(exponent),
            dimension: self.dimension.mul(exponent),
            conv: ConvKind::Ratio,
            is_arbitrary: self.is_arbitrary,
            code: format!("{}{}", self.code, exponent),
        })
    }

    /// `power` for a rational exponent (UCUM itself only defines integer
    /// exponents, so this is an explicit opt-in rather than the parser's
    /// default path): accepts any finite `p`, but only succeeds when every
    /// resulting dimension component lands exactly on an integer, rounding
    /// within a small epsilon to absorb floating-point noise from `p`
    /// itself (e.g. `p = 0.5` on `dim = [2, 4, ...]`).
    pub fn power_checked(&self, p: f64) -> Result<Unit, UcumError> {
        if !self.is_ratio() {
            return Err(UcumError::new(crate::error::ErrorKind::NonRatioPower));
        }
        let mut dims = [0i8; dimension::DIM_LEN];
        for i in 0..dimension::DIM_LEN {
            let scaled = self.dimension.get(i) as f64 * p;
            let rounded = scaled.round();
            if (scaled - rounded).abs() > 1e-9 {
                return Err(UcumError::new(crate::error::ErrorKind::NonIntegerExponent {
                    value: p,
                }));
            }
            dims[i] = rounded as i8;
        }
        Ok(Unit {
            magnitude: self.magnitude.powf(p),
            dimension: Dimension(dims),
            conv: ConvKind::Ratio,
            is_arbitrary: self.is_arbitrary,
            code: format!("{}^{}", self.code, p),
        })
    }

    /// The three-step conversion algorithm: reject arbitrary units, check
    /// dimensional commensurability, then convert through each side's own
    /// conversion kind via a shared coherent intermediate. `self` is the
    /// destination unit; `value` is expressed in `from_unit`, and the
    /// result comes back expressed in `self`.
    pub fn convert_from(&self, value: f64, from_unit: &Unit) -> Result<f64, UcumError> {
        if self.is_arbitrary || from_unit.is_arbitrary {
            let unit = if from_unit.is_arbitrary { &from_unit.code } else { &self.code };
            return Err(UcumError::arbitrary_unit(unit.clone()));
        }
        if self.dimension != from_unit.dimension {
            return Err(UcumError::incommensurable(from_unit.code.clone(), self.code.clone()));
        }
        let base = from_unit.to_coherent_value(value)?;
        self.from_coherent_value(base)
    }

    fn to_coherent_value(&self, value: f64) -> Result<f64, UcumError> {
        match &self.conv {
            ConvKind::Ratio => Ok(value * self.magnitude),
            ConvKind::Special { name, inner_scale } => {
                let pair = special_units::pair(name)?;
                let x = (pair.from)(crate::precision::from_f64(value * inner_scale))?;
                Ok(to_f64(x) * self.magnitude)
            }
        }
    }

    fn from_coherent_value(&self, base: f64) -> Result<f64, UcumError> {
        match &self.conv {
            ConvKind::Ratio => Ok(base / self.magnitude),
            ConvKind::Special { name, inner_scale } => {
                let pair = special_units::pair(name)?;
                let x = (pair.to)(crate::precision::from_f64(base / self.magnitude))?;
                Ok(to_f64(x) / inner_scale)
            }
        }
    }

    /// `convertToBaseUnits`: the coherent magnitude, dimension vector, and
    /// whether the conversion ran through a special function.
    pub fn convert_coherent(&self, value: f64) -> Result<(f64, Dimension, bool), UcumError> {
        if self.is_arbitrary {
            return Err(UcumError::arbitrary_unit(self.code.clone()));
        }
        match &self.conv {
            ConvKind::Ratio => Ok((value * self.magnitude, self.dimension, false)),
            ConvKind::Special { name, inner_scale } => {
                let pair = special_units::pair(name)?;
                let base = (pair.from)(crate::precision::from_f64(value * inner_scale))?;
                Ok((to_f64(base) * self.magnitude, self.dimension, true))
            }
        }
    }

    /// Build the `{base-atom-code: exponent}` map `convert_to_base_units`
    /// reports alongside its coherent magnitude. Only nonzero dimension
    /// components are included, matching the coherent unit's own code
    /// (e.g. `cm2/ms3` reduces to the map `{m: 2, s: -3}`, omitting the
    /// five dimensions both sides agree are zero).
    pub fn mutate_coherent(&self) -> BTreeMap<String, i32> {
        let mut map = BTreeMap::new();
        for i in 0..dimension::DIM_LEN {
            let exp = self.dimension.get(i);
            if exp != 0 {
                map.insert(BASE_ATOM_CODES[i].to_string(), exp as i32);
            }
        }
        map
    }

    /// Promote a special (non-ratio) unit to its ratio-scale coherent form:
    /// `num` of `self` becomes `1` of the returned Unit's coherent base.
    /// A unit already on the ratio scale is returned unchanged along with
    /// `num` unchanged.
    pub fn mutate_ratio(&self, num: f64) -> Result<(Unit, f64), UcumError> {
        if self.is_ratio() {
            return Ok((self.clone(), num));
        }
        let (base, dimension, _is_special) = self.convert_coherent(num)?;
        Ok((
            Unit {
                magnitude: 1.0,
                dimension,
                conv: ConvKind::Ratio,
                is_arbitrary: self.is_arbitrary,
                code: self.code.clone(),
            },
            base,
        ))
    }
}

/// Swap the first `.`/`/` separator so `m/s` becomes `/m.s`, `m.s` becomes
/// `/m.s`, and `/m.s` becomes `m.s` — the textual inversion convention this
/// algebra follows rather than a literal per-atom exponent flip.
fn invert_code(code: &str) -> String {
    if let Some(rest) = code.strip_prefix('/') {
        return rest.to_string();
    }
    match code.find(['.', '/']) {
        Some(idx) => {
            let (head, tail) = code.split_at(idx);
            let rest = &tail[1..];
            format!("/{head}.{rest}")
        }
        None => format!("/{code}"),
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && (self.magnitude - other.magnitude).abs() < 1e-12
            && self.conv == other.conv
            && self.is_arbitrary == other.is_arbitrary
    }
}
