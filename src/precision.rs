//! Decimal arithmetic used internally by the conversion engine.
//!
//! Public entry points (`Unit::convert_from`, `convert_unit_to`, …) take and
//! return `f64`, matching the distilled interface exactly. Internally,
//! multi-step rewriting — molar-mass mass↔mole conversion chief among them —
//! accumulates less rounding error on `rust_decimal::Decimal` than on `f64`,
//! so the conversion engine stages its arithmetic through `Number` before
//! handing the final value back as `f64`.

use rust_decimal::Decimal;

pub type Number = Decimal;

pub trait NumericOps: Copy {
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(val: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl NumericOps for Decimal {
    fn zero() -> Self {
        Decimal::ZERO
    }
    fn one() -> Self {
        Decimal::ONE
    }
    fn from_f64(val: f64) -> Self {
        Decimal::from_f64_retain(val).unwrap_or(Decimal::ZERO)
    }
    fn to_f64(self) -> f64 {
        self.try_into().unwrap_or(0.0)
    }
}

pub fn from_f64(val: f64) -> Number {
    <Number as NumericOps>::from_f64(val)
}

pub fn to_f64(num: Number) -> f64 {
    <Number as NumericOps>::to_f64(num)
}
