//! Decimal arithmetic with predictable rounding.
//!
//! Operands arrive as `f64` and are converted through their shortest decimal
//! representation, so `0.1` takes part in the computation as exactly `0.1` rather than
//! as the nearest binary fraction. Only the final result is turned back into an `f64`.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use thiserror::Error;

/// Digits kept after the decimal point for the intermediate quotient of a division.
const DIVISION_SCALE: i64 = 10;

/// Result scale used by [`compute4`].
const DEFAULT_SCALE: u32 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown operator: {op}")]
    UnknownOperator { op: char },

    #[error("invalid number: {value}")]
    InvalidNumber { value: String },
}

impl DecimalError {
    pub fn invalid_number<S: ToString>(value: S) -> Self {
        Self::InvalidNumber { value: value.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Op {
    pub fn as_char(self) -> char {
        match self {
            Op::Add => '+',
            Op::Subtract => '-',
            Op::Multiply => '*',
            Op::Divide => '/',
        }
    }
}

impl TryFrom<char> for Op {
    type Error = DecimalError;

    fn try_from(op: char) -> Result<Self, Self::Error> {
        match op {
            '+' => Ok(Op::Add),
            '-' => Ok(Op::Subtract),
            '*' => Ok(Op::Multiply),
            '/' => Ok(Op::Divide),
            _ => Err(DecimalError::UnknownOperator { op }),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Applies `op` to `left` and `right` and rounds the result half-even to `scale`
/// decimal places.
///
/// An absent left operand counts as zero. An absent right operand skips the operation
/// entirely, leaving the (rounded) left operand as the result. Division keeps ten
/// digits after the decimal point, rounded half-even, before the final rounding.
///
/// ```
/// use replay_text::decimal::compute;
/// use replay_text::Op;
///
/// assert_eq!(compute(Some(0.1), Some(0.2), Op::Add, 2), Ok(0.3));
/// assert_eq!(compute(Some(8.0), Some(3.0), Op::Divide, 4), Ok(2.6667));
/// assert_eq!(compute(None, Some(2.5), Op::Subtract, 1), Ok(-2.5));
/// ```
pub fn compute(left: Option<f64>, right: Option<f64>, op: Op, scale: u32) -> Result<f64, DecimalError> {
    let left = match left {
        Some(value) => to_decimal(value)?,
        None => BigDecimal::zero(),
    };

    let result = match right {
        Some(value) => {
            let right = to_decimal(value)?;
            match op {
                Op::Add => left + right,
                Op::Subtract => left - right,
                Op::Multiply => left * right,
                Op::Divide => {
                    if right.is_zero() {
                        return Err(DecimalError::DivisionByZero);
                    }
                    (left / right).with_scale_round(DIVISION_SCALE, RoundingMode::HalfEven)
                }
            }
        }
        None => left,
    };

    let rounded = result.with_scale_round(i64::from(scale), RoundingMode::HalfEven).to_string();
    rounded.parse::<f64>().ok().ok_or_else(|| DecimalError::invalid_number(rounded))
}

/// [`compute`] with four decimal places.
pub fn compute4(left: Option<f64>, right: Option<f64>, op: Op) -> Result<f64, DecimalError> {
    compute(left, right, op, DEFAULT_SCALE)
}

/// Rounds a numeric string half-up to `scale` decimal places and renders it without
/// exponent notation.
///
/// Blank input renders as an empty string.
///
/// ```
/// use replay_text::decimal::round_str;
///
/// assert_eq!(round_str("1.2345e3", 1).unwrap(), "1234.5");
/// assert_eq!(round_str("2.5", 0).unwrap(), "3");
/// assert_eq!(round_str("  ", 2).unwrap(), "");
/// ```
pub fn round_str(value: &str, scale: u32) -> Result<String, DecimalError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    let decimal = BigDecimal::from_str(value).ok().ok_or_else(|| DecimalError::invalid_number(value))?;
    Ok(decimal.with_scale_round(i64::from(scale), RoundingMode::HalfUp).to_plain_string())
}

/// Rounds `value` half-up to `scale` decimal places.
///
/// The value is rounded as it prints, so `2.345` rounds to `2.35` even though its
/// binary representation lies slightly below.
///
/// ```
/// use replay_text::decimal::set_scale;
///
/// assert_eq!(set_scale(2.345, 2), Ok(2.35));
/// assert_eq!(set_scale(1234.5, 0), Ok(1235.0));
/// ```
pub fn set_scale(value: f64, scale: u32) -> Result<f64, DecimalError> {
    let rounded = to_decimal(value)?.with_scale_round(i64::from(scale), RoundingMode::HalfUp).to_string();
    rounded.parse::<f64>().ok().ok_or_else(|| DecimalError::invalid_number(rounded))
}

fn to_decimal(value: f64) -> Result<BigDecimal, DecimalError> {
    if !value.is_finite() {
        return Err(DecimalError::invalid_number(value));
    }
    // f64 Display is the shortest round-trip representation and never uses an exponent
    BigDecimal::from_str(&value.to_string()).ok().ok_or_else(|| DecimalError::invalid_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_from_char() {
        assert_eq!(Op::try_from('+'), Ok(Op::Add));
        assert_eq!(Op::try_from('-'), Ok(Op::Subtract));
        assert_eq!(Op::try_from('*'), Ok(Op::Multiply));
        assert_eq!(Op::try_from('/'), Ok(Op::Divide));
        assert_eq!(Op::try_from('%'), Err(DecimalError::UnknownOperator { op: '%' }));

        assert_eq!(Op::Divide.to_string(), "/");
    }

    #[test]
    fn exact_decimal_arithmetic() {
        assert_eq!(compute(Some(0.1), Some(0.2), Op::Add, 4), Ok(0.3));
        assert_eq!(compute(Some(1.0), Some(0.9), Op::Subtract, 4), Ok(0.1));
        assert_eq!(compute(Some(1.1), Some(1.1), Op::Multiply, 4), Ok(1.21));
        assert_eq!(compute(Some(10.0), Some(4.0), Op::Divide, 4), Ok(2.5));
    }

    #[test]
    fn half_even_rounding() {
        assert_eq!(compute(Some(8.0), Some(3.0), Op::Divide, 4), Ok(2.6667));
        assert_eq!(compute(Some(1.0), Some(3.0), Op::Divide, 2), Ok(0.33));
        assert_eq!(compute(Some(0.125), Some(0.0), Op::Add, 2), Ok(0.12));
        assert_eq!(compute(Some(0.135), Some(0.0), Op::Add, 2), Ok(0.14));
        assert_eq!(compute(Some(2.5), Some(0.0), Op::Add, 0), Ok(2.0));
        assert_eq!(compute(Some(-2.5), Some(0.0), Op::Add, 0), Ok(-2.0));
    }

    #[test]
    fn absent_operands() {
        assert_eq!(compute(None, Some(3.0), Op::Add, 2), Ok(3.0));
        assert_eq!(compute(None, Some(3.0), Op::Subtract, 2), Ok(-3.0));
        assert_eq!(compute(None, Some(3.0), Op::Multiply, 2), Ok(0.0));
        assert_eq!(compute(None, None, Op::Add, 2), Ok(0.0));

        // the operation is skipped, only rounding applies
        assert_eq!(compute(Some(1.23456), None, Op::Divide, 2), Ok(1.23));
        assert_eq!(compute(Some(5.0), None, Op::Multiply, 2), Ok(5.0));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(compute(Some(1.0), Some(0.0), Op::Divide, 2), Err(DecimalError::DivisionByZero));
        assert_eq!(compute(None, Some(-0.0), Op::Divide, 2), Err(DecimalError::DivisionByZero));
    }

    #[test]
    fn non_finite_operands() {
        assert!(matches!(compute(Some(f64::NAN), Some(1.0), Op::Add, 2), Err(DecimalError::InvalidNumber { .. })));
        assert!(matches!(compute(Some(1.0), Some(f64::INFINITY), Op::Add, 2), Err(DecimalError::InvalidNumber { .. })));
    }

    #[test]
    fn four_places() {
        assert_eq!(compute4(Some(8.0), Some(3.0), Op::Divide), Ok(2.6667));
        assert_eq!(compute4(Some(2.0), Some(3.0), Op::Divide), Ok(0.6667));
        assert_eq!(compute4(Some(19.99), Some(3.0), Op::Multiply), Ok(59.97));
    }

    #[test]
    fn round_strings() {
        assert_eq!(round_str("3.14159", 2).unwrap(), "3.14");
        assert_eq!(round_str("2.345", 2).unwrap(), "2.35");
        assert_eq!(round_str("-2.345", 2).unwrap(), "-2.35");
        assert_eq!(round_str("1E+3", 0).unwrap(), "1000");
        assert_eq!(round_str("1.5e-3", 4).unwrap(), "0.0015");
        assert_eq!(round_str("42", 2).unwrap(), "42.00");
        assert_eq!(round_str("", 2).unwrap(), "");
    }

    #[test]
    fn round_invalid_strings() {
        assert_eq!(round_str("abc", 2), Err(DecimalError::invalid_number("abc")));
        assert_eq!(round_str("1.2.3", 2), Err(DecimalError::invalid_number("1.2.3")));
    }

    #[test]
    fn half_up_scale() {
        assert_eq!(set_scale(2.345, 2), Ok(2.35));
        assert_eq!(set_scale(-2.345, 2), Ok(-2.35));
        assert_eq!(set_scale(2.5, 0), Ok(3.0));
        assert_eq!(set_scale(0.125, 2), Ok(0.13));
        assert_eq!(set_scale(1.23456, 4), Ok(1.2346));
        assert_eq!(set_scale(7.0, 3), Ok(7.0));

        assert!(matches!(set_scale(f64::NAN, 2), Err(DecimalError::InvalidNumber { .. })));
    }
}
