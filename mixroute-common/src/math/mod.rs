//! Exact rational arithmetic for on-chain amounts.
//!
//! On-chain amounts are integers and rounding differences are observable, so nothing in this
//! module touches floating point. Fractions are [`BigRational`]s; raw token amounts are
//! [`BigUint`]s.
pub mod amount;
pub mod percent;
pub mod price;

pub use amount::CurrencyAmount;
use num::{rational::BigRational, BigInt, BigUint, Integer, Signed, Zero};
pub use percent::Percent;
pub use price::Price;
use thiserror::Error;

use crate::models::token::Currency;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },
    #[error("Division by zero: {0}")]
    DivisionByZero(String),
    #[error("Negative amount: {0}")]
    Negative(String),
}

/// Builds a fraction, rejecting a zero denominator.
pub fn checked_fraction(
    numerator: impl Into<BigInt>,
    denominator: impl Into<BigInt>,
) -> Result<BigRational, AmountError> {
    let denominator = denominator.into();
    if denominator.is_zero() {
        return Err(AmountError::DivisionByZero("fraction denominator is zero".to_string()));
    }
    Ok(BigRational::new(numerator.into(), denominator))
}

pub fn biguint_to_fraction(value: &BigUint) -> BigRational {
    BigRational::from_integer(BigInt::from(value.clone()))
}

/// `10^exponent` as a fraction.
pub fn pow10(exponent: u32) -> BigRational {
    BigRational::from_integer(BigInt::from(10u32).pow(exponent))
}

/// Renders `value` with exactly `digits` decimals, rounding half away from zero.
pub fn format_fixed(value: &BigRational, digits: u32) -> String {
    let scale = BigInt::from(10u32).pow(digits);
    let scaled = value.abs() * BigRational::from_integer(scale.clone());
    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    let rounded = (scaled + half).floor().to_integer();
    let (integer, remainder) = rounded.div_rem(&scale);

    let sign = if value.is_negative() && !rounded.is_zero() { "-" } else { "" };
    if digits == 0 {
        return format!("{sign}{integer}");
    }
    format!("{sign}{integer}.{remainder:0>width$}", width = digits as usize)
}

/// Renders `value` rounded to `significant` significant digits, without trailing zeros.
pub fn format_significant(value: &BigRational, significant: u32) -> String {
    let significant = significant.max(1);
    if value.is_zero() {
        return "0".to_string();
    }
    let exponent = decimal_exponent(&value.abs());
    let decimals = i64::from(significant) - 1 - exponent;
    if decimals > 0 {
        let fixed = format_fixed(value, decimals as u32);
        return fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }
    // Round to a multiple of 10^(-decimals) and print the integer.
    let granularity = pow10((-decimals) as u32);
    let rounded = format_fixed(&(value / &granularity), 0);
    if rounded == "0" || rounded == "-0" {
        return "0".to_string();
    }
    format!("{rounded}{}", "0".repeat((-decimals) as usize))
}

/// Largest `e` with `10^e <= value`, for a strictly positive `value`.
fn decimal_exponent(value: &BigRational) -> i64 {
    let one = BigRational::from_integer(BigInt::from(1));
    if value >= &one {
        let digits = value.floor().to_integer().to_string().len() as i64;
        return digits - 1;
    }
    let mut exponent = 0i64;
    let mut scaled = value.clone();
    let ten = BigRational::from_integer(BigInt::from(10));
    while scaled < one {
        scaled *= &ten;
        exponent -= 1;
    }
    exponent
}
