use std::fmt;

use num::{rational::BigRational, BigInt, BigUint, Signed, ToPrimitive, Zero};

use super::{biguint_to_fraction, checked_fraction, format_fixed, format_significant, pow10, AmountError};
use crate::models::token::Currency;

/// An amount of a currency, in raw (smallest unit) terms.
///
/// The amount is kept as an exact fraction; intermediate results such as a spot-price quote are
/// generally not integral. [`CurrencyAmount::quotient`] gives the on-chain integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    currency: Currency,
    fraction: BigRational,
}

impl CurrencyAmount {
    pub fn from_raw_amount(currency: Currency, raw_amount: impl Into<BigUint>) -> Self {
        Self { currency, fraction: biguint_to_fraction(&raw_amount.into()) }
    }

    pub fn from_fractional_amount(
        currency: Currency,
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, AmountError> {
        Ok(Self { currency, fraction: checked_fraction(numerator, denominator)? })
    }

    pub fn from_fraction(currency: Currency, fraction: BigRational) -> Self {
        Self { currency, fraction }
    }

    pub fn zero(currency: Currency) -> Self {
        Self { currency, fraction: BigRational::zero() }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn as_fraction(&self) -> &BigRational {
        &self.fraction
    }

    pub fn is_zero(&self) -> bool {
        self.fraction.is_zero()
    }

    /// The amount rounded down to an integer.
    pub fn quotient(&self) -> BigInt {
        self.fraction.floor().to_integer()
    }

    /// The amount rounded down to a raw on-chain integer.
    pub fn raw_amount(&self) -> Result<BigUint, AmountError> {
        self.quotient()
            .to_biguint()
            .ok_or_else(|| AmountError::Negative(format!("{self}")))
    }

    pub fn add(&self, other: &CurrencyAmount) -> Result<Self, AmountError> {
        self.ensure_same_currency(other)?;
        Ok(Self::from_fraction(self.currency.clone(), &self.fraction + &other.fraction))
    }

    pub fn subtract(&self, other: &CurrencyAmount) -> Result<Self, AmountError> {
        self.ensure_same_currency(other)?;
        Ok(Self::from_fraction(self.currency.clone(), &self.fraction - &other.fraction))
    }

    pub fn multiply(&self, factor: &BigRational) -> Self {
        Self::from_fraction(self.currency.clone(), &self.fraction * factor)
    }

    pub fn divide(&self, divisor: &BigRational) -> Result<Self, AmountError> {
        if divisor.is_zero() {
            return Err(AmountError::DivisionByZero(format!("{self} divided by zero")));
        }
        Ok(Self::from_fraction(self.currency.clone(), &self.fraction / divisor))
    }

    pub fn less_than(&self, other: &CurrencyAmount) -> Result<bool, AmountError> {
        self.ensure_same_currency(other)?;
        Ok(self.fraction < other.fraction)
    }

    /// The same amount denominated in the currency's token form.
    pub fn wrapped(&self) -> Self {
        match self.currency {
            Currency::Token(_) => self.clone(),
            Currency::Native(_) => {
                Self::from_fraction(Currency::from(self.currency.wrapped()), self.fraction.clone())
            }
        }
    }

    /// Re-denominates the amount in `currency`, which must wrap to the same token.
    pub fn with_currency(&self, currency: &Currency) -> Result<Self, AmountError> {
        if !self.currency.wraps_to_same(currency) {
            return Err(AmountError::CurrencyMismatch {
                expected: currency.clone(),
                found: self.currency.clone(),
            });
        }
        Ok(Self::from_fraction(currency.clone(), self.fraction.clone()))
    }

    /// The integer amount in whole currency units, without rounding.
    pub fn to_exact(&self) -> String {
        let quotient = BigRational::from_integer(self.quotient());
        format_fixed(&(quotient / pow10(self.currency.decimals())), self.currency.decimals())
    }

    /// The amount in whole currency units rounded to `digits` decimals.
    pub fn to_fixed(&self, digits: u32) -> String {
        format_fixed(&self.in_units(), digits)
    }

    pub fn to_significant(&self, significant: u32) -> String {
        format_significant(&self.in_units(), significant)
    }

    /// Lossy conversion for logging and display only.
    pub fn to_f64(&self) -> Option<f64> {
        self.in_units().to_f64()
    }

    pub fn is_negative(&self) -> bool {
        self.fraction.is_negative()
    }

    fn in_units(&self) -> BigRational {
        &self.fraction / pow10(self.currency.decimals())
    }

    fn ensure_same_currency(&self, other: &CurrencyAmount) -> Result<(), AmountError> {
        if self.currency != other.currency {
            return Err(AmountError::CurrencyMismatch {
                expected: self.currency.clone(),
                found: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quotient(), self.currency.symbol())
    }
}
