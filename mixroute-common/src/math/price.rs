use std::fmt;

use num::{rational::BigRational, BigUint, Zero};

use super::{
    biguint_to_fraction, format_fixed, format_significant, pow10, AmountError, CurrencyAmount,
};
use crate::models::token::Currency;

/// Represents a price as a fraction in the base -> quote direction, in raw units
/// [quote smallest unit / base smallest unit].
///
/// Keeping the raw ratio means quoting an amount never loses precision; the human comparable
/// value, rescaled by the difference in decimals, is available through [`Price::adjusted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    base: Currency,
    quote: Currency,
    ratio: BigRational,
}

impl Price {
    /// Creates a price where `denominator` raw units of `base` are worth `numerator` raw units of
    /// `quote`.
    pub fn new(
        base: Currency,
        quote: Currency,
        denominator: impl Into<BigUint>,
        numerator: impl Into<BigUint>,
    ) -> Result<Self, AmountError> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(AmountError::DivisionByZero(format!(
                "price of {base} in {quote} has a zero denominator"
            )));
        }
        let ratio = biguint_to_fraction(&numerator.into()) / biguint_to_fraction(&denominator);
        Ok(Self { base, quote, ratio })
    }

    pub fn from_ratio(base: Currency, quote: Currency, ratio: BigRational) -> Self {
        Self { base, quote, ratio }
    }

    /// The price implied by exchanging `input` for `output`.
    pub fn from_amounts(input: &CurrencyAmount, output: &CurrencyAmount) -> Result<Self, AmountError> {
        if input.is_zero() {
            return Err(AmountError::DivisionByZero(format!(
                "price from a zero amount of {}",
                input.currency()
            )));
        }
        Ok(Self {
            base: input.currency().clone(),
            quote: output.currency().clone(),
            ratio: output.as_fraction() / input.as_fraction(),
        })
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    pub fn quote_currency(&self) -> &Currency {
        &self.quote
    }

    /// Raw quote units per raw base unit.
    pub fn raw(&self) -> &BigRational {
        &self.ratio
    }

    pub fn invert(&self) -> Result<Self, AmountError> {
        if self.ratio.is_zero() {
            return Err(AmountError::DivisionByZero(format!("inverting zero price of {}", self.base)));
        }
        Ok(Self { base: self.quote.clone(), quote: self.base.clone(), ratio: self.ratio.recip() })
    }

    /// Chains this price with `other`, whose base must be this price's quote.
    pub fn multiply(&self, other: &Price) -> Result<Self, AmountError> {
        if self.quote != other.base {
            return Err(AmountError::CurrencyMismatch {
                expected: self.quote.clone(),
                found: other.base.clone(),
            });
        }
        Ok(Self {
            base: self.base.clone(),
            quote: other.quote.clone(),
            ratio: &self.ratio * &other.ratio,
        })
    }

    /// Converts an amount of the base currency into the quote currency at this price.
    pub fn quote(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount, AmountError> {
        if amount.currency() != &self.base {
            return Err(AmountError::CurrencyMismatch {
                expected: self.base.clone(),
                found: amount.currency().clone(),
            });
        }
        Ok(CurrencyAmount::from_fraction(self.quote.clone(), amount.as_fraction() * &self.ratio))
    }

    /// The price rescaled by the decimals of both currencies, i.e. whole quote units per whole
    /// base unit.
    pub fn adjusted(&self) -> BigRational {
        &self.ratio * pow10(self.base.decimals()) / pow10(self.quote.decimals())
    }

    pub fn to_significant(&self, significant: u32) -> String {
        format_significant(&self.adjusted(), significant)
    }

    pub fn to_fixed(&self, digits: u32) -> String {
        format_fixed(&self.adjusted(), digits)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.to_significant(6), self.quote.symbol(), self.base.symbol())
    }
}
