use std::fmt;

use num::{rational::BigRational, BigInt, Signed};

use super::{checked_fraction, format_fixed, AmountError};

/// A percentage kept as an exact fraction, `Percent::new(1, 2)` being 50%.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(BigRational);

impl Percent {
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, AmountError> {
        Ok(Self(checked_fraction(numerator, denominator)?))
    }

    /// `bps` basis points, `from_bps(50)` being 0.5%.
    pub fn from_bps(bps: i64) -> Self {
        Self(BigRational::new(BigInt::from(bps), BigInt::from(10_000)))
    }

    pub fn from_fraction(fraction: BigRational) -> Self {
        Self(fraction)
    }

    pub fn as_fraction(&self) -> &BigRational {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// The percentage value, i.e. the fraction times 100, with `digits` decimals.
    pub fn to_fixed(&self, digits: u32) -> String {
        format_fixed(&(&self.0 * BigRational::from_integer(BigInt::from(100))), digits)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_fixed(2))
    }
}
