//! Liquidity venues a route can hop through.
//!
//! Two venue styles are supported: constant product [`Pair`]s and concentrated liquidity
//! [`Pool`]s. Downstream code never inspects a venue's concrete type by reflection, it matches on
//! the [`Venue`] tag.
pub mod address;
pub mod pair;
pub mod pool;

use std::fmt;

pub use pair::Pair;
pub use pool::Pool;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    math::{CurrencyAmount, Price},
    models::{token::Token, Address, Chain, Protocol},
    simulation::errors::SimulationError,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VenueError {
    #[error("Venue tokens must differ, got {0} twice")]
    IdenticalTokens(Token),
    #[error("Venue tokens live on different chains: {0} and {1}")]
    ChainMismatch(Chain, Chain),
    #[error("Unsupported fee tier: {0}")]
    InvalidFee(u32),
    #[error("Invalid venue state: {0}")]
    InvalidState(String),
}

/// The legal fee tiers of concentrated liquidity pools, in hundredths of a bip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeAmount {
    Lowest = 100,
    Low = 500,
    Medium = 3000,
    High = 10000,
}

impl FeeAmount {
    pub fn value(&self) -> u32 {
        *self as u32
    }
}

impl TryFrom<u32> for FeeAmount {
    type Error = VenueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(FeeAmount::Lowest),
            500 => Ok(FeeAmount::Low),
            3000 => Ok(FeeAmount::Medium),
            10000 => Ok(FeeAmount::High),
            other => Err(VenueError::InvalidFee(other)),
        }
    }
}

impl From<FeeAmount> for u32 {
    fn from(fee: FeeAmount) -> Self {
        fee.value()
    }
}

impl fmt::Display for FeeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Sorts two distinct tokens of the same chain into `(token0, token1)` venue order.
pub(crate) fn sort_tokens(token_a: Token, token_b: Token) -> Result<(Token, Token), VenueError> {
    if token_a.chain != token_b.chain {
        return Err(VenueError::ChainMismatch(token_a.chain, token_b.chain));
    }
    if token_a == token_b {
        return Err(VenueError::IdenticalTokens(token_a));
    }
    if token_a.sorts_before(&token_b) {
        Ok((token_a, token_b))
    } else {
        Ok((token_b, token_a))
    }
}

/// A liquidity venue, tagged by its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Venue {
    Pair(Pair),
    Pool(Pool),
}

impl Venue {
    pub fn token0(&self) -> &Token {
        match self {
            Venue::Pair(pair) => pair.token0(),
            Venue::Pool(pool) => pool.token0(),
        }
    }

    pub fn token1(&self) -> &Token {
        match self {
            Venue::Pair(pair) => pair.token1(),
            Venue::Pool(pool) => pool.token1(),
        }
    }

    pub fn chain(&self) -> Chain {
        self.token0().chain
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        match self {
            Venue::Pair(pair) => pair.involves_token(token),
            Venue::Pool(pool) => pool.involves_token(token),
        }
    }

    /// The counterpart of `token` in this venue, `None` if the venue does not hold `token`.
    pub fn other_token(&self, token: &Token) -> Option<&Token> {
        if self.token0() == token {
            Some(self.token1())
        } else if self.token1() == token {
            Some(self.token0())
        } else {
            None
        }
    }

    /// Spot price of `token` in terms of the other venue token.
    pub fn price_of(&self, token: &Token) -> Result<Price, SimulationError> {
        match self {
            Venue::Pair(pair) => pair.price_of(token),
            Venue::Pool(pool) => pool.price_of(token),
        }
    }

    pub fn address(&self) -> &Address {
        match self {
            Venue::Pair(pair) => pair.address(),
            Venue::Pool(pool) => pool.address(),
        }
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            Venue::Pair(_) => Protocol::V2,
            Venue::Pool(_) => Protocol::V3,
        }
    }

    pub fn get_output_amount(
        &self,
        amount_in: &CurrencyAmount,
    ) -> Result<CurrencyAmount, SimulationError> {
        match self {
            Venue::Pair(pair) => pair.get_output_amount(amount_in),
            Venue::Pool(pool) => pool.get_output_amount(amount_in),
        }
    }

    pub fn get_input_amount(
        &self,
        amount_out: &CurrencyAmount,
    ) -> Result<CurrencyAmount, SimulationError> {
        match self {
            Venue::Pair(pair) => pair.get_input_amount(amount_out),
            Venue::Pool(pool) => pool.get_input_amount(amount_out),
        }
    }
}

impl From<Pair> for Venue {
    fn from(pair: Pair) -> Self {
        Venue::Pair(pair)
    }
}

impl From<Pool> for Venue {
    fn from(pool: Pool) -> Self {
        Venue::Pool(pool)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Pair(pair) => write!(
                f,
                "pair {}/{} at {:#x}",
                pair.token0().symbol,
                pair.token1().symbol,
                pair.address()
            ),
            Venue::Pool(pool) => write!(
                f,
                "pool {}/{} fee {} at {:#x}",
                pool.token0().symbol,
                pool.token1().symbol,
                pool.fee(),
                pool.address()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(100, Ok(FeeAmount::Lowest))]
    #[case(500, Ok(FeeAmount::Low))]
    #[case(3000, Ok(FeeAmount::Medium))]
    #[case(10000, Ok(FeeAmount::High))]
    #[case(2500, Err(VenueError::InvalidFee(2500)))]
    #[case(0, Err(VenueError::InvalidFee(0)))]
    fn test_fee_amount_from_u32(#[case] value: u32, #[case] expected: Result<FeeAmount, VenueError>) {
        assert_eq!(FeeAmount::try_from(value), expected);
    }

    #[test]
    fn test_fee_amount_serde() {
        let fee: FeeAmount = serde_json::from_str("500").unwrap();

        assert_eq!(fee, FeeAmount::Low);
        assert_eq!(serde_json::to_string(&FeeAmount::High).unwrap(), "10000");
        assert!(serde_json::from_str::<FeeAmount>("42").is_err());
    }

    #[test]
    fn test_sort_tokens() {
        let weth = Chain::Ethereum.wrapped_native_token();
        let usdc = Token::new(
            &hex_literal::hex!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").into(),
            "USDC",
            6,
            Chain::Ethereum,
        );

        let (token0, token1) = sort_tokens(weth.clone(), usdc.clone()).unwrap();

        assert_eq!(token0, usdc);
        assert_eq!(token1, weth);
        assert_eq!(sort_tokens(weth.clone(), weth.clone()), Err(VenueError::IdenticalTokens(weth)));
        assert!(matches!(
            sort_tokens(Chain::Base.wrapped_native_token(), usdc),
            Err(VenueError::ChainMismatch(Chain::Base, Chain::Ethereum))
        ));
    }
}
