use num::{BigUint, Zero};
use tracing::trace;

use super::{address::pair_address, sort_tokens, VenueError};
use crate::{
    math::{CurrencyAmount, Price},
    models::{token::Token, Address},
    simulation::errors::SimulationError,
};

const FEE_NUMERATOR: u32 = 997;
const FEE_DENOMINATOR: u32 = 1000;

/// A constant product pair holding reserves of two tokens, with the implicit 0.3% swap fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// First token in the pair (sorted by address).
    token0: Token,
    token1: Token,
    reserve0: BigUint,
    reserve1: BigUint,
    address: Address,
}

impl Pair {
    /// Creates a pair from two tokens and their reserves, in any order.
    pub fn new(
        token_a: Token,
        token_b: Token,
        reserve_a: BigUint,
        reserve_b: BigUint,
    ) -> Result<Self, VenueError> {
        let a_first = token_a.sorts_before(&token_b);
        let (token0, token1) = sort_tokens(token_a, token_b)?;
        let (reserve0, reserve1) =
            if a_first { (reserve_a, reserve_b) } else { (reserve_b, reserve_a) };
        let address = pair_address(&token0.chain.pair_factory(), &token0, &token1);
        Ok(Self { token0, token1, reserve0, reserve1, address })
    }

    /// Address of the pair of `token_a` and `token_b`.
    pub fn get_address(token_a: &Token, token_b: &Token) -> Result<Address, VenueError> {
        let (token0, token1) = sort_tokens(token_a.clone(), token_b.clone())?;
        Ok(pair_address(&token0.chain.pair_factory(), &token0, &token1))
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn token0(&self) -> &Token {
        &self.token0
    }

    pub fn token1(&self) -> &Token {
        &self.token1
    }

    pub fn reserve0(&self) -> &BigUint {
        &self.reserve0
    }

    pub fn reserve1(&self) -> &BigUint {
        &self.reserve1
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        &self.token0 == token || &self.token1 == token
    }

    /// Price of token0 in token1, `reserve1 / reserve0`.
    ///
    /// Fails with `InsufficientLiquidity` while either reserve is empty.
    pub fn token0_price(&self) -> Result<Price, SimulationError> {
        self.ensure_priceable()?;
        Ok(Price::new(
            (&self.token0).into(),
            (&self.token1).into(),
            self.reserve0.clone(),
            self.reserve1.clone(),
        )?)
    }

    /// Price of token1 in token0, `reserve0 / reserve1`.
    pub fn token1_price(&self) -> Result<Price, SimulationError> {
        self.ensure_priceable()?;
        Ok(Price::new(
            (&self.token1).into(),
            (&self.token0).into(),
            self.reserve1.clone(),
            self.reserve0.clone(),
        )?)
    }

    pub fn price_of(&self, token: &Token) -> Result<Price, SimulationError> {
        if token == &self.token0 {
            self.token0_price()
        } else if token == &self.token1 {
            self.token1_price()
        } else {
            Err(SimulationError::InvalidInput(format!("{token} is not in pair {:#x}", self.address)))
        }
    }

    /// Amount of the other token received for `amount_in`, after the 0.3% fee.
    pub fn get_output_amount(
        &self,
        amount_in: &CurrencyAmount,
    ) -> Result<CurrencyAmount, SimulationError> {
        let token_in = amount_in.currency().wrapped();
        let (token_out, reserve_in, reserve_out) = self.orient(&token_in)?;
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(SimulationError::InsufficientLiquidity(format!(
                "pair {:#x} has no reserves",
                self.address
            )));
        }
        let amount = amount_in.raw_amount()?;
        if amount.is_zero() {
            return Err(SimulationError::InvalidInput("input amount cannot be zero".to_string()));
        }

        let amount_with_fee = &amount * FEE_NUMERATOR;
        let numerator = &amount_with_fee * reserve_out;
        let denominator = reserve_in * FEE_DENOMINATOR + &amount_with_fee;
        let output = numerator / denominator;
        if output.is_zero() {
            return Err(SimulationError::InvalidInput(format!(
                "input amount {amount_in} too small for pair {:#x}",
                self.address
            )));
        }
        trace!(pair = %self.address, %amount, %output, "Pair exact input");
        Ok(CurrencyAmount::from_raw_amount(token_out.into(), output))
    }

    /// Amount of the other token required to receive `amount_out`, after the 0.3% fee.
    pub fn get_input_amount(
        &self,
        amount_out: &CurrencyAmount,
    ) -> Result<CurrencyAmount, SimulationError> {
        let token_out = amount_out.currency().wrapped();
        let (token_in, reserve_out, reserve_in) = self.orient(&token_out)?;
        let amount = amount_out.raw_amount()?;
        if amount.is_zero() {
            return Err(SimulationError::InvalidInput("output amount cannot be zero".to_string()));
        }
        if reserve_in.is_zero() || &amount >= reserve_out {
            return Err(SimulationError::InsufficientLiquidity(format!(
                "pair {:#x} cannot provide {amount_out}",
                self.address
            )));
        }

        let numerator = reserve_in * &amount * FEE_DENOMINATOR;
        let denominator = (reserve_out - &amount) * FEE_NUMERATOR;
        let input = numerator / denominator + 1u32;
        trace!(pair = %self.address, %amount, %input, "Pair exact output");
        Ok(CurrencyAmount::from_raw_amount(token_in.into(), input))
    }

    fn ensure_priceable(&self) -> Result<(), SimulationError> {
        if self.reserve0.is_zero() || self.reserve1.is_zero() {
            return Err(SimulationError::InsufficientLiquidity(format!(
                "pair {:#x} has an empty reserve",
                self.address
            )));
        }
        Ok(())
    }

    /// Returns the counterpart of `token` together with the reserves of `token` and of the
    /// counterpart, in that order.
    fn orient(&self, token: &Token) -> Result<(&Token, &BigUint, &BigUint), SimulationError> {
        if token == &self.token0 {
            Ok((&self.token1, &self.reserve0, &self.reserve1))
        } else if token == &self.token1 {
            Ok((&self.token0, &self.reserve1, &self.reserve0))
        } else {
            Err(SimulationError::InvalidInput(format!("{token} is not in pair {:#x}", self.address)))
        }
    }
}
