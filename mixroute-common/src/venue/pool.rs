use num::{rational::BigRational, BigInt, BigUint, Integer, One, Zero};
use tracing::trace;

use super::{address::pool_address, sort_tokens, FeeAmount, VenueError};
use crate::{
    math::{CurrencyAmount, Price},
    models::{token::Token, Address},
    simulation::errors::SimulationError,
};

/// Fee denominator: pool fees are expressed in hundredths of a bip.
const FEE_PIPS: u32 = 1_000_000;

fn q96() -> BigUint {
    BigUint::one() << 96u32
}

/// A concentrated liquidity pool, described by its state in the currently active price range.
///
/// Swaps are simulated inside the active range only: the pool behaves like a constant product
/// curve with virtual reserves derived from `liquidity` and `sqrt_price_x96`, and any amount that
/// would push the price out of the curve fails with `InsufficientLiquidity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    token0: Token,
    token1: Token,
    fee: FeeAmount,
    /// `sqrt(token1 / token0)` as a Q64.96 fixed point number.
    sqrt_price_x96: BigUint,
    /// Liquidity active at the current price.
    liquidity: BigUint,
    address: Address,
}

impl Pool {
    /// Creates a pool from two tokens in any order. `sqrt_price_x96` is always the price of the
    /// lower-address token, whatever the argument order.
    pub fn new(
        token_a: Token,
        token_b: Token,
        fee: FeeAmount,
        sqrt_price_x96: BigUint,
        liquidity: BigUint,
    ) -> Result<Self, VenueError> {
        let (token0, token1) = sort_tokens(token_a, token_b)?;
        if sqrt_price_x96.is_zero() {
            return Err(VenueError::InvalidState(format!(
                "pool {}/{} has a zero sqrt price",
                token0.symbol, token1.symbol
            )));
        }
        let address = pool_address(&token0.chain.pool_factory(), &token0, &token1, fee);
        Ok(Self { token0, token1, fee, sqrt_price_x96, liquidity, address })
    }

    /// Address of the pool of `token_a` and `token_b` at fee tier `fee`.
    pub fn get_address(
        token_a: &Token,
        token_b: &Token,
        fee: FeeAmount,
    ) -> Result<Address, VenueError> {
        let (token0, token1) = sort_tokens(token_a.clone(), token_b.clone())?;
        Ok(pool_address(&token0.chain.pool_factory(), &token0, &token1, fee))
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

    pub fn fee(&self) -> FeeAmount {
        self.fee
    }

    pub fn sqrt_price_x96(&self) -> &BigUint {
        &self.sqrt_price_x96
    }

    pub fn liquidity(&self) -> &BigUint {
        &self.liquidity
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        &self.token0 == token || &self.token1 == token
    }

    /// Price of token0 in token1, `sqrt_price_x96² / 2¹⁹²`.
    pub fn token0_price(&self) -> Price {
        let sqrt_price = BigInt::from(self.sqrt_price_x96.clone());
        let ratio = BigRational::new(&sqrt_price * &sqrt_price, BigInt::one() << 192u32);
        Price::from_ratio((&self.token0).into(), (&self.token1).into(), ratio)
    }

    pub fn token1_price(&self) -> Result<Price, SimulationError> {
        Ok(self.token0_price().invert()?)
    }

    pub fn price_of(&self, token: &Token) -> Result<Price, SimulationError> {
        if token == &self.token0 {
            Ok(self.token0_price())
        } else if token == &self.token1 {
            self.token1_price()
        } else {
            Err(SimulationError::InvalidInput(format!("{token} is not in pool {:#x}", self.address)))
        }
    }

    /// Amount of the other token received for `amount_in`, net of the pool fee.
    pub fn get_output_amount(
        &self,
        amount_in: &CurrencyAmount,
    ) -> Result<CurrencyAmount, SimulationError> {
        let token_in = amount_in.currency().wrapped();
        let zero_for_one = self.zero_for_one(&token_in)?;
        let amount = amount_in.raw_amount()?;
        if amount.is_zero() {
            return Err(SimulationError::InvalidInput("input amount cannot be zero".to_string()));
        }
        self.ensure_liquidity()?;

        let q96 = q96();
        let liquidity = &self.liquidity;
        let sqrt_price = &self.sqrt_price_x96;
        let amount_less_fee = &amount * (FEE_PIPS - self.fee.value()) / FEE_PIPS;

        let (output, token_out) = if zero_for_one {
            // Adding token0 lowers the price: sqrtQ = L·sqrtP / (L + a·sqrtP), rounded up.
            let numerator = liquidity * &q96 * sqrt_price;
            let denominator = liquidity * &q96 + &amount_less_fee * sqrt_price;
            let next_sqrt_price = Integer::div_ceil(&numerator, &denominator);
            (liquidity * (sqrt_price - &next_sqrt_price) / &q96, &self.token1)
        } else {
            // Adding token1 raises the price: sqrtQ = sqrtP + a / L, rounded down.
            let next_sqrt_price = sqrt_price + &amount_less_fee * &q96 / liquidity;
            let numerator = liquidity * &q96 * (&next_sqrt_price - sqrt_price);
            (numerator / (&next_sqrt_price * sqrt_price), &self.token0)
        };

        if output.is_zero() {
            return Err(SimulationError::InvalidInput(format!(
                "input amount {amount_in} too small for pool {:#x}",
                self.address
            )));
        }
        trace!(pool = %self.address, zero_for_one, %amount, %output, "Pool exact input");
        Ok(CurrencyAmount::from_raw_amount(token_out.into(), output))
    }

    /// Amount of the other token required to receive `amount_out`, fee included.
    pub fn get_input_amount(
        &self,
        amount_out: &CurrencyAmount,
    ) -> Result<CurrencyAmount, SimulationError> {
        let token_out = amount_out.currency().wrapped();
        // Receiving token1 means paying token0.
        let zero_for_one = !self.zero_for_one(&token_out)?;
        let amount = amount_out.raw_amount()?;
        if amount.is_zero() {
            return Err(SimulationError::InvalidInput("output amount cannot be zero".to_string()));
        }
        self.ensure_liquidity()?;

        let q96 = q96();
        let liquidity = &self.liquidity;
        let sqrt_price = &self.sqrt_price_x96;
        let exhausted = || {
            SimulationError::InsufficientLiquidity(format!(
                "pool {:#x} cannot provide {amount_out} in its active range",
                self.address
            ))
        };

        let (input_less_fee, token_in) = if zero_for_one {
            let price_delta = Integer::div_ceil(&(&amount * &q96), liquidity);
            if &price_delta >= sqrt_price {
                return Err(exhausted());
            }
            let next_sqrt_price = sqrt_price - &price_delta;
            let numerator = liquidity * &q96 * &price_delta;
            let denominator = sqrt_price * &next_sqrt_price;
            (Integer::div_ceil(&numerator, &denominator), &self.token0)
        } else {
            let virtual_reserve = liquidity * &q96;
            let removed = &amount * sqrt_price;
            if removed >= virtual_reserve {
                return Err(exhausted());
            }
            let next_sqrt_price =
                Integer::div_ceil(&(&virtual_reserve * sqrt_price), &(&virtual_reserve - &removed));
            let numerator = liquidity * (&next_sqrt_price - sqrt_price);
            (Integer::div_ceil(&numerator, &q96), &self.token1)
        };

        let input = Integer::div_ceil(
            &(input_less_fee * FEE_PIPS),
            &BigUint::from(FEE_PIPS - self.fee.value()),
        );
        trace!(pool = %self.address, zero_for_one, %amount, %input, "Pool exact output");
        Ok(CurrencyAmount::from_raw_amount(token_in.into(), input))
    }

    /// Whether `token_in` is token0, i.e. whether selling it moves the pool price down.
    fn zero_for_one(&self, token_in: &Token) -> Result<bool, SimulationError> {
        if token_in == &self.token0 {
            Ok(true)
        } else if token_in == &self.token1 {
            Ok(false)
        } else {
            Err(SimulationError::InvalidInput(format!(
                "{token_in} is not in pool {:#x}",
                self.address
            )))
        }
    }

    fn ensure_liquidity(&self) -> Result<(), SimulationError> {
        if self.liquidity.is_zero() {
            return Err(SimulationError::InsufficientLiquidity(format!(
                "pool {:#x} has no active liquidity",
                self.address
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        models::{token::Currency, Chain},
        Bytes,
    };

    fn usdc() -> Token {
        Token::new(
            &Bytes::from_str("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap(),
            "USDC",
            6,
            Chain::Ethereum,
        )
    }

    fn weth() -> Token {
        Chain::Ethereum.wrapped_native_token()
    }

    fn sqrt_price() -> BigUint {
        // sqrt(5e8) * 2^96, i.e. 2000 USDC per WETH
        BigUint::from_str("1771595571142957102961017161607260").unwrap()
    }

    fn pool(liquidity: u128) -> Pool {
        Pool::new(weth(), usdc(), FeeAmount::Low, sqrt_price(), BigUint::from(liquidity)).unwrap()
    }

    fn liquid_pool() -> Pool {
        pool(10u128.pow(22))
    }

    #[rstest]
    #[case(FeeAmount::Low, "0x88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640")]
    #[case(FeeAmount::Medium, "0x8ad599c3A0ff1De082011EFDDc58f1908eb6e6D8")]
    fn test_address(#[case] fee: FeeAmount, #[case] expected: &str) {
        let expected = Bytes::from_str(expected).unwrap();

        assert_eq!(Pool::get_address(&weth(), &usdc(), fee).unwrap(), expected);
        assert_eq!(
            Pool::new(usdc(), weth(), fee, sqrt_price(), BigUint::one())
                .unwrap()
                .address(),
            &expected
        );
    }

    #[test]
    fn test_prices() {
        let pool = liquid_pool();

        assert_eq!(pool.token0(), &usdc());
        assert_eq!(pool.price_of(&usdc()).unwrap().to_significant(4), "0.0005");
        assert_eq!(pool.price_of(&weth()).unwrap().to_significant(4), "2000");
    }

    #[rstest]
    #[case::usdc_for_weth(usdc(), 1_000_000_000u128, weth(), 499_749_998_883_083_768u128)]
    #[case::weth_for_usdc(weth(), 1_000_000_000_000_000_000u128, usdc(), 1_998_999_991u128)]
    fn test_get_output_amount(
        #[case] token_in: Token,
        #[case] amount_in: u128,
        #[case] token_out: Token,
        #[case] expected: u128,
    ) {
        let amount_in = CurrencyAmount::from_raw_amount(token_in.into(), amount_in);

        let amount_out = liquid_pool()
            .get_output_amount(&amount_in)
            .unwrap();

        assert_eq!(amount_out.currency(), &Currency::from(token_out));
        assert_eq!(amount_out.raw_amount().unwrap(), BigUint::from(expected));
    }

    #[rstest]
    #[case::usdc_for_weth(weth(), 1_000_000_000_000_000_000u128, usdc(), 2_001_000_510u128)]
    #[case::weth_for_usdc(usdc(), 1_000_000_000u128, weth(), 500_250_126_181_124_555u128)]
    fn test_get_input_amount(
        #[case] token_out: Token,
        #[case] amount_out: u128,
        #[case] token_in: Token,
        #[case] expected: u128,
    ) {
        let amount_out = CurrencyAmount::from_raw_amount(token_out.into(), amount_out);

        let amount_in = liquid_pool()
            .get_input_amount(&amount_out)
            .unwrap();

        assert_eq!(amount_in.currency(), &Currency::from(token_in));
        assert_eq!(amount_in.raw_amount().unwrap(), BigUint::from(expected));
    }

    #[rstest]
    #[case::all_virtual_usdc(usdc(), 500_000_000_000_000_000u128)]
    #[case::all_virtual_weth(weth(), 300_000_000_000_000_000_000_000_000u128)]
    fn test_get_input_amount_exhausts_range(#[case] token_out: Token, #[case] amount_out: u128) {
        let amount_out = CurrencyAmount::from_raw_amount(token_out.into(), amount_out);

        let result = liquid_pool().get_input_amount(&amount_out);

        assert!(matches!(result, Err(SimulationError::InsufficientLiquidity(_))));
    }

    #[test]
    fn test_no_liquidity() {
        let amount_in = CurrencyAmount::from_raw_amount(usdc().into(), 1_000u32);

        assert!(matches!(
            pool(0).get_output_amount(&amount_in),
            Err(SimulationError::InsufficientLiquidity(_))
        ));
    }

    #[test]
    fn test_foreign_token() {
        let amount_in =
            CurrencyAmount::from_raw_amount(Chain::Base.wrapped_native_token().into(), 1_000u32);

        assert!(matches!(
            liquid_pool().get_output_amount(&amount_in),
            Err(SimulationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_sqrt_price_rejected() {
        let result = Pool::new(usdc(), weth(), FeeAmount::Low, BigUint::zero(), BigUint::one());

        assert!(matches!(result, Err(VenueError::InvalidState(_))));
    }
}
