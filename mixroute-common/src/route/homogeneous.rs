//! Routes restricted to a single venue style.
//!
//! They validate and derive exactly like [`MixedRoute`]; keeping them as distinct types is what
//! lets the trade layer and downstream executors tell V2 and V3 routes apart.
use super::{errors::RouteError, mixed::MixedRoute, SwapRoute};
use crate::{
    math::Price,
    models::{
        token::{Currency, Token},
        Chain, Protocol,
    },
    venue::{Pair, Pool, Venue},
};

/// A route made of constant product pairs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRoute(MixedRoute);

impl PairRoute {
    pub fn new(pairs: Vec<Pair>, input: Currency, output: Currency) -> Result<Self, RouteError> {
        let venues = pairs
            .into_iter()
            .map(Venue::Pair)
            .collect();
        Ok(Self(MixedRoute::new(venues, input, output)?))
    }

    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.0
            .venues()
            .iter()
            .filter_map(|venue| match venue {
                Venue::Pair(pair) => Some(pair),
                Venue::Pool(_) => None,
            })
    }

    pub fn chain(&self) -> Chain {
        self.0.chain()
    }
}

/// A route made of concentrated liquidity pools only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRoute(MixedRoute);

impl PoolRoute {
    pub fn new(pools: Vec<Pool>, input: Currency, output: Currency) -> Result<Self, RouteError> {
        let venues = pools
            .into_iter()
            .map(Venue::Pool)
            .collect();
        Ok(Self(MixedRoute::new(venues, input, output)?))
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.0
            .venues()
            .iter()
            .filter_map(|venue| match venue {
                Venue::Pool(pool) => Some(pool),
                Venue::Pair(_) => None,
            })
    }

    pub fn chain(&self) -> Chain {
        self.0.chain()
    }
}

impl SwapRoute for PairRoute {
    fn protocol(&self) -> Protocol {
        Protocol::V2
    }

    fn venues(&self) -> &[Venue] {
        self.0.venues()
    }

    fn path(&self) -> &[Token] {
        self.0.path()
    }

    fn mid_price(&self) -> &Price {
        self.0.mid_price()
    }

    fn input(&self) -> &Currency {
        self.0.input()
    }

    fn output(&self) -> &Currency {
        self.0.output()
    }
}

impl SwapRoute for PoolRoute {
    fn protocol(&self) -> Protocol {
        Protocol::V3
    }

    fn venues(&self) -> &[Venue] {
        self.0.venues()
    }

    fn path(&self) -> &[Token] {
        self.0.path()
    }

    fn mid_price(&self) -> &Price {
        self.0.mid_price()
    }

    fn input(&self) -> &Currency {
        self.0.input()
    }

    fn output(&self) -> &Currency {
        self.0.output()
    }
}

#[cfg(test)]
mod tests {
    use num::{BigUint, One};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::venue::{
        fixtures::{dai, usdc, weth},
        FeeAmount,
    };

    fn pool(token_a: Token, token_b: Token) -> Pool {
        Pool::new(token_a, token_b, FeeAmount::Medium, BigUint::one() << 96u32, BigUint::one())
            .unwrap()
    }

    fn pair(token_a: Token, token_b: Token) -> Pair {
        Pair::new(token_a, token_b, BigUint::from(1_000u32), BigUint::from(2_000u32)).unwrap()
    }

    #[test]
    fn test_pair_route() {
        let route = PairRoute::new(
            vec![pair(weth(), usdc()), pair(usdc(), dai())],
            Currency::native(Chain::Ethereum),
            dai().into(),
        )
        .unwrap();

        assert_eq!(route.protocol(), Protocol::V2);
        assert_eq!(route.path(), &[weth(), usdc(), dai()]);
        assert_eq!(route.pairs().count(), 2);
        assert_eq!(route.chain(), Chain::Ethereum);
    }

    #[test]
    fn test_pool_route_validates_like_mixed() {
        let pools = vec![pool(weth(), usdc())];

        let route = PoolRoute::new(pools.clone(), weth().into(), usdc().into()).unwrap();
        let invalid = PoolRoute::new(pools, weth().into(), dai().into());

        assert_eq!(route.protocol(), Protocol::V3);
        assert_eq!(route.pools().next(), Some(&pool(weth(), usdc())));
        assert_eq!(invalid, Err(RouteError::OutputMismatch(dai().into())));
    }
}
