//! Validated chains of venues.
//!
//! Three route types exist, one per [`Protocol`]: [`PairRoute`], [`PoolRoute`] and
//! [`MixedRoute`]. Consumers that only need the shared read-only view use the [`SwapRoute`]
//! trait, consumers that need to know which kind they hold match on the [`Route`] wrapper.
pub mod errors;
pub mod homogeneous;
pub mod mixed;

pub use errors::RouteError;
pub use homogeneous::{PairRoute, PoolRoute};
pub use mixed::{output_of_venues, MixedRoute};

use crate::{
    math::Price,
    models::{
        token::{Currency, Token},
        Chain, Protocol,
    },
    venue::Venue,
};

/// Read-only view shared by every route type.
pub trait SwapRoute {
    fn protocol(&self) -> Protocol;

    /// Venues in swap order.
    fn venues(&self) -> &[Venue];

    /// Wrapped tokens visited by the route, one more than there are venues.
    fn path(&self) -> &[Token];

    /// Spot price of the input in terms of the output, ignoring fees and depth.
    fn mid_price(&self) -> &Price;

    fn input(&self) -> &Currency;

    fn output(&self) -> &Currency;

    fn chain(&self) -> Chain {
        self.input().chain()
    }
}

/// A route tagged with its protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    V2(PairRoute),
    V3(PoolRoute),
    Mixed(MixedRoute),
}

impl Route {
    fn inner(&self) -> &dyn SwapRoute {
        match self {
            Route::V2(route) => route,
            Route::V3(route) => route,
            Route::Mixed(route) => route,
        }
    }
}

impl SwapRoute for Route {
    fn protocol(&self) -> Protocol {
        self.inner().protocol()
    }

    fn venues(&self) -> &[Venue] {
        self.inner().venues()
    }

    fn path(&self) -> &[Token] {
        self.inner().path()
    }

    fn mid_price(&self) -> &Price {
        self.inner().mid_price()
    }

    fn input(&self) -> &Currency {
        self.inner().input()
    }

    fn output(&self) -> &Currency {
        self.inner().output()
    }
}

impl From<PairRoute> for Route {
    fn from(route: PairRoute) -> Self {
        Route::V2(route)
    }
}

impl From<PoolRoute> for Route {
    fn from(route: PoolRoute) -> Self {
        Route::V3(route)
    }
}

impl From<MixedRoute> for Route {
    fn from(route: MixedRoute) -> Self {
        Route::Mixed(route)
    }
}

#[cfg(test)]
mod tests {
    use num::{BigUint, One};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::venue::{
        fixtures::{usdc, weth},
        FeeAmount, Pair, Pool,
    };

    #[test]
    fn test_route_delegates_to_wrapped_route() {
        let pair = Pair::new(weth(), usdc(), BigUint::from(1u32), BigUint::from(2_000u32)).unwrap();
        let pool =
            Pool::new(weth(), usdc(), FeeAmount::Low, BigUint::one() << 96u32, BigUint::one())
                .unwrap();
        let pair_route = PairRoute::new(vec![pair.clone()], weth().into(), usdc().into()).unwrap();
        let pool_route = PoolRoute::new(vec![pool.clone()], weth().into(), usdc().into()).unwrap();
        let mixed_route =
            MixedRoute::new(vec![pair.into(), pool.into()], weth().into(), weth().into()).unwrap();

        let routes: Vec<Route> =
            vec![pair_route.clone().into(), pool_route.into(), mixed_route.clone().into()];

        assert_eq!(
            routes
                .iter()
                .map(Route::protocol)
                .collect::<Vec<_>>(),
            vec![Protocol::V2, Protocol::V3, Protocol::Mixed]
        );
        assert_eq!(routes[0].mid_price(), pair_route.mid_price());
        assert_eq!(routes[2].path(), mixed_route.path());
        assert_eq!(routes[2].venues().len(), 2);
        assert_eq!(routes[1].chain(), Chain::Ethereum);
    }
}
