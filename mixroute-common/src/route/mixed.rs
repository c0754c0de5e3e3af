use tracing::debug;

use super::{errors::RouteError, SwapRoute};
use crate::{
    math::Price,
    models::{
        token::{Currency, Token},
        Chain, Protocol,
    },
    venue::Venue,
};

/// A validated route whose venues may freely mix pairs and pools.
///
/// The token path and the mid price are derived once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedRoute {
    venues: Vec<Venue>,
    path: Vec<Token>,
    input: Currency,
    output: Currency,
    mid_price: Price,
}

impl MixedRoute {
    /// Builds a route trading `input` for `output` through `venues`, in order.
    ///
    /// ## Errors
    /// - `RouteError::Empty` if `venues` is empty.
    /// - `RouteError::ChainMismatch` if a venue or an endpoint lives on another chain than the
    ///   first venue.
    /// - `RouteError::InputMismatch` if the first venue does not hold `input` (in wrapped form).
    /// - `RouteError::Disconnected` if a venue does not hold the token the previous venue exits
    ///   with.
    /// - `RouteError::OutputMismatch` if the last venue does not exit with `output`.
    /// - `RouteError::Unpriceable` if a venue holds no liquidity to derive a spot price from.
    pub fn new(venues: Vec<Venue>, input: Currency, output: Currency) -> Result<Self, RouteError> {
        let first = venues.first().ok_or(RouteError::Empty)?;
        let chain = first.chain();
        for found in venues
            .iter()
            .map(Venue::chain)
            .chain([input.chain(), output.chain()])
        {
            if found != chain {
                return Err(RouteError::ChainMismatch { expected: chain, found });
            }
        }

        let wrapped_input = input.wrapped();
        if !first.involves_token(&wrapped_input) {
            return Err(RouteError::InputMismatch(input));
        }

        let mut path = Vec::with_capacity(venues.len() + 1);
        path.push(wrapped_input);
        for (index, venue) in venues.iter().enumerate() {
            let current = &path[index];
            let next = venue
                .other_token(current)
                .ok_or_else(|| RouteError::Disconnected { index, token: current.clone() })?
                .clone();
            path.push(next);
        }

        if path.last() != Some(&output.wrapped()) {
            return Err(RouteError::OutputMismatch(output));
        }

        let mid_price = mid_price(&venues, &path, &input, &output)?;
        debug!(
            venues = venues.len(),
            input = %input,
            output = %output,
            mid_price = %mid_price,
            "Built route"
        );
        Ok(Self { venues, path, input, output, mid_price })
    }

    pub fn chain(&self) -> Chain {
        self.path[0].chain
    }

    /// Splits the route into maximal runs of consecutive venues sharing a protocol.
    pub fn partition_by_protocol(&self) -> Vec<Vec<Venue>> {
        let mut sections: Vec<Vec<Venue>> = Vec::new();
        for venue in &self.venues {
            match sections.last_mut() {
                Some(section) if section[0].protocol() == venue.protocol() => {
                    section.push(venue.clone())
                }
                _ => sections.push(vec![venue.clone()]),
            }
        }
        sections
    }
}

impl SwapRoute for MixedRoute {
    fn protocol(&self) -> Protocol {
        Protocol::Mixed
    }

    fn venues(&self) -> &[Venue] {
        &self.venues
    }

    fn path(&self) -> &[Token] {
        &self.path
    }

    fn mid_price(&self) -> &Price {
        &self.mid_price
    }

    fn input(&self) -> &Currency {
        &self.input
    }

    fn output(&self) -> &Currency {
        &self.output
    }
}

/// Returns the token a contiguous slice of venues exits with when entered with `first_input`.
pub fn output_of_venues(venues: &[Venue], first_input: &Token) -> Result<Token, RouteError> {
    if venues.is_empty() {
        return Err(RouteError::Empty);
    }
    let mut current = first_input.clone();
    for (index, venue) in venues.iter().enumerate() {
        current = venue
            .other_token(&current)
            .ok_or_else(|| RouteError::Disconnected { index, token: current.clone() })?
            .clone();
    }
    Ok(current)
}

/// Chains the local price of every venue along `path`, then restates it in the route's own
/// currencies.
fn mid_price(
    venues: &[Venue],
    path: &[Token],
    input: &Currency,
    output: &Currency,
) -> Result<Price, RouteError> {
    let mut price: Option<Price> = None;
    for (index, (venue, token)) in venues.iter().zip(path).enumerate() {
        let local = venue
            .price_of(token)
            .map_err(|source| RouteError::Unpriceable { index, source })?;
        price = Some(match price {
            None => local,
            Some(acc) => acc
                .multiply(&local)
                .map_err(|err| RouteError::Unpriceable { index, source: err.into() })?,
        });
    }
    let price = price.ok_or(RouteError::Empty)?;
    Ok(Price::from_ratio(input.clone(), output.clone(), price.raw().clone()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        simulation::errors::SimulationError,
        venue::{
            fixtures::{dai, pair, pool, usdc, usdt, weth},
            FeeAmount,
        },
    };

    /// WETH -> USDC (pair, 2000 USDC/WETH) -> DAI (pool, raw price 1).
    fn venues() -> Vec<Venue> {
        vec![
            pair(weth(), usdc(), 1_000 * 10u128.pow(18), 2_000_000 * 10u128.pow(6)),
            pool(usdc(), dai(), FeeAmount::Lowest),
        ]
    }

    #[test]
    fn test_path_and_endpoints() {
        let route = MixedRoute::new(venues(), Currency::native(Chain::Ethereum), dai().into()).unwrap();

        assert_eq!(route.path(), &[weth(), usdc(), dai()]);
        assert_eq!(route.input(), &Currency::native(Chain::Ethereum));
        assert_eq!(route.output(), &Currency::from(dai()));
        assert_eq!(route.chain(), Chain::Ethereum);
        assert_eq!(route.protocol(), Protocol::Mixed);
    }

    #[test]
    fn test_mid_price() {
        let route = MixedRoute::new(venues(), weth().into(), dai().into()).unwrap();

        // 1 WETH = 2000e6 raw USDC = 2000e6 raw DAI
        assert_eq!(route.mid_price().base(), &Currency::from(weth()));
        assert_eq!(route.mid_price().to_significant(6), "0.000000002");
        assert_eq!(route.mid_price().raw().to_string(), "1/500000000");
    }

    #[test]
    fn test_mid_price_single_venue_matches_venue_price() {
        let venue = pair(weth(), usdc(), 10u128.pow(18), 3_000 * 10u128.pow(6));
        let expected = venue.price_of(&usdc()).unwrap();

        let route = MixedRoute::new(vec![venue], usdc().into(), weth().into()).unwrap();

        assert_eq!(route.mid_price(), &expected);
    }

    #[rstest]
    #[case::empty(vec![], weth(), dai(), RouteError::Empty)]
    #[case::wrong_input(venues(), usdt(), dai(), RouteError::InputMismatch(usdt().into()))]
    #[case::wrong_output(venues(), weth(), usdc(), RouteError::OutputMismatch(usdc().into()))]
    #[case::disconnected(
        vec![
            pair(weth(), usdc(), 1_000, 1_000),
            pool(dai(), usdt(), FeeAmount::Low),
        ],
        weth(),
        usdt(),
        RouteError::Disconnected { index: 1, token: usdc() }
    )]
    fn test_invalid_routes(
        #[case] venues: Vec<Venue>,
        #[case] input: Token,
        #[case] output: Token,
        #[case] expected: RouteError,
    ) {
        assert_eq!(MixedRoute::new(venues, input.into(), output.into()), Err(expected));
    }

    #[test]
    fn test_chain_mismatch() {
        let result = MixedRoute::new(venues(), Currency::native(Chain::Base), dai().into());

        assert_eq!(
            result,
            Err(RouteError::ChainMismatch { expected: Chain::Ethereum, found: Chain::Base })
        );
    }

    #[test]
    fn test_empty_pair_is_unpriceable() {
        let result = MixedRoute::new(vec![pair(weth(), usdc(), 0, 0)], weth().into(), usdc().into());

        assert!(matches!(result, Err(RouteError::Unpriceable { index: 0, .. })));
    }

    #[rstest]
    #[case::empty_output_reserve(1_000, 0)]
    #[case::empty_input_reserve(0, 1_000)]
    fn test_one_sided_empty_pair_is_unpriceable(
        #[case] reserve_usdc: u128,
        #[case] reserve_weth: u128,
    ) {
        let venues = vec![
            pool(dai(), usdc(), FeeAmount::Lowest),
            pair(usdc(), weth(), reserve_usdc, reserve_weth),
        ];

        let result = MixedRoute::new(venues, dai().into(), weth().into());

        assert!(matches!(
            result,
            Err(RouteError::Unpriceable {
                index: 1,
                source: SimulationError::InsufficientLiquidity(_)
            })
        ));
    }

    #[test]
    fn test_output_of_venues() {
        assert_eq!(output_of_venues(&venues(), &weth()).unwrap(), dai());
        assert_eq!(output_of_venues(&venues()[1..], &dai()).unwrap(), usdc());
        assert_eq!(output_of_venues(&[], &dai()), Err(RouteError::Empty));
    }

    #[test]
    fn test_partition_by_protocol() {
        let venues = vec![
            pair(weth(), usdc(), 1_000, 1_000),
            pair(usdc(), dai(), 1_000, 1_000),
            pool(dai(), usdt(), FeeAmount::Low),
            pair(usdt(), weth(), 1_000, 1_000),
        ];
        let route = MixedRoute::new(venues.clone(), weth().into(), weth().into()).unwrap();

        let sections = route.partition_by_protocol();

        assert_eq!(
            sections,
            vec![venues[..2].to_vec(), venues[2..3].to_vec(), venues[3..].to_vec()]
        );
    }
}
