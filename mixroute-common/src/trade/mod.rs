//! Aggregation of several routes into one logical trade.
//!
//! A [`Trade`] owns an ordered list of [`Swap`]s, each a route with its resolved input and output
//! amounts. All swaps share the trade's input and output currencies (compared in wrapped form)
//! and no venue may be used twice across the whole trade. Totals, execution price and price
//! impact are derived once when the trade is built.
pub mod errors;

use std::collections::HashSet;

pub use errors::{Side, TradeError};
use futures03::future::try_join_all;
use num::{rational::BigRational, One};
use tracing::debug;

use crate::{
    math::{CurrencyAmount, Percent, Price},
    models::{token::Currency, Protocol, TradeType},
    route::{MixedRoute, PairRoute, PoolRoute, Route, SwapRoute},
    simulation::quoter::RouteQuoter,
};

/// Routes grouped by protocol, each carrying a value of type `T`: the resolved amounts for
/// [`Trade::new`], the single known amount for [`Trade::from_routes`].
#[derive(Debug, Clone)]
pub struct RouteGroups<T> {
    pub v2: Vec<(PairRoute, T)>,
    pub v3: Vec<(PoolRoute, T)>,
    pub mixed: Vec<(MixedRoute, T)>,
}

impl<T> Default for RouteGroups<T> {
    fn default() -> Self {
        Self { v2: Vec::new(), v3: Vec::new(), mixed: Vec::new() }
    }
}

impl<T> RouteGroups<T> {
    pub fn is_empty(&self) -> bool {
        self.v2.is_empty() && self.v3.is_empty() && self.mixed.is_empty()
    }

    /// Flattens the groups into tagged routes: V2 first, then V3, then mixed.
    pub fn into_routes(self) -> Vec<(Route, T)> {
        self.v2
            .into_iter()
            .map(|(route, value)| (route.into(), value))
            .chain(
                self.v3
                    .into_iter()
                    .map(|(route, value)| (route.into(), value)),
            )
            .chain(
                self.mixed
                    .into_iter()
                    .map(|(route, value)| (route.into(), value)),
            )
            .collect()
    }
}

/// One route of a trade together with its resolved amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub route: Route,
    pub input_amount: CurrencyAmount,
    pub output_amount: CurrencyAmount,
}

impl Swap {
    pub fn new(route: Route, input_amount: CurrencyAmount, output_amount: CurrencyAmount) -> Self {
        Self { route, input_amount, output_amount }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    swaps: Vec<Swap>,
    trade_type: TradeType,
    input_amount: CurrencyAmount,
    output_amount: CurrencyAmount,
    execution_price: Price,
    price_impact: Percent,
}

impl Trade {
    /// Builds a trade from routes whose amounts are already known.
    ///
    /// Swaps are ordered V2 routes first, then V3, then mixed.
    pub fn new(
        routes: RouteGroups<(CurrencyAmount, CurrencyAmount)>,
        trade_type: TradeType,
    ) -> Result<Self, TradeError> {
        let swaps = routes
            .into_routes()
            .into_iter()
            .map(|(route, (input_amount, output_amount))| {
                Swap::new(route, input_amount, output_amount)
            })
            .collect();
        Self::from_swaps(swaps, trade_type)
    }

    /// Builds a trade from already tagged swaps.
    ///
    /// ## Errors
    /// - `TradeError::EmptySwaps` if `swaps` is empty.
    /// - `TradeError::CurrencyMismatch` if a swap amount is not denominated in its route's
    ///   currency, or if a route's input or output differs, once wrapped, from the first route's.
    /// - `TradeError::DuplicateVenue` if a venue appears more than once across all swaps.
    pub fn from_swaps(swaps: Vec<Swap>, trade_type: TradeType) -> Result<Self, TradeError> {
        let first = swaps
            .first()
            .ok_or(TradeError::EmptySwaps)?;
        let input_currency = first.route.input().clone();
        let output_currency = first.route.output().clone();

        let mut normalized = Vec::with_capacity(swaps.len());
        let mut seen = HashSet::new();
        for swap in swaps {
            let route = &swap.route;
            ensure_wraps_to_same(Side::Input, &input_currency, route.input())?;
            ensure_wraps_to_same(Side::Output, &output_currency, route.output())?;
            ensure_wraps_to_same(Side::Input, route.input(), swap.input_amount.currency())?;
            ensure_wraps_to_same(Side::Output, route.output(), swap.output_amount.currency())?;
            for venue in route.venues() {
                if !seen.insert(venue.address().clone()) {
                    return Err(TradeError::DuplicateVenue(venue.address().clone()));
                }
            }
            let input_amount = swap
                .input_amount
                .with_currency(route.input())?;
            let output_amount = swap
                .output_amount
                .with_currency(route.output())?;
            normalized.push(Swap::new(swap.route, input_amount, output_amount));
        }

        let mut input_amount = CurrencyAmount::zero(input_currency.clone());
        let mut output_amount = CurrencyAmount::zero(output_currency.clone());
        let mut spot_output_amount = CurrencyAmount::zero(output_currency.clone());
        for swap in &normalized {
            input_amount = input_amount.add(&swap.input_amount.with_currency(&input_currency)?)?;
            output_amount =
                output_amount.add(&swap.output_amount.with_currency(&output_currency)?)?;
            let spot = swap
                .route
                .mid_price()
                .quote(&swap.input_amount)?;
            spot_output_amount = spot_output_amount.add(&spot.with_currency(&output_currency)?)?;
        }

        let execution_price = Price::from_amounts(&input_amount, &output_amount)?;
        let price_impact = Percent::from_fraction(
            spot_output_amount
                .subtract(&output_amount)?
                .divide(spot_output_amount.as_fraction())?
                .as_fraction()
                .clone(),
        );
        debug!(
            swaps = normalized.len(),
            %trade_type,
            input = %input_amount,
            output = %output_amount,
            %price_impact,
            "Built trade"
        );

        Ok(Self {
            swaps: normalized,
            trade_type,
            input_amount,
            output_amount,
            execution_price,
            price_impact,
        })
    }

    /// Builds a single route trade from amounts computed elsewhere.
    pub fn create_unchecked_trade(
        route: impl Into<Route>,
        input_amount: CurrencyAmount,
        output_amount: CurrencyAmount,
        trade_type: TradeType,
    ) -> Result<Self, TradeError> {
        Self::from_swaps(vec![Swap::new(route.into(), input_amount, output_amount)], trade_type)
    }

    /// Builds a single route trade, resolving the unknown amount through `quoter`.
    ///
    /// `amount` is the input amount for an exact input trade and the output amount for an exact
    /// output trade.
    pub async fn from_route<Q: RouteQuoter + ?Sized>(
        quoter: &Q,
        route: impl Into<Route>,
        amount: CurrencyAmount,
        trade_type: TradeType,
    ) -> Result<Self, TradeError> {
        let route = route.into();
        ensure_supported(&route, trade_type)?;
        let swap = quote_swap(quoter, route, amount, trade_type).await?;
        Self::from_swaps(vec![swap], trade_type)
    }

    /// Builds a trade over several routes, resolving every unknown amount through `quoter`.
    ///
    /// Quotes run concurrently; the first failure aborts the whole construction.
    pub async fn from_routes<Q: RouteQuoter + ?Sized>(
        quoter: &Q,
        routes: RouteGroups<CurrencyAmount>,
        trade_type: TradeType,
    ) -> Result<Self, TradeError> {
        let routes = routes.into_routes();
        for (route, _) in &routes {
            ensure_supported(route, trade_type)?;
        }
        let swaps = try_join_all(
            routes
                .into_iter()
                .map(|(route, amount)| quote_swap(quoter, route, amount, trade_type)),
        )
        .await?;
        Self::from_swaps(swaps, trade_type)
    }

    pub fn swaps(&self) -> &[Swap] {
        &self.swaps
    }

    pub fn routes(&self) -> Vec<&Route> {
        self.swaps
            .iter()
            .map(|swap| &swap.route)
            .collect()
    }

    /// The route of a single route trade.
    pub fn route(&self) -> Result<&Route, TradeError> {
        match self.swaps.as_slice() {
            [swap] => Ok(&swap.route),
            swaps => Err(TradeError::MultipleRoutes(swaps.len())),
        }
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn input_currency(&self) -> &Currency {
        self.input_amount.currency()
    }

    pub fn output_currency(&self) -> &Currency {
        self.output_amount.currency()
    }

    /// Total input across all swaps, assuming no slippage.
    pub fn input_amount(&self) -> &CurrencyAmount {
        &self.input_amount
    }

    /// Total output across all swaps, assuming no slippage.
    pub fn output_amount(&self) -> &CurrencyAmount {
        &self.output_amount
    }

    /// Output over input of the whole trade.
    pub fn execution_price(&self) -> &Price {
        &self.execution_price
    }

    /// Relative shortfall of the output against what every route's mid price promises for its
    /// input.
    pub fn price_impact(&self) -> &Percent {
        &self.price_impact
    }

    /// The least output to accept under `slippage_tolerance`: `amount_out / (1 + slippage)`,
    /// rounded down, for exact input trades; the output itself for exact output trades.
    ///
    /// `amount_out` defaults to the trade's output amount.
    pub fn minimum_amount_out(
        &self,
        slippage_tolerance: &Percent,
        amount_out: Option<&CurrencyAmount>,
    ) -> Result<CurrencyAmount, TradeError> {
        ensure_slippage(slippage_tolerance)?;
        let amount_out = amount_out.unwrap_or(&self.output_amount);
        if self.trade_type == TradeType::ExactOutput {
            return Ok(amount_out.clone());
        }
        let factor = BigRational::one() + slippage_tolerance.as_fraction();
        let adjusted = BigRational::from_integer(amount_out.quotient()) / factor;
        Ok(CurrencyAmount::from_fraction(
            amount_out.currency().clone(),
            BigRational::from_integer(adjusted.floor().to_integer()),
        ))
    }

    /// The most input to spend under `slippage_tolerance`: `amount_in * (1 + slippage)`, rounded
    /// down, for exact output trades; the input itself for exact input trades.
    ///
    /// `amount_in` defaults to the trade's input amount.
    pub fn maximum_amount_in(
        &self,
        slippage_tolerance: &Percent,
        amount_in: Option<&CurrencyAmount>,
    ) -> Result<CurrencyAmount, TradeError> {
        ensure_slippage(slippage_tolerance)?;
        let amount_in = amount_in.unwrap_or(&self.input_amount);
        if self.trade_type == TradeType::ExactInput {
            return Ok(amount_in.clone());
        }
        let factor = BigRational::one() + slippage_tolerance.as_fraction();
        let adjusted = BigRational::from_integer(amount_in.quotient()) * factor;
        Ok(CurrencyAmount::from_fraction(
            amount_in.currency().clone(),
            BigRational::from_integer(adjusted.floor().to_integer()),
        ))
    }

    /// Execution price at the worst amounts `slippage_tolerance` permits.
    pub fn worst_execution_price(&self, slippage_tolerance: &Percent) -> Result<Price, TradeError> {
        Ok(Price::from_amounts(
            &self.maximum_amount_in(slippage_tolerance, None)?,
            &self.minimum_amount_out(slippage_tolerance, None)?,
        )?)
    }
}

fn ensure_wraps_to_same(
    side: Side,
    expected: &Currency,
    found: &Currency,
) -> Result<(), TradeError> {
    if !expected.wraps_to_same(found) {
        return Err(TradeError::CurrencyMismatch {
            side,
            expected: expected.clone(),
            found: found.clone(),
        });
    }
    Ok(())
}

fn ensure_slippage(slippage_tolerance: &Percent) -> Result<(), TradeError> {
    if slippage_tolerance.is_negative() {
        return Err(TradeError::InvalidSlippage(slippage_tolerance.clone()));
    }
    Ok(())
}

/// Mixed routes only support exact input trades.
fn ensure_supported(route: &Route, trade_type: TradeType) -> Result<(), TradeError> {
    if route.protocol() == Protocol::Mixed && trade_type == TradeType::ExactOutput {
        return Err(TradeError::UnsupportedTradeType { protocol: Protocol::Mixed, trade_type });
    }
    Ok(())
}

async fn quote_swap<Q: RouteQuoter + ?Sized>(
    quoter: &Q,
    route: Route,
    amount: CurrencyAmount,
    trade_type: TradeType,
) -> Result<Swap, TradeError> {
    let quoted = quoter
        .quote(&route, &amount, trade_type)
        .await?;
    Ok(match trade_type {
        TradeType::ExactInput => Swap::new(route, amount, quoted),
        TradeType::ExactOutput => Swap::new(route, quoted, amount),
    })
}
