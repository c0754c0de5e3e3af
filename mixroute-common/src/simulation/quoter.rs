use async_trait::async_trait;
use tracing::{debug, instrument};

use super::errors::SimulationError;
use crate::{
    math::CurrencyAmount,
    models::TradeType,
    route::{Route, SwapRoute},
};

/// Computes the complementary amount of a route leg.
///
/// For an exact input leg the quoter returns the amount of the route's output currency received
/// for `amount`; for an exact output leg, the amount of the route's input currency required to
/// receive `amount`. Implementations may reach out to external state, hence the async signature.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait RouteQuoter: Send + Sync {
    async fn quote(
        &self,
        route: &Route,
        amount: &CurrencyAmount,
        trade_type: TradeType,
    ) -> Result<CurrencyAmount, SimulationError>;
}

/// Quotes routes with the venues' own state and math, without any external lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalQuoter;

#[async_trait]
impl RouteQuoter for LocalQuoter {
    #[instrument(skip_all, fields(protocol = %route.protocol(), %trade_type))]
    async fn quote(
        &self,
        route: &Route,
        amount: &CurrencyAmount,
        trade_type: TradeType,
    ) -> Result<CurrencyAmount, SimulationError> {
        match trade_type {
            TradeType::ExactInput => {
                if !amount
                    .currency()
                    .wraps_to_same(route.input())
                {
                    return Err(SimulationError::InvalidInput(format!(
                        "cannot quote {} into a route starting with {}",
                        amount.currency(),
                        route.input()
                    )));
                }
                let mut current = amount.wrapped();
                for (index, venue) in route.venues().iter().enumerate() {
                    let next = venue.get_output_amount(&current)?;
                    debug!(index, %venue, amount_in = %current, amount_out = %next, "Quoted leg");
                    current = next;
                }
                Ok(current.with_currency(route.output())?)
            }
            TradeType::ExactOutput => {
                if !amount
                    .currency()
                    .wraps_to_same(route.output())
                {
                    return Err(SimulationError::InvalidInput(format!(
                        "cannot quote {} out of a route ending with {}",
                        amount.currency(),
                        route.output()
                    )));
                }
                let mut current = amount.wrapped();
                for (index, venue) in route.venues().iter().enumerate().rev() {
                    let previous = venue.get_input_amount(&current)?;
                    debug!(index, %venue, amount_out = %current, amount_in = %previous, "Quoted leg");
                    current = previous;
                }
                Ok(current.with_currency(route.input())?)
            }
        }
    }
}
