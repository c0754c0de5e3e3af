use strum_macros::Display;
use thiserror::Error;

use crate::{
    math::{AmountError, Percent},
    models::{token::Currency, Address, Protocol, TradeType},
    simulation::errors::SimulationError,
};

/// Which end of a trade a currency check failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Input,
    Output,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Trade must contain at least one swap")]
    EmptySwaps,
    #[error("Currency mismatch on {side}: expected {expected}, found {found}")]
    CurrencyMismatch { side: Side, expected: Currency, found: Currency },
    #[error("Venue {0} is used more than once")]
    DuplicateVenue(Address),
    #[error("Slippage tolerance must not be negative, got {0}")]
    InvalidSlippage(Percent),
    #[error("Trade has {0} routes, expected exactly one")]
    MultipleRoutes(usize),
    #[error("{protocol} routes do not support {trade_type} trades")]
    UnsupportedTradeType { protocol: Protocol, trade_type: TradeType },
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error("Failed to quote route: {0}")]
    Quote(#[from] SimulationError),
}
