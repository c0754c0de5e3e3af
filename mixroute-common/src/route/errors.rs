use thiserror::Error;

use crate::{
    models::{
        token::{Currency, Token},
        Chain,
    },
    simulation::errors::SimulationError,
};

/// Errors raised when a sequence of venues does not form a valid route.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("Route must contain at least one venue")]
    Empty,
    #[error("Chain mismatch: route is on {expected}, found {found}")]
    ChainMismatch { expected: Chain, found: Chain },
    #[error("Input {0} is not held by the first venue")]
    InputMismatch(Currency),
    #[error("Output {0} is not the exit token of the last venue")]
    OutputMismatch(Currency),
    #[error("Venue {index} does not hold the running token {token}")]
    Disconnected { index: usize, token: Token },
    #[error("Cannot price venue {index}: {source}")]
    Unpriceable {
        index: usize,
        #[source]
        source: SimulationError,
    },
}
