use thiserror::Error;

use crate::math::AmountError;

/// Represents the errors raised while simulating a swap against a venue or a route.
///
/// Variants:
/// - `InvalidInput`: the simulation was asked something that cannot be answered with the given
///   parameters, e.g. a token the venue does not hold or a zero amount.
/// - `InsufficientLiquidity`: the venue state cannot fill the requested amount.
/// - `Amount`: an exact arithmetic step failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient liquidity: {0}")]
    InsufficientLiquidity(String),
    #[error(transparent)]
    Amount(#[from] AmountError),
}
