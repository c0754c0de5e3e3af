use thiserror::Error;

/// Errors raised while encoding or decoding a byte path.
///
/// Variants:
/// - `InvariantViolation`: a route handed to the encoder is internally inconsistent. Validated
///   routes never trigger it, so it points at a bug rather than at bad user input.
/// - `InvalidLength`: a byte path to decode is not a token address followed by whole hops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Route invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Invalid path length: {0} bytes")]
    InvalidLength(usize),
}
