//! Route models, path encoding and trade aggregation for swaps that span constant product pairs
//! and concentrated liquidity pools.
//!
//! The crate is organised leaves first:
//!
//! - [`models`]: chains, tokens, currencies and the trade/protocol tags.
//! - [`math`]: exact rational amounts, prices and percentages.
//! - [`venue`]: pair-style and pool-style liquidity venues behind the tagged [`venue::Venue`].
//! - [`route`]: validated venue chains, the protocol wrappers and the [`route::SwapRoute`]
//!   capability trait.
//! - [`encoding`]: the canonical byte path of a route.
//! - [`trade`]: aggregation of several routes into one [`trade::Trade`].
//! - [`simulation`]: venue math errors and the asynchronous [`simulation::quoter::RouteQuoter`]
//!   seam used to resolve leg amounts.
pub mod encoding;
pub mod hex_bytes;
pub mod math;
pub mod models;
pub mod route;
pub mod simulation;
pub mod trade;
pub mod venue;

pub use hex_bytes::Bytes;
use tiny_keccak::{Hasher, Keccak};

/// Computes the keccak256 digest of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data.as_ref());
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty_input() {
        assert_eq!(
            hex::encode(keccak256(Vec::new())),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
