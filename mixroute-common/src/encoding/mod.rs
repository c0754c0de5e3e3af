//! Canonical byte path of a route, as consumed by on-chain swap routers.
pub mod errors;
pub mod path;

pub use errors::EncodingError;
pub use path::{
    decode_path, encode_mixed_route_to_path, encode_route_to_path, PathHop,
    V2_FEE_PATH_PLACEHOLDER,
};
