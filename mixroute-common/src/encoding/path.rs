use std::fmt;

use tracing::trace;

use super::errors::EncodingError;
use crate::{
    models::{token::Token, Address},
    route::SwapRoute,
    venue::Venue,
    Bytes,
};

/// Fee field written for pair legs. Pool fee tiers stay far below 2^23, so the top bit of the
/// uint24 field never collides with a real tier.
pub const V2_FEE_PATH_PLACEHOLDER: u32 = 0x80_0000;

pub const ADDRESS_LENGTH: usize = 20;
pub const FEE_LENGTH: usize = 3;
const HOP_LENGTH: usize = FEE_LENGTH + ADDRESS_LENGTH;

/// One decoded leg of a byte path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHop {
    pub token_in: Address,
    pub fee: u32,
    pub token_out: Address,
}

impl PathHop {
    pub fn is_pair_hop(&self) -> bool {
        self.fee == V2_FEE_PATH_PLACEHOLDER
    }
}

impl fmt::Display for PathHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pair_hop() {
            write!(f, "{:#x} -[pair]-> {:#x}", self.token_in, self.token_out)
        } else {
            write!(f, "{:#x} -[pool {}]-> {:#x}", self.token_in, self.fee, self.token_out)
        }
    }
}

/// Encodes a route as `token | fee | token | ... | fee | token`, in swap order.
///
/// Token fields are 20 byte addresses; a native input or output is written as its wrapped token.
/// Fee fields are 3 byte big endian integers: the fee tier for pools and
/// [`V2_FEE_PATH_PLACEHOLDER`] for pairs.
pub fn encode_mixed_route_to_path<R: SwapRoute + ?Sized>(route: &R) -> Result<Bytes, EncodingError> {
    let (tokens, fees) = walk(route)?;
    Ok(pack(tokens.iter(), fees.iter()))
}

/// Encodes a route, reversed when `exact_output` is set: exact output execution consumes the
/// path starting from the output token.
pub fn encode_route_to_path<R: SwapRoute + ?Sized>(
    route: &R,
    exact_output: bool,
) -> Result<Bytes, EncodingError> {
    let (tokens, fees) = walk(route)?;
    if exact_output {
        Ok(pack(tokens.iter().rev(), fees.iter().rev()))
    } else {
        Ok(pack(tokens.iter(), fees.iter()))
    }
}

/// Splits a byte path back into its hops.
pub fn decode_path(path: &[u8]) -> Result<Vec<PathHop>, EncodingError> {
    if path.len() < ADDRESS_LENGTH + HOP_LENGTH || (path.len() - ADDRESS_LENGTH) % HOP_LENGTH != 0
    {
        return Err(EncodingError::InvalidLength(path.len()));
    }
    let mut hops = Vec::with_capacity((path.len() - ADDRESS_LENGTH) / HOP_LENGTH);
    let mut token_in = Address::from(&path[..ADDRESS_LENGTH]);
    for hop in path[ADDRESS_LENGTH..].chunks_exact(HOP_LENGTH) {
        let fee = u32::from_be_bytes([0, hop[0], hop[1], hop[2]]);
        let token_out = Address::from(&hop[FEE_LENGTH..]);
        hops.push(PathHop { token_in, fee, token_out: token_out.clone() });
        token_in = token_out;
    }
    Ok(hops)
}

fn fee_field(venue: &Venue) -> u32 {
    match venue {
        Venue::Pair(_) => V2_FEE_PATH_PLACEHOLDER,
        Venue::Pool(pool) => pool.fee().value(),
    }
}

/// Follows the route from its input and collects the visited tokens and the fee field of every
/// venue.
fn walk<R: SwapRoute + ?Sized>(route: &R) -> Result<(Vec<Token>, Vec<u32>), EncodingError> {
    let venues = route.venues();
    let mut tokens = Vec::with_capacity(venues.len() + 1);
    let mut fees = Vec::with_capacity(venues.len());
    let mut current = route.input().wrapped();
    for (index, venue) in venues.iter().enumerate() {
        let next = venue
            .other_token(&current)
            .ok_or_else(|| {
                EncodingError::InvariantViolation(format!(
                    "venue {index} ({venue}) does not hold {current}"
                ))
            })?
            .clone();
        let fee = fee_field(venue);
        trace!(index, fee, token_in = %current, token_out = %next, "Encoding hop");
        tokens.push(std::mem::replace(&mut current, next));
        fees.push(fee);
    }
    tokens.push(current);
    Ok((tokens, fees))
}

fn pack<'a>(
    mut tokens: impl Iterator<Item = &'a Token>,
    fees: impl Iterator<Item = &'a u32>,
) -> Bytes {
    let mut encoded = Vec::new();
    if let Some(first) = tokens.next() {
        encoded.extend_from_slice(&first.address);
    }
    for (fee, token) in fees.zip(tokens) {
        encoded.extend_from_slice(&fee.to_be_bytes()[1..]);
        encoded.extend_from_slice(&token.address);
    }
    encoded.into()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use num::{BigUint, One};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        math::Price,
        models::{token::Currency, Chain, Protocol},
        route::{MixedRoute, PairRoute, PoolRoute},
        venue::{
            fixtures::{dai, pair, pool, usdc, weth},
            FeeAmount, Pair, Pool,
        },
    };

    const USDC: &str = "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    const WETH: &str = "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
    const DAI: &str = "6b175474e89094c44da98b954eedeac495271d0f";

    /// USDC -> pool (0.3%) -> WETH -> pair -> DAI
    fn mixed_route(input: Currency, output: Currency) -> MixedRoute {
        MixedRoute::new(
            vec![
                pool(usdc(), weth(), FeeAmount::Medium),
                pair(weth(), dai(), 10u128.pow(18), 2_000 * 10u128.pow(18)),
            ],
            input,
            output,
        )
        .unwrap()
    }

    #[test]
    fn test_encode_mixed_route() {
        let route = mixed_route(usdc().into(), dai().into());

        let encoded = encode_mixed_route_to_path(&route).unwrap();

        assert_eq!(encoded.len(), 20 + 2 * 23);
        assert_eq!(encoded.to_string(), format!("0x{USDC}000bb8{WETH}800000{DAI}"));
    }

    #[test]
    fn test_native_endpoint_encoded_as_wrapped_token() {
        let route = MixedRoute::new(
            vec![pair(weth(), dai(), 10u128.pow(18), 2_000 * 10u128.pow(18))],
            Currency::native(Chain::Ethereum),
            dai().into(),
        )
        .unwrap();

        let encoded = encode_mixed_route_to_path(&route).unwrap();

        assert_eq!(encoded.to_string(), format!("0x{WETH}800000{DAI}"));
    }

    #[rstest]
    #[case::exact_input(false, format!("0x{USDC}000bb8{WETH}800000{DAI}"))]
    #[case::exact_output(true, format!("0x{DAI}800000{WETH}000bb8{USDC}"))]
    fn test_encode_route_to_path(#[case] exact_output: bool, #[case] expected: String) {
        let route = mixed_route(usdc().into(), dai().into());

        let encoded = encode_route_to_path(&route, exact_output).unwrap();

        assert_eq!(encoded.to_string(), expected);
    }

    #[test]
    fn test_homogeneous_routes() {
        let unit_pool = |token_a: Token, token_b: Token, fee: FeeAmount| {
            Pool::new(token_a, token_b, fee, BigUint::one() << 96u32, BigUint::one()).unwrap()
        };
        let pools =
            vec![unit_pool(usdc(), weth(), FeeAmount::Low), unit_pool(weth(), dai(), FeeAmount::High)];
        let pairs = vec![
            Pair::new(usdc(), weth(), 1u32.into(), 1u32.into()).unwrap(),
            Pair::new(weth(), dai(), 1u32.into(), 1u32.into()).unwrap(),
        ];
        let pool_route = PoolRoute::new(pools, usdc().into(), dai().into()).unwrap();
        let pair_route = PairRoute::new(pairs, usdc().into(), dai().into()).unwrap();

        assert_eq!(
            encode_mixed_route_to_path(&pool_route)
                .unwrap()
                .to_string(),
            format!("0x{USDC}0001f4{WETH}002710{DAI}")
        );
        assert_eq!(
            encode_mixed_route_to_path(&pair_route)
                .unwrap()
                .to_string(),
            format!("0x{USDC}800000{WETH}800000{DAI}")
        );
    }

    #[rstest]
    #[case::same_state((10u128.pow(18), 2_000 * 10u128.pow(18)), 10u64.pow(12))]
    #[case::small_reserves((1, 2), 1)]
    #[case::other_reserves((7, 9), 10u64.pow(18))]
    fn test_encoding_depends_only_on_tokens_and_fees(
        #[case] reserves: (u128, u128),
        #[case] liquidity: u64,
    ) {
        let reference = mixed_route(usdc().into(), dai().into());
        let rebuilt = MixedRoute::new(
            vec![
                Pool::new(
                    usdc(),
                    weth(),
                    FeeAmount::Medium,
                    BigUint::one() << 96u32,
                    BigUint::from(liquidity),
                )
                .unwrap()
                .into(),
                pair(dai(), weth(), reserves.1, reserves.0),
            ],
            usdc().into(),
            dai().into(),
        )
        .unwrap();

        let encoded = encode_mixed_route_to_path(&rebuilt).unwrap();

        assert_eq!(encoded, encode_mixed_route_to_path(&reference).unwrap());
        assert_eq!(encoded, encode_mixed_route_to_path(&rebuilt.clone()).unwrap());
        assert!(decode_path(&encoded).unwrap()[1].is_pair_hop());
    }

    #[test]
    fn test_decode_path() {
        let route = mixed_route(usdc().into(), dai().into());
        let encoded = encode_mixed_route_to_path(&route).unwrap();

        let hops = decode_path(&encoded).unwrap();

        assert_eq!(
            hops,
            vec![
                PathHop { token_in: usdc().address, fee: 3000, token_out: weth().address },
                PathHop {
                    token_in: weth().address,
                    fee: V2_FEE_PATH_PLACEHOLDER,
                    token_out: dai().address
                },
            ]
        );
        assert!(!hops[0].is_pair_hop());
        assert!(hops[1].is_pair_hop());
    }

    #[rstest]
    #[case(0)]
    #[case(20)]
    #[case(42)]
    #[case(44)]
    fn test_decode_path_invalid_length(#[case] length: usize) {
        assert_eq!(decode_path(&vec![0u8; length]), Err(EncodingError::InvalidLength(length)));
    }

    /// A route that skips validation, to feed the encoder inconsistent venues.
    struct UncheckedRoute {
        venues: Vec<Venue>,
        input: Currency,
        price: Price,
    }

    impl SwapRoute for UncheckedRoute {
        fn protocol(&self) -> Protocol {
            Protocol::Mixed
        }

        fn venues(&self) -> &[Venue] {
            &self.venues
        }

        fn path(&self) -> &[Token] {
            &[]
        }

        fn mid_price(&self) -> &Price {
            &self.price
        }

        fn input(&self) -> &Currency {
            &self.input
        }

        fn output(&self) -> &Currency {
            &self.input
        }
    }

    #[test]
    fn test_inconsistent_route_is_an_invariant_violation() {
        let route = UncheckedRoute {
            venues: vec![pair(usdc(), weth(), 1, 1), pair(usdc(), dai(), 1, 1)],
            input: usdc().into(),
            price: Price::new(usdc().into(), dai().into(), 1u32, 1u32).unwrap(),
        };

        let result = encode_mixed_route_to_path(&route);

        assert!(matches!(result, Err(EncodingError::InvariantViolation(_))));
    }

    #[test]
    fn test_placeholder_is_outside_fee_tiers() {
        let placeholder = Bytes::from_str("0x800000").unwrap();

        assert_eq!(placeholder[..], V2_FEE_PATH_PLACEHOLDER.to_be_bytes()[1..]);
        for fee in [FeeAmount::Lowest, FeeAmount::Low, FeeAmount::Medium, FeeAmount::High] {
            assert!(fee.value() < 1 << 23);
        }
    }
}
