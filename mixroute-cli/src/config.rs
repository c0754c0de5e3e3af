use std::{collections::HashMap, fs::File, io::Read, str::FromStr};

use mixroute_common::{
    models::{
        token::{Currency, Token},
        Address, Chain, Protocol,
    },
    route::{MixedRoute, PairRoute, PoolRoute, Route, RouteError},
    venue::{FeeAmount, Pair, Pool, Venue, VenueError},
};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read route file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse route file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Token {0} is not declared under `tokens`")]
    UnknownToken(Address),
    #[error("Invalid currency {0:?}, expected `native` or a token address")]
    InvalidCurrency(String),
    #[error("A {expected} route cannot hold a {found} venue")]
    ProtocolMismatch { expected: Protocol, found: Protocol },
    #[error(transparent)]
    Venue(#[from] VenueError),
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// A token declaration of a route file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenConfig {
    pub address: Address,
    pub symbol: String,
    pub decimals: u32,
}

/// A venue declaration of a route file, tagged by its `type`.
///
/// Reserves, prices and liquidity accept plain integers or decimal strings, the latter for values
/// beyond 64 bits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VenueConfig {
    Pair {
        token_a: Address,
        token_b: Address,
        #[serde(deserialize_with = "deserialize_biguint")]
        reserve_a: BigUint,
        #[serde(deserialize_with = "deserialize_biguint")]
        reserve_b: BigUint,
    },
    Pool {
        token_a: Address,
        token_b: Address,
        fee: FeeAmount,
        #[serde(deserialize_with = "deserialize_biguint")]
        sqrt_price_x96: BigUint,
        #[serde(deserialize_with = "deserialize_biguint")]
        liquidity: BigUint,
    },
}

/// Describes one route: its chain, its endpoints and the venues it crosses, in swap order.
///
/// ```yaml
/// chain: ethereum
/// protocol: mixed
/// input: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
/// output: native
/// tokens:
///   - address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
///     symbol: USDC
///     decimals: 6
/// venues:
///   - type: pool
///     token_a: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
///     token_b: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
///     fee: 500
///     sqrt_price_x96: "1771595571142957102961017161607260"
///     liquidity: "10000000000000000000000"
/// ```
///
/// The chain's wrapped native token is always known and need not be declared.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteFile {
    #[serde(default)]
    pub chain: Chain,
    /// Route type to build, `mixed` when omitted.
    #[serde(default)]
    pub protocol: Option<Protocol>,
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
    pub venues: Vec<VenueConfig>,
}

impl RouteFile {
    pub fn from_yaml(path: &str) -> Result<Self, CliError> {
        let mut file =
            File::open(path).map_err(|source| CliError::Io { path: path.to_string(), source })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|source| CliError::Io { path: path.to_string(), source })?;
        Self::from_str(&contents)
    }

    fn token_registry(&self) -> HashMap<Address, Token> {
        let wrapped = self.chain.wrapped_native_token();
        let mut registry = HashMap::from([(wrapped.address.clone(), wrapped)]);
        for token in &self.tokens {
            registry.insert(
                token.address.clone(),
                Token::new(&token.address, &token.symbol, token.decimals, self.chain),
            );
        }
        registry
    }

    /// Resolves every declaration and builds the validated route.
    pub fn build_route(&self) -> Result<Route, CliError> {
        let registry = self.token_registry();
        let token = |address: &Address| {
            registry
                .get(address)
                .cloned()
                .ok_or_else(|| CliError::UnknownToken(address.clone()))
        };
        let currency = |raw: &str| -> Result<Currency, CliError> {
            if raw.eq_ignore_ascii_case("native") {
                return Ok(Currency::native(self.chain));
            }
            let address =
                Address::from_str(raw).map_err(|_| CliError::InvalidCurrency(raw.to_string()))?;
            Ok(token(&address)?.into())
        };

        let input = currency(&self.input)?;
        let output = currency(&self.output)?;
        let venues = self
            .venues
            .iter()
            .map(|venue| -> Result<Venue, CliError> {
                Ok(match venue {
                    VenueConfig::Pair { token_a, token_b, reserve_a, reserve_b } => Pair::new(
                        token(token_a)?,
                        token(token_b)?,
                        reserve_a.clone(),
                        reserve_b.clone(),
                    )?
                    .into(),
                    VenueConfig::Pool { token_a, token_b, fee, sqrt_price_x96, liquidity } => {
                        Pool::new(
                            token(token_a)?,
                            token(token_b)?,
                            *fee,
                            sqrt_price_x96.clone(),
                            liquidity.clone(),
                        )?
                        .into()
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match self.protocol.unwrap_or(Protocol::Mixed) {
            Protocol::Mixed => Ok(MixedRoute::new(venues, input, output)?.into()),
            Protocol::V2 => {
                let pairs = venues
                    .into_iter()
                    .map(|venue| match venue {
                        Venue::Pair(pair) => Ok(pair),
                        other => Err(CliError::ProtocolMismatch {
                            expected: Protocol::V2,
                            found: other.protocol(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PairRoute::new(pairs, input, output)?.into())
            }
            Protocol::V3 => {
                let pools = venues
                    .into_iter()
                    .map(|venue| match venue {
                        Venue::Pool(pool) => Ok(pool),
                        other => Err(CliError::ProtocolMismatch {
                            expected: Protocol::V3,
                            found: other.protocol(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PoolRoute::new(pools, input, output)?.into())
            }
        }
    }
}

impl FromStr for RouteFile {
    type Err = CliError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

fn deserialize_biguint<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(BigUint::from(value)),
        Raw::Text(value) => BigUint::from_str(&value).map_err(serde::de::Error::custom),
    }
}
