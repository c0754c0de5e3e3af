pub mod token;

use hex_literal::hex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use token::Token;

use crate::Bytes;

/// Address hash literal type to uniquely identify contracts/accounts on a
/// blockchain.
pub type Address = Bytes;

/// Keccak hash of a contract's creation code, as used by CREATE2.
pub type CodeHash = Bytes;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Chain {
    #[default]
    Ethereum,
    Arbitrum,
    Base,
}

/// A factory deployment able to derive venue addresses through CREATE2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryDeployment {
    pub factory: Address,
    pub init_code_hash: CodeHash,
}

impl FactoryDeployment {
    fn new(factory: [u8; 20], init_code_hash: [u8; 32]) -> Self {
        Self { factory: factory.into(), init_code_hash: init_code_hash.into() }
    }
}

const PAIR_INIT_CODE_HASH: [u8; 32] =
    hex!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

const POOL_INIT_CODE_HASH: [u8; 32] =
    hex!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

fn wrapped_native_eth(chain: Chain, address: [u8; 20]) -> Token {
    Token::new(&address.into(), "WETH", 18, chain)
}

impl Chain {
    pub fn id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Arbitrum => 42161,
            Chain::Base => 8453,
        }
    }

    /// Symbol of the chain's native currency.
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Ethereum | Chain::Arbitrum | Chain::Base => "ETH",
        }
    }

    pub fn native_decimals(&self) -> u32 {
        18
    }

    /// Returns the wrapped native token for the chain.
    ///
    /// Venues only ever hold wrapped tokens; this is the token a native input or output is
    /// substituted with on the wire.
    pub fn wrapped_native_token(&self) -> Token {
        match self {
            Chain::Ethereum => {
                wrapped_native_eth(Chain::Ethereum, hex!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"))
            }
            Chain::Arbitrum => {
                wrapped_native_eth(Chain::Arbitrum, hex!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"))
            }
            Chain::Base => {
                wrapped_native_eth(Chain::Base, hex!("4200000000000000000000000000000000000006"))
            }
        }
    }

    /// Factory of the constant product pair deployment on this chain.
    pub fn pair_factory(&self) -> FactoryDeployment {
        let factory = match self {
            Chain::Ethereum => hex!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f"),
            Chain::Arbitrum => hex!("f1D7CC64Fb4452F05c498126312eBE29f30Fbcf9"),
            Chain::Base => hex!("8909Dc15e40173Ff4699343b6eB8132c65e18eC6"),
        };
        FactoryDeployment::new(factory, PAIR_INIT_CODE_HASH)
    }

    /// Factory of the concentrated liquidity pool deployment on this chain.
    pub fn pool_factory(&self) -> FactoryDeployment {
        let factory = match self {
            Chain::Ethereum | Chain::Arbitrum => hex!("1F98431c8aD98523631AE4a59f267346ea31F984"),
            Chain::Base => hex!("33128a8fC17869897dcE68Ed026d694621f6FDfD"),
        };
        FactoryDeployment::new(factory, POOL_INIT_CODE_HASH)
    }
}

/// Whether the known amount of a trade denominates its input or its output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, Default,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TradeType {
    /// The input amount is fixed, the output amount is computed.
    #[default]
    ExactInput,
    /// The output amount is fixed, the input amount is computed.
    ExactOutput,
}

/// The protocol family of a venue or a route.
///
/// Pair venues are tagged `V2`, pool venues `V3`. A route is `Mixed` when it is built through
/// the mixed route type, whatever venues it holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    V2,
    V3,
    Mixed,
}
