use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::{Address, Chain};
use crate::Bytes;

#[derive(Debug, Clone, Deserialize, Serialize, Eq)]
pub struct Token {
    pub address: Bytes,
    pub symbol: String,
    pub decimals: u32,
    pub chain: Chain,
}

impl Token {
    pub fn new(address: &Bytes, symbol: &str, decimals: u32, chain: Chain) -> Self {
        Self { address: address.clone(), symbol: symbol.to_string(), decimals, chain }
    }

    /// One
    /// Get one token in BigUint format
    ///
    /// ## Return
    /// Returns one token as BigUint
    pub fn one(&self) -> BigUint {
        BigUint::from(10u32).pow(self.decimals)
    }

    /// Whether this token sorts before `other` in a venue's canonical `token0`/`token1` order.
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address
            .cmp(&other.address)
            .then(self.chain.cmp(&other.chain))
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.chain == other.chain
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.chain.hash(state);
    }
}

impl From<Token> for Address {
    fn from(val: Token) -> Self {
        val.address
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", self.symbol, self.address)
    }
}

/// Either the native currency of a chain or a token identified by its address.
///
/// Venues only operate on tokens, so every currency has an on-chain token form returned by
/// [`Currency::wrapped`]. Equality is canonical: a native currency never equals its own wrapped
/// token, compare the wrapped forms when that is what is meant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Currency {
    Native(Chain),
    Token(Token),
}

impl Currency {
    pub fn native(chain: Chain) -> Self {
        Currency::Native(chain)
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native(_))
    }

    pub fn chain(&self) -> Chain {
        match self {
            Currency::Native(chain) => *chain,
            Currency::Token(token) => token.chain,
        }
    }

    pub fn decimals(&self) -> u32 {
        match self {
            Currency::Native(chain) => chain.native_decimals(),
            Currency::Token(token) => token.decimals,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Currency::Native(chain) => chain.native_symbol(),
            Currency::Token(token) => &token.symbol,
        }
    }

    /// Returns the token form of this currency.
    pub fn wrapped(&self) -> Token {
        match self {
            Currency::Native(chain) => chain.wrapped_native_token(),
            Currency::Token(token) => token.clone(),
        }
    }

    /// Whether both currencies resolve to the same on-chain token.
    pub fn wraps_to_same(&self, other: &Currency) -> bool {
        self.wrapped() == other.wrapped()
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Currency::Token(token)
    }
}

impl From<&Token> for Currency {
    fn from(token: &Token) -> Self {
        Currency::Token(token.clone())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Native(chain) => write!(f, "{}({chain})", chain.native_symbol()),
            Currency::Token(token) => token.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn usdc() -> Token {
        Token::new(
            &Bytes::from_str("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap(),
            "USDC",
            6,
            Chain::Ethereum,
        )
    }

    #[test]
    fn test_constructor() {
        let token = usdc();

        assert_eq!(token.symbol, "USDC");
        assert_eq!(token.decimals, 6);
        assert_eq!(
            format!("{token_address:#x}", token_address = token.address),
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        );
    }

    #[test]
    fn test_cmp() {
        let usdc = usdc();
        let usdc2 = Token { symbol: "USDC2".to_string(), ..usdc.clone() };
        let weth = Chain::Ethereum.wrapped_native_token();
        let usdc_on_base = Token { chain: Chain::Base, ..usdc.clone() };

        assert!(usdc < weth);
        assert!(usdc.sorts_before(&weth));
        assert_eq!(usdc, usdc2);
        assert_ne!(usdc, usdc_on_base);
    }

    #[test]
    fn test_one() {
        assert_eq!(usdc().one(), BigUint::from(1000000u64));
    }

    #[test]
    fn test_native_currency_wraps_to_weth() {
        let eth = Currency::native(Chain::Ethereum);
        let weth = Currency::from(Chain::Ethereum.wrapped_native_token());

        assert!(eth.is_native());
        assert_ne!(eth, weth);
        assert!(eth.wraps_to_same(&weth));
        assert_eq!(eth.decimals(), 18);
        assert_eq!(eth.symbol(), "ETH");
    }
}
