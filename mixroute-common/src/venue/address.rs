//! Deterministic venue addresses.
//!
//! Both venue styles are deployed by a factory through CREATE2, so a venue's address follows from
//! the factory, its init code hash and a salt derived from the venue's identifying parameters:
//!
//! `address = keccak256(0xff ++ factory ++ salt ++ init_code_hash)[12..]`
use crate::{
    keccak256,
    models::{token::Token, Address, FactoryDeployment},
    venue::FeeAmount,
};

/// Computes a CREATE2 address for `salt` under `deployment`.
pub fn create2_address(deployment: &FactoryDeployment, salt: &[u8; 32]) -> Address {
    let mut preimage = Vec::with_capacity(1 + 20 + 32 + 32);
    preimage.push(0xff);
    preimage.extend_from_slice(&deployment.factory);
    preimage.extend_from_slice(salt);
    preimage.extend_from_slice(&deployment.init_code_hash);
    Address::from(&keccak256(preimage)[12..])
}

/// Address of the pair of two sorted tokens: the salt is `keccak256(token0 ++ token1)`.
pub fn pair_address(deployment: &FactoryDeployment, token0: &Token, token1: &Token) -> Address {
    let mut packed = Vec::with_capacity(40);
    packed.extend_from_slice(&token0.address);
    packed.extend_from_slice(&token1.address);
    create2_address(deployment, &keccak256(packed))
}

/// Address of the pool of two sorted tokens and a fee tier: the salt is the hash of the ABI
/// encoding of `(address, address, uint24)`, every field padded to a 32 byte word.
pub fn pool_address(
    deployment: &FactoryDeployment,
    token0: &Token,
    token1: &Token,
    fee: FeeAmount,
) -> Address {
    let mut encoded = Vec::with_capacity(96);
    encoded.extend_from_slice(&token0.address.lpad(32, 0));
    encoded.extend_from_slice(&token1.address.lpad(32, 0));
    encoded.extend_from_slice(&Address::from(&fee.value().to_be_bytes()[..]).lpad(32, 0));
    create2_address(deployment, &keccak256(encoded))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{models::Chain, Bytes};

    // EIP-1014 reference vectors, all deploying the init code `0x00`.
    #[rstest]
    #[case::zero_deployer(
        "0x0000000000000000000000000000000000000000",
        "0x0000000000000000000000000000000000000000000000000000000000000000",
        "0x4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38"
    )]
    #[case::deadbeef_deployer(
        "0xdeadbeef00000000000000000000000000000000",
        "0x0000000000000000000000000000000000000000000000000000000000000000",
        "0xB928f69Bb1D91Cd65274e3c79d8986362984fDA3"
    )]
    #[case::salted(
        "0xdeadbeef00000000000000000000000000000000",
        "0x000000000000000000000000feed000000000000000000000000000000000000",
        "0xD04116cDd17beBE565EB2422F2497E06cC1C9833"
    )]
    fn test_create2_address(#[case] factory: &str, #[case] salt: &str, #[case] expected: &str) {
        let deployment = FactoryDeployment {
            factory: Bytes::from_str(factory).unwrap(),
            init_code_hash: keccak256([0x00]).into(),
        };
        let salt: [u8; 32] = Bytes::from_str(salt)
            .unwrap()
            .as_ref()
            .try_into()
            .unwrap();

        assert_eq!(create2_address(&deployment, &salt), Bytes::from_str(expected).unwrap());
    }

    #[test]
    fn test_pool_factory_deployment() {
        assert_eq!(
            Chain::Ethereum.pool_factory().factory,
            Bytes::from_str("0x1F98431c8aD98523631AE4a59f267346ea31F984").unwrap()
        );
        assert_eq!(Chain::Arbitrum.pool_factory(), Chain::Ethereum.pool_factory());
    }
}
