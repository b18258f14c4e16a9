//! Nearkitai network definitions
//!
//! Each network is built as a complete, independent record. Testnet is not
//! derived from mainnet at runtime; every field is spelled out so a partial
//! override can never leak values across networks.

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::AddressPrefixes;
use crate::genesis::{self, Block, BlockHasher, GenesisParameters, Hash256};
use crate::seeds::{self, SeedAddress};
use crate::{Error, Result};

/// Network identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// Main network
    Main,
    /// Test network
    Testnet,
}

impl NetworkId {
    /// Canonical lowercase name
    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Main => "main",
            NetworkId::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "main" | "mainnet" => Ok(NetworkId::Main),
            "test" | "testnet" => Ok(NetworkId::Testnet),
            other => Err(Error::InvalidNetwork(other.to_string())),
        }
    }
}

/// A DNS seeder entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsSeed {
    /// Operator label
    pub label: &'static str,
    /// Hostname queried for peer addresses
    pub host: &'static str,
}

/// Message embedded in the genesis coinbase; shared by both networks
const GENESIS_TIMESTAMP_MESSAGE: &str =
    "13/12/2018 Nearkitai Find, Hire and Promoted for local business Blockchain";

const MAINNET_ALERT_PUBKEY: &str = "0428281f31eec6f1197d5a98c4b3c3a5974d2b17d50ecdc222fe86ddf2e02fb7990e8a9ebef5dc78732a7596dfe077ac9ef5560df528a6590fb03742d60b9fb881";
const TESTNET_ALERT_PUBKEY: &str = "04df0f2f63d75ef6ed084dd7cd4e1cf8f3d8d66665a927cfe510374aee15aea5e772b2a51b79722ee3815bea41956b75b25f3b692bb834df70a7ca5f4906245ed2";

// Packed seed tables, stored byte-reversed (see seeds::swap_packed).
const MAINNET_PACKED_SEEDS: &[u32] = &[0xcebd55c5, 0x44b7bc8b];
const TESTNET_PACKED_SEEDS: &[u32] = &[0xcebd55c5, 0x44b7bc8b];

const MAINNET_LITERAL_SEEDS: &[&str] = &["206.189.85.197", "68.183.188.139"];

/// Immutable per-network chain parameters
#[derive(Debug, Clone)]
pub struct ChainParams {
    /// Network this record belongs to
    pub network: NetworkId,
    /// Wire message prefix; unique per network
    pub magic: [u8; 4],
    /// Peer-to-peer port
    pub default_port: u16,
    /// RPC port
    pub rpc_port: u16,
    /// Easiest allowed proof-of-work target
    pub pow_limit: U256,
    /// Key that signs network alert messages
    pub alert_pubkey: Vec<u8>,
    /// Base58 version bytes
    pub address_prefixes: AddressPrefixes,
    /// The genesis block, constructed at startup
    pub genesis: Block,
    /// Hardcoded genesis block hash
    pub genesis_hash: Hash256,
    /// Hardcoded genesis merkle root
    pub genesis_merkle_root: Hash256,
    /// Bootstrap peer addresses, packed-table entries first
    pub fixed_seeds: Vec<SeedAddress>,
    /// DNS seeder hosts
    pub dns_seeds: Vec<DnsSeed>,
    /// Data directory name; empty for the default directory
    pub data_dir: &'static str,
    /// Last block rewarded by proof-of-work
    pub last_pow_height: u32,
    /// First block eligible for proof-of-stake
    pub pos_start_height: u32,
    /// Mixing pool session cap, passed through to the pool subsystem
    pub pool_max_transactions: u32,
    /// Mixing pool collateral address, passed through to the pool subsystem
    pub pool_dummy_address: &'static str,
}

impl ChainParams {
    /// Build the main network parameters
    pub fn mainnet() -> Result<Self> {
        let pow_limit = U256::MAX >> 16;
        let genesis_params = GenesisParameters {
            timestamp_message: GENESIS_TIMESTAMP_MESSAGE,
            transaction_time: 1_544_675_680,
            block_time: 1_544_675_680,
            nonce: 118_369,
            bits: genesis::compact_from_target(pow_limit),
            expected_hash: "0000e3b4270a1f90c5a69aa6d92cf62803eb9c0cad36536e2739968f5bb4132a",
            expected_merkle_root:
                "e552041a04ff88cfffae30380f94b2e472b0bf89f84622079f1d0406b9253a6f",
        };

        let default_port = 12040;
        let mut fixed_seeds = seeds::from_packed(MAINNET_PACKED_SEEDS, default_port);
        fixed_seeds.extend(seeds::from_literals(MAINNET_LITERAL_SEEDS, default_port)?);

        Ok(Self {
            network: NetworkId::Main,
            magic: [0x0a, 0xe3, 0xed, 0xc0],
            default_port,
            rpc_port: 12041,
            pow_limit,
            alert_pubkey: decode_alert_key(MAINNET_ALERT_PUBKEY)?,
            address_prefixes: AddressPrefixes::mainnet(),
            genesis: genesis::build_genesis_block(&genesis_params),
            genesis_hash: Hash256::from_hex(genesis_params.expected_hash)?,
            genesis_merkle_root: Hash256::from_hex(genesis_params.expected_merkle_root)?,
            fixed_seeds,
            dns_seeds: vec![
                DnsSeed { label: "0", host: "68.183.188.139" },
                DnsSeed { label: "1", host: "206.189.85.197" },
            ],
            data_dir: "",
            last_pow_height: 262_800,
            pos_start_height: 2_880,
            pool_max_transactions: 3,
            pool_dummy_address: "NcdL3kFMqZLun5awkYgfbrLJeJaK2ww7d2",
        })
    }

    /// Build the test network parameters
    pub fn testnet() -> Result<Self> {
        let pow_limit = U256::MAX >> 16;
        // The coinbase is the mainnet one, reused verbatim: only the header
        // time and nonce differ, so the merkle root is unchanged while the
        // block hash is not.
        let genesis_params = GenesisParameters {
            timestamp_message: GENESIS_TIMESTAMP_MESSAGE,
            transaction_time: 1_544_675_680,
            block_time: 1_544_675_600,
            nonce: 49_563,
            bits: genesis::compact_from_target(pow_limit),
            expected_hash: "000033fb2c7df510516833290d36d9cb7d223b1e52f39a73c6452f93c7e83ec0",
            expected_merkle_root:
                "e552041a04ff88cfffae30380f94b2e472b0bf89f84622079f1d0406b9253a6f",
        };

        let default_port = 20400;

        Ok(Self {
            network: NetworkId::Testnet,
            magic: [0x9a, 0x77, 0xd0, 0xf8],
            default_port,
            rpc_port: 20401,
            pow_limit,
            alert_pubkey: decode_alert_key(TESTNET_ALERT_PUBKEY)?,
            address_prefixes: AddressPrefixes::testnet(),
            genesis: genesis::build_genesis_block(&genesis_params),
            genesis_hash: Hash256::from_hex(genesis_params.expected_hash)?,
            genesis_merkle_root: Hash256::from_hex(genesis_params.expected_merkle_root)?,
            fixed_seeds: seeds::from_packed(TESTNET_PACKED_SEEDS, default_port),
            dns_seeds: Vec::new(),
            data_dir: "testnet",
            last_pow_height: 262_800,
            pos_start_height: 2_880,
            pool_max_transactions: 3,
            pool_dummy_address: "NcdL3kFMqZLun5awkYgfbrLJeJaK2ww7d2",
        })
    }

    /// Build the parameters for one network by id
    pub fn from_network(network: NetworkId) -> Result<Self> {
        match network {
            NetworkId::Main => Self::mainnet(),
            NetworkId::Testnet => Self::testnet(),
        }
    }

    /// Verify the constructed genesis block against the hardcoded digests
    pub fn verify_genesis(&self, hasher: &dyn BlockHasher) -> Result<()> {
        genesis::verify_genesis(
            self.network,
            &self.genesis,
            self.genesis_hash,
            self.genesis_merkle_root,
            hasher,
        )
    }
}

fn decode_alert_key(hex_key: &str) -> Result<Vec<u8>> {
    hex::decode(hex_key).map_err(|_| Error::InvalidAlertKey(hex_key.to_string()))
}
