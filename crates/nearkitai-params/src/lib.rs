//! Nearkitai network parameters and genesis bootstrap
//!
//! This crate provides the immutable per-network configuration of a node:
//! chain constants, base58 version-byte tables, genesis block construction
//! and verification, bootstrap seed addresses, and the registry that selects
//! the active network at startup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod genesis;
pub mod network;
pub mod registry;
pub mod seeds;

pub use address::{AddressKind, AddressPrefixes};
pub use genesis::{Block, BlockHasher, BlockHeader, Hash256, Transaction};
pub use network::{ChainParams, DnsSeed, NetworkId};
pub use registry::NetworkRegistry;
pub use seeds::SeedAddress;

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid network specified
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    /// Computed genesis block hash does not match the hardcoded digest
    #[error("Genesis hash mismatch for {network}: expected {expected}, computed {computed}")]
    GenesisHashMismatch {
        /// Network whose genesis failed verification
        network: NetworkId,
        /// Hardcoded digest from the parameter table
        expected: Hash256,
        /// Digest actually computed from the constructed block
        computed: Hash256,
    },

    /// Computed genesis merkle root does not match the hardcoded digest
    #[error("Genesis merkle root mismatch for {network}: expected {expected}, computed {computed}")]
    GenesisMerkleMismatch {
        /// Network whose genesis failed verification
        network: NetworkId,
        /// Hardcoded digest from the parameter table
        expected: Hash256,
        /// Digest actually computed from the constructed block
        computed: Hash256,
    },

    /// Malformed digest literal in the parameter table
    #[error("Invalid digest literal: {0}")]
    InvalidDigest(String),

    /// Malformed alert key literal in the parameter table
    #[error("Invalid alert key literal: {0}")]
    InvalidAlertKey(String),

    /// Malformed seed address literal in the parameter table
    #[error("Invalid seed address: {0}")]
    InvalidSeedAddress(String),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
