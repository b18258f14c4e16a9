//! Process-wide selection of the active network
//!
//! The registry is built once during single-threaded startup, before any
//! networking, consensus, or wallet work begins, and is handed to the rest
//! of the node as a plain value. Selection must finish before other
//! subsystems read the active parameters; that ordering is a documented
//! precondition, not something enforced at runtime. After selection the
//! registry is shared read-only.

use tracing::info;

use crate::genesis::BlockHasher;
use crate::network::{ChainParams, NetworkId};
use crate::Result;

/// Every defined parameter set plus the active selection
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    main: ChainParams,
    testnet: ChainParams,
    active: NetworkId,
}

impl NetworkRegistry {
    /// Construct and verify the parameters of every defined network
    ///
    /// Both genesis blocks are checked against their hardcoded digests up
    /// front; the caller treats any error as fatal. Main starts active.
    pub fn bootstrap(hasher: &dyn BlockHasher) -> Result<Self> {
        let main = ChainParams::mainnet()?;
        main.verify_genesis(hasher)?;
        let testnet = ChainParams::testnet()?;
        testnet.verify_genesis(hasher)?;
        info!("network parameters constructed and verified");
        Ok(Self {
            main,
            testnet,
            active: NetworkId::Main,
        })
    }

    /// Make one network active
    pub fn select(&mut self, network: NetworkId) {
        self.active = network;
        info!(network = %network, "selected active network");
    }

    /// Make one network active by name
    ///
    /// An unrecognized name is a caller contract violation; the returned
    /// error is meant to abort startup, not to be retried.
    pub fn select_by_name(&mut self, name: &str) -> Result<()> {
        let network = name.parse::<NetworkId>()?;
        self.select(network);
        Ok(())
    }

    /// Apply the startup configuration's network choice
    ///
    /// `use_testnet` is the already-parsed `-testnet` flag.
    pub fn select_from_startup_config(&mut self, use_testnet: bool) {
        self.select(if use_testnet {
            NetworkId::Testnet
        } else {
            NetworkId::Main
        });
    }

    /// Id of the currently active network
    pub fn active_network(&self) -> NetworkId {
        self.active
    }

    /// Parameters of the currently active network
    pub fn active(&self) -> &ChainParams {
        self.params(self.active)
    }

    /// Parameters of one network, active or not
    pub fn params(&self, network: NetworkId) -> &ChainParams {
        match network {
            NetworkId::Main => &self.main,
            NetworkId::Testnet => &self.testnet,
        }
    }
}
