//! Base58 version-byte tables for address encoding

use serde::{Deserialize, Serialize};

/// Address kinds distinguished by the base58-check codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// Pay-to-pubkey-hash address
    PubKey,
    /// Pay-to-script-hash address
    Script,
    /// Wallet-import-format secret key
    SecretKey,
    /// Stealth address
    Stealth,
    /// BIP-32 extended public key
    ExtPublicKey,
    /// BIP-32 extended secret key
    ExtSecretKey,
}

/// Per-network version bytes for every address kind
///
/// The tables differ across networks so that an address encoded for one
/// network fails the other network's codec. That is a design goal, not a
/// hard guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPrefixes {
    /// Pubkey-hash address version byte
    pub pubkey_address: u8,
    /// Script-hash address version byte
    pub script_address: u8,
    /// Secret key version byte
    pub secret_key: u8,
    /// Stealth address version byte
    pub stealth_address: u8,
    /// Extended public key version bytes
    pub ext_public_key: [u8; 4],
    /// Extended secret key version bytes
    pub ext_secret_key: [u8; 4],
}

impl AddressPrefixes {
    /// Get mainnet version bytes
    pub const fn mainnet() -> Self {
        Self {
            pubkey_address: 53,
            script_address: 19,
            secret_key: 75,
            stealth_address: 63,
            ext_public_key: [0x99, 0x75, 0x45, 0xE2],
            ext_secret_key: [0x99, 0x73, 0x43, 0xE3],
        }
    }

    /// Get testnet version bytes
    pub const fn testnet() -> Self {
        Self {
            pubkey_address: 85,
            script_address: 89,
            secret_key: 137,
            stealth_address: 125,
            ext_public_key: [0x98, 0x74, 0x44, 0xE1],
            ext_secret_key: [0x98, 0x72, 0x42, 0xE2],
        }
    }

    /// Version bytes for one address kind, as consumed by the codec
    pub fn prefix(&self, kind: AddressKind) -> Vec<u8> {
        match kind {
            AddressKind::PubKey => vec![self.pubkey_address],
            AddressKind::Script => vec![self.script_address],
            AddressKind::SecretKey => vec![self.secret_key],
            AddressKind::Stealth => vec![self.stealth_address],
            AddressKind::ExtPublicKey => self.ext_public_key.to_vec(),
            AddressKind::ExtSecretKey => self.ext_secret_key.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [AddressKind; 6] = [
        AddressKind::PubKey,
        AddressKind::Script,
        AddressKind::SecretKey,
        AddressKind::Stealth,
        AddressKind::ExtPublicKey,
        AddressKind::ExtSecretKey,
    ];

    #[test]
    fn test_mainnet_prefixes() {
        let prefixes = AddressPrefixes::mainnet();
        assert_eq!(prefixes.prefix(AddressKind::PubKey), vec![53]);
        assert_eq!(prefixes.prefix(AddressKind::Script), vec![19]);
        assert_eq!(prefixes.prefix(AddressKind::SecretKey), vec![75]);
        assert_eq!(prefixes.prefix(AddressKind::Stealth), vec![63]);
        assert_eq!(
            prefixes.prefix(AddressKind::ExtPublicKey),
            vec![0x99, 0x75, 0x45, 0xE2]
        );
        assert_eq!(
            prefixes.prefix(AddressKind::ExtSecretKey),
            vec![0x99, 0x73, 0x43, 0xE3]
        );
    }

    #[test]
    fn test_prefix_lengths() {
        let prefixes = AddressPrefixes::testnet();
        for kind in ALL_KINDS {
            let expected = match kind {
                AddressKind::ExtPublicKey | AddressKind::ExtSecretKey => 4,
                _ => 1,
            };
            assert_eq!(prefixes.prefix(kind).len(), expected);
        }
    }

    #[test]
    fn test_networks_do_not_share_prefixes() {
        let main = AddressPrefixes::mainnet();
        let test = AddressPrefixes::testnet();
        for kind in ALL_KINDS {
            assert_ne!(main.prefix(kind), test.prefix(kind));
        }
    }
}
