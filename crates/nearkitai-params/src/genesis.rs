//! Genesis block construction and verification
//!
//! Builds the per-network genesis block from its literal parameters and
//! checks the result against the hardcoded digests. A mismatch means the
//! parameter table was edited inconsistently and the node must not start.
//!
//! The proof-of-work hash of a block header is chain-specific and lives in
//! the consensus engine; this module consumes it through [`BlockHasher`].
//! Transaction ids and the merkle root are plain double-SHA256 and are
//! computed here.

use std::fmt;

use primitive_types::U256;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::network::NetworkId;
use crate::{Error, Result};

/// A 256-bit digest, stored in internal (hashing) byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The all-zero digest
    pub const ZERO: Self = Self([0u8; 32]);

    /// Parse a digest from its RPC hex form (reversed byte order)
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidDigest(s.to_string()))?;
        bytes.reverse();
        Ok(Self(bytes))
    }

    /// Raw digest bytes in internal order
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // RPC convention displays digests byte-reversed.
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "{}", hex::encode(reversed))
    }
}

/// Double-SHA256 of arbitrary bytes
fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    Hash256(second.into())
}

fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Reference to a previous transaction output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutPoint {
    /// Transaction id of the spent output
    pub hash: Hash256,
    /// Output index within that transaction
    pub index: u32,
}

impl OutPoint {
    /// The null outpoint used by coinbase inputs
    pub const NULL: Self = Self {
        hash: Hash256::ZERO,
        index: u32::MAX,
    };
}

/// Transaction input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    /// Spent output; null for coinbase inputs
    pub previous_output: OutPoint,
    /// Raw signature script
    pub script_sig: Vec<u8>,
    /// Sequence number
    pub sequence: u32,
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Value in base units
    pub value: i64,
    /// Raw output script
    pub script_pubkey: Vec<u8>,
}

impl TxOut {
    /// An output carrying no value and no script
    pub fn empty() -> Self {
        Self {
            value: 0,
            script_pubkey: Vec::new(),
        }
    }
}

/// A transaction of this chain family, which carries a creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version
    pub version: i32,
    /// Creation time (Unix epoch seconds)
    pub time: u32,
    /// Inputs
    pub inputs: Vec<TxIn>,
    /// Outputs
    pub outputs: Vec<TxOut>,
    /// Lock time
    pub lock_time: u32,
}

impl Transaction {
    /// Consensus serialization
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.time.to_le_bytes());
        write_compact_size(&mut out, self.inputs.len() as u64);
        for input in &self.inputs {
            out.extend_from_slice(&input.previous_output.hash.0);
            out.extend_from_slice(&input.previous_output.index.to_le_bytes());
            write_compact_size(&mut out, input.script_sig.len() as u64);
            out.extend_from_slice(&input.script_sig);
            out.extend_from_slice(&input.sequence.to_le_bytes());
        }
        write_compact_size(&mut out, self.outputs.len() as u64);
        for output in &self.outputs {
            out.extend_from_slice(&output.value.to_le_bytes());
            write_compact_size(&mut out, output.script_pubkey.len() as u64);
            out.extend_from_slice(&output.script_pubkey);
        }
        out.extend_from_slice(&self.lock_time.to_le_bytes());
        out
    }

    /// Transaction id: double-SHA256 of the serialization
    pub fn txid(&self) -> Hash256 {
        sha256d(&self.serialize())
    }
}

/// Block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block format version
    pub version: i32,
    /// Hash of the previous block; all-zero for genesis
    pub prev_block: Hash256,
    /// Merkle root over the block's transaction ids
    pub merkle_root: Hash256,
    /// Declared creation time (Unix epoch seconds)
    pub time: u32,
    /// Difficulty target in compact form
    pub bits: u32,
    /// Proof-of-work nonce
    pub nonce: u32,
}

impl BlockHeader {
    /// Consensus serialization (80 bytes)
    pub fn serialize(&self) -> [u8; 80] {
        let mut out = [0u8; 80];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_block.0);
        out[36..68].copy_from_slice(&self.merkle_root.0);
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }
}

/// A block: header plus transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block header
    pub header: BlockHeader,
    /// Transactions, coinbase first
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Recompute the merkle root from the block's transactions
    pub fn merkle_root(&self) -> Hash256 {
        let txids: Vec<Hash256> = self.transactions.iter().map(Transaction::txid).collect();
        merkle_root(&txids)
    }
}

/// Merkle root over a list of transaction ids
///
/// Odd layers duplicate their last entry, matching the reference
/// implementation of this chain family.
pub fn merkle_root(txids: &[Hash256]) -> Hash256 {
    if txids.is_empty() {
        return Hash256::ZERO;
    }
    let mut layer = txids.to_vec();
    while layer.len() > 1 {
        let mut next = Vec::with_capacity((layer.len() + 1) / 2);
        for pair in layer.chunks(2) {
            let left = pair[0];
            let right = *pair.get(1).unwrap_or(&pair[0]);
            let mut buf = [0u8; 64];
            buf[..32].copy_from_slice(&left.0);
            buf[32..].copy_from_slice(&right.0);
            next.push(sha256d(&buf));
        }
        layer = next;
    }
    layer[0]
}

/// Chain-specific proof-of-work hash of a block header
///
/// Supplied by the consensus engine; the parameter subsystem only compares
/// its output against the hardcoded genesis digests.
pub trait BlockHasher {
    /// Hash one block header
    fn hash_header(&self, header: &BlockHeader) -> Hash256;
}

impl<F> BlockHasher for F
where
    F: Fn(&BlockHeader) -> Hash256,
{
    fn hash_header(&self, header: &BlockHeader) -> Hash256 {
        self(header)
    }
}

/// Encode a difficulty target in compact form
pub fn compact_from_target(target: U256) -> u32 {
    let mut size = (target.bits() + 7) / 8;
    let mut compact = if size <= 3 {
        (target.low_u64() << (8 * (3 - size))) as u32
    } else {
        (target >> (8 * (size - 3))).low_u64() as u32
    };
    // The mantissa sign bit is reserved; shift into the exponent instead.
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }
    compact | ((size as u32) << 24)
}

/// Small-integer marker pushed into the coinbase input script
const COINBASE_MARKER: u8 = 42;

fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        0..=0x4b => script.push(data.len() as u8),
        0x4c..=0xff => {
            script.push(0x4c);
            script.push(data.len() as u8);
        }
        _ => {
            script.push(0x4d);
            script.extend_from_slice(&(data.len() as u16).to_le_bytes());
        }
    }
    script.extend_from_slice(data);
}

fn coinbase_script(message: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(message.len() + 4);
    script.push(0x00); // OP_0
    push_data(&mut script, &[COINBASE_MARKER]);
    push_data(&mut script, message);
    script
}

/// Literal inputs that define one network's genesis block
#[derive(Debug, Clone)]
pub struct GenesisParameters {
    /// Message embedded in the coinbase input script
    pub timestamp_message: &'static str,
    /// Creation time of the coinbase transaction
    ///
    /// Testnet reuses the mainnet coinbase unchanged, so this can differ
    /// from the block time declared in the header.
    pub transaction_time: u32,
    /// Creation time declared in the block header
    pub block_time: u32,
    /// Proof-of-work nonce
    pub nonce: u32,
    /// Difficulty target in compact form
    pub bits: u32,
    /// Hardcoded block hash (RPC hex)
    pub expected_hash: &'static str,
    /// Hardcoded merkle root (RPC hex)
    pub expected_merkle_root: &'static str,
}

/// Construct the genesis block for one network
pub fn build_genesis_block(params: &GenesisParameters) -> Block {
    let coinbase = Transaction {
        version: 1,
        time: params.transaction_time,
        inputs: vec![TxIn {
            previous_output: OutPoint::NULL,
            script_sig: coinbase_script(params.timestamp_message.as_bytes()),
            sequence: u32::MAX,
        }],
        outputs: vec![TxOut::empty()],
        lock_time: 0,
    };

    debug!(
        txid = %coinbase.txid(),
        script_sig = %hex::encode(&coinbase.inputs[0].script_sig),
        "constructed genesis coinbase transaction"
    );

    let merkle_root = merkle_root(&[coinbase.txid()]);
    Block {
        header: BlockHeader {
            version: 1,
            prev_block: Hash256::ZERO,
            merkle_root,
            time: params.block_time,
            bits: params.bits,
            nonce: params.nonce,
        },
        transactions: vec![coinbase],
    }
}

/// Verify a constructed genesis block against its hardcoded digests
///
/// The caller treats any error as fatal: a mismatch means the node would
/// run with an indeterminate chain identity.
pub fn verify_genesis(
    network: NetworkId,
    block: &Block,
    expected_hash: Hash256,
    expected_merkle_root: Hash256,
    hasher: &dyn BlockHasher,
) -> Result<()> {
    let computed_root = block.merkle_root();
    if computed_root != expected_merkle_root || computed_root != block.header.merkle_root {
        return Err(Error::GenesisMerkleMismatch {
            network,
            expected: expected_merkle_root,
            computed: computed_root,
        });
    }
    let computed_hash = hasher.hash_header(&block.header);
    if computed_hash != expected_hash {
        return Err(Error::GenesisHashMismatch {
            network,
            expected: expected_hash,
            computed: computed_hash,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_display_round_trip() {
        let hex = "0000e3b4270a1f90c5a69aa6d92cf62803eb9c0cad36536e2739968f5bb4132a";
        let hash = Hash256::from_hex(hex).unwrap();
        assert_eq!(hash.to_string(), hex);
    }

    #[test]
    fn test_hash_from_hex_rejects_bad_literals() {
        assert!(Hash256::from_hex("abcd").is_err());
        assert!(Hash256::from_hex("zz".repeat(32).as_str()).is_err());
    }

    #[test]
    fn test_compact_encoding_of_pow_limit() {
        // ~uint256(0) >> 16 encodes as 0x1f00ffff.
        assert_eq!(compact_from_target(U256::MAX >> 16), 0x1f00ffff);
        assert_eq!(compact_from_target(U256::MAX >> 32), 0x1d00ffff);
    }

    #[test]
    fn test_compact_encoding_of_small_targets() {
        assert_eq!(compact_from_target(U256::zero()), 0);
        assert_eq!(compact_from_target(U256::from(0x12u64)), 0x01120000);
        assert_eq!(compact_from_target(U256::from(0x80u64)), 0x02008000);
    }

    #[test]
    fn test_coinbase_script_layout() {
        let script = coinbase_script(b"hello");
        assert_eq!(script, vec![0x00, 0x01, 0x2a, 0x05, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn test_push_data_long_payload() {
        let mut script = Vec::new();
        push_data(&mut script, &[0xaa; 0x60]);
        assert_eq!(&script[..2], &[0x4c, 0x60]);
        assert_eq!(script.len(), 2 + 0x60);
    }

    #[test]
    fn test_merkle_root_of_single_txid_is_the_txid() {
        let txid = Hash256::from_hex(
            "e552041a04ff88cfffae30380f94b2e472b0bf89f84622079f1d0406b9253a6f",
        )
        .unwrap();
        assert_eq!(merkle_root(&[txid]), txid);
    }

    #[test]
    fn test_merkle_root_duplicates_odd_leaf() {
        let a = Hash256([0x11; 32]);
        let b = Hash256([0x22; 32]);
        let c = Hash256([0x33; 32]);
        // Three leaves hash as [ab, cc] then the pair of those.
        let root = merkle_root(&[a, b, c]);
        let ab = merkle_root(&[a, b]);
        let cc = merkle_root(&[c, c]);
        assert_eq!(root, merkle_root(&[ab, cc]));
    }

    #[test]
    fn test_header_serialization_is_80_bytes() {
        let header = BlockHeader {
            version: 1,
            prev_block: Hash256::ZERO,
            merkle_root: Hash256([0xab; 32]),
            time: 1_544_675_680,
            bits: 0x1f00ffff,
            nonce: 118_369,
        };
        let bytes = header.serialize();
        assert_eq!(&bytes[0..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[68..72], &1_544_675_680u32.to_le_bytes());
        assert_eq!(&bytes[76..80], &118_369u32.to_le_bytes());
    }

    #[test]
    fn test_verify_genesis_rejects_wrong_hash() {
        let params = GenesisParameters {
            timestamp_message: "test message",
            transaction_time: 100,
            block_time: 100,
            nonce: 7,
            bits: 0x1f00ffff,
            expected_hash: "00000000000000000000000000000000000000000000000000000000000000aa",
            expected_merkle_root: "00000000000000000000000000000000000000000000000000000000000000bb",
        };
        let block = build_genesis_block(&params);
        let merkle = block.merkle_root();
        let hasher = |_: &BlockHeader| Hash256([0xcc; 32]);
        let err = verify_genesis(
            NetworkId::Main,
            &block,
            Hash256::from_hex(params.expected_hash).unwrap(),
            merkle,
            &hasher,
        )
        .unwrap_err();
        assert!(matches!(err, Error::GenesisHashMismatch { .. }));
    }

    #[test]
    fn test_verify_genesis_rejects_wrong_merkle_root() {
        let params = GenesisParameters {
            timestamp_message: "test message",
            transaction_time: 100,
            block_time: 100,
            nonce: 7,
            bits: 0x1f00ffff,
            expected_hash: "00000000000000000000000000000000000000000000000000000000000000aa",
            expected_merkle_root: "00000000000000000000000000000000000000000000000000000000000000bb",
        };
        let block = build_genesis_block(&params);
        let hasher = |_: &BlockHeader| Hash256([0xcc; 32]);
        let err = verify_genesis(
            NetworkId::Main,
            &block,
            Hash256::from_hex(params.expected_hash).unwrap(),
            Hash256::from_hex(params.expected_merkle_root).unwrap(),
            &hasher,
        )
        .unwrap_err();
        assert!(matches!(err, Error::GenesisMerkleMismatch { .. }));
    }

    #[test]
    fn test_verify_genesis_accepts_matching_digests() {
        let params = GenesisParameters {
            timestamp_message: "test message",
            transaction_time: 100,
            block_time: 100,
            nonce: 7,
            bits: 0x1f00ffff,
            expected_hash: "00000000000000000000000000000000000000000000000000000000000000aa",
            expected_merkle_root: "00000000000000000000000000000000000000000000000000000000000000bb",
        };
        let block = build_genesis_block(&params);
        let merkle = block.merkle_root();
        let expected_hash = Hash256([0xcc; 32]);
        let hasher = move |_: &BlockHeader| expected_hash;
        assert!(verify_genesis(NetworkId::Main, &block, expected_hash, merkle, &hasher).is_ok());
    }
}
