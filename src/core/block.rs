//! Block and header structures with their two hash domains.

use crate::core::transaction::{OutPoint, TransactionRef};
use crate::crypto::pow;
use crate::debug;
use crate::types::bytes::Bytes;
use crate::types::encoding::{
    Decode, DecodeError, DecodeWith, Encode, EncodeSink, EncodeWith, EncodingContext,
};
use crate::types::hash::Hash;
use std::fmt;

/// Fixed six-field commitment identifying a block.
///
/// Nodes collect transactions into a block, commit to them through the
/// merkle root, and scan nonce values until the block satisfies the
/// proof-of-work requirement. The header is the sole input to both hash
/// domains: transactions and the block signature never contribute to block
/// identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockHeader {
    /// Consensus-rule-set tag; see the version constants.
    pub version: i32,
    /// Identity hash of the parent block; all-zero for the genesis block.
    pub prev_block: Hash,
    /// Commitment to the ordered transaction list.
    pub merkle_root: Hash,
    /// Block timestamp in Unix seconds.
    pub time: u32,
    /// Compact encoding of the difficulty target; zero is reserved to mean
    /// "uninitialized".
    pub bits: u32,
    /// Proof-of-work search variable.
    pub nonce: u32,
}

impl BlockHeader {
    /// First block format; no signature exists on the wire.
    pub const LEGACY_VERSION_1: i32 = 1;
    /// Transitional format, still unsigned.
    pub const LEGACY_VERSION_2: i32 = 2;
    /// Current format carrying the block signature.
    pub const CURRENT_VERSION: i32 = 3;

    /// Resets every field to its zero value.
    pub fn set_null(&mut self) {
        *self = BlockHeader::default();
    }

    /// A header is null iff its difficulty bits are unset.
    ///
    /// `bits == 0` never occurs in a produced header, so it doubles as the
    /// emptiness marker without inspecting any other field.
    pub fn is_null(&self) -> bool {
        self.bits == 0
    }

    /// Identity hash: double SHA-256 over the six serialized header fields.
    ///
    /// This is the value parent linkage, locators, and chain lookups key on.
    pub fn hash(&self) -> Hash {
        let mut h = Hash::sha256d();
        self.encode(&mut h);
        h.finalize()
    }

    /// Proof-of-work hash: scrypt over the identical serialized bytes.
    ///
    /// Evaluated against the difficulty target and nothing else. Block
    /// identity always comes from [`BlockHeader::hash`], so the work
    /// function can change without renaming any block.
    pub fn pow_hash(&self) -> Hash {
        pow::scrypt_hash(self.to_bytes().as_slice())
    }

    /// Timestamp widened to a signed 64-bit value.
    pub fn block_time(&self) -> i64 {
        i64::from(self.time)
    }
}

// All six fields, fixed widths, in declared order; the header form never
// varies with encoding context.
impl Encode for BlockHeader {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.version.encode(out);
        self.prev_block.encode(out);
        self.merkle_root.encode(out);
        self.time.encode(out);
        self.bits.encode(out);
        self.nonce.encode(out);
    }
}

impl Decode for BlockHeader {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(BlockHeader {
            version: i32::decode(input)?,
            prev_block: Hash::decode(input)?,
            merkle_root: Hash::decode(input)?,
            time: u32::decode(input)?,
            bits: u32::decode(input)?,
            nonce: u32::decode(input)?,
        })
    }
}

/// Observer for stake-entropy derivations.
///
/// Passed explicitly where diagnostics are wanted; `None` at the call site
/// disables them. The observer never influences the derived bit.
pub trait EntropyObserver {
    /// Receives the inputs and result of one entropy-bit derivation.
    fn entropy_bit(&self, time: u32, block_hash: &Hash, bit: u8);
}

/// Observer that writes each derivation to the process log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogEntropyObserver;

impl EntropyObserver for LogEntropyObserver {
    fn entropy_bit(&self, time: u32, block_hash: &Hash, bit: u8) {
        debug!(
            "stake entropy bit: time={} block={} bit={}",
            time, block_hash, bit
        );
    }
}

/// A block: header, ordered transactions, and the producer's signature.
///
/// Transactions are shared immutable handles; `transactions[0]` is the
/// coinbase, and `transactions[1]`, when it is a coinstake, marks the block
/// as proof-of-stake. The signature is produced by the owner of one of the
/// coinbase outputs and travels on the wire only for
/// `version >= CURRENT_VERSION`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<TransactionRef>,
    pub signature: Bytes,
}

impl Block {
    /// Builds a block around an existing header, with no transactions or
    /// signature attached yet.
    pub fn from_header(header: BlockHeader) -> Self {
        Block {
            header,
            transactions: Vec::new(),
            signature: Bytes::default(),
        }
    }

    /// Resets the header and clears transactions and signature.
    pub fn set_null(&mut self) {
        self.header.set_null();
        self.transactions.clear();
        self.signature = Bytes::default();
    }

    /// Copies out just the six header fields.
    ///
    /// Collaborators that only need header semantics take this projection
    /// instead of holding the transaction list alive.
    pub fn block_header(&self) -> BlockHeader {
        self.header
    }

    /// Identity hash of the header.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Proof-of-work hash of the header.
    pub fn pow_hash(&self) -> Hash {
        self.header.pow_hash()
    }

    /// True iff the second transaction is a coinstake.
    ///
    /// # Panics
    ///
    /// Panics when the transaction list is empty: classification is only
    /// defined once transactions are populated, and a silent default here
    /// would misreport the block type.
    pub fn is_proof_of_stake(&self) -> bool {
        assert!(
            !self.transactions.is_empty(),
            "proof classification requires a populated transaction list"
        );
        self.transactions.len() > 1 && self.transactions[1].is_coinstake()
    }

    /// Exact complement of [`Block::is_proof_of_stake`].
    pub fn is_proof_of_work(&self) -> bool {
        !self.is_proof_of_stake()
    }

    /// The stake kernel: the coinstake's first input and its timestamp.
    ///
    /// Returns the null outpoint and time zero for proof-of-work blocks.
    /// Stake-kernel validity itself is checked downstream.
    pub fn proof_of_stake(&self) -> (OutPoint, u32) {
        if self.is_proof_of_stake() {
            let stake = &self.transactions[1];
            (stake.inputs[0].prevout, stake.time)
        } else {
            (OutPoint::null(), 0)
        }
    }

    /// Entropy bit for stake-modifier derivation: the least-significant bit
    /// of the identity hash's low 64-bit word.
    ///
    /// The bit comes from the identity hash, not the proof-of-work hash;
    /// stake-modifier derivation across the network depends on that exact
    /// domain. `time` is carried to the observer for correlation only.
    pub fn stake_entropy_bit(&self, time: u32, observer: Option<&dyn EntropyObserver>) -> u8 {
        let hash = self.hash();
        let bit = (hash.low_u64() & 1) as u8;
        if let Some(observer) = observer {
            observer.entropy_bit(time, &hash, bit);
        }
        bit
    }
}

impl EncodeWith for Block {
    fn encode_with<S: EncodeSink>(&self, ctx: EncodingContext, out: &mut S) {
        self.header.encode(out);
        match ctx {
            EncodingContext::Full => {
                // Transactions must follow the header directly: storage
                // derives per-transaction disk positions from this layout.
                self.transactions.encode(out);
                if self.header.version >= BlockHeader::CURRENT_VERSION {
                    self.signature.encode(out);
                }
            }
            EncodingContext::HashDomain | EncodingContext::HeaderOnly => {}
        }
    }
}

impl DecodeWith for Block {
    fn decode_with(ctx: EncodingContext, input: &mut &[u8]) -> Result<Self, DecodeError> {
        let header = BlockHeader::decode(input)?;
        match ctx {
            EncodingContext::Full => {
                let transactions = Vec::<TransactionRef>::decode(input)?;
                let signature = if header.version >= BlockHeader::CURRENT_VERSION {
                    Bytes::decode(input)?
                } else {
                    Bytes::default()
                };
                Ok(Block {
                    header,
                    transactions,
                    signature,
                })
            }
            EncodingContext::HashDomain | EncodingContext::HeaderOnly => {
                Ok(Block::from_header(header))
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(hash={}, version={}, prev={}, merkle={}, time={}, bits={:#010x}, nonce={}, transactions={}, signature={}B)",
            self.hash(),
            self.header.version,
            self.header.prev_block,
            self.header.merkle_root,
            self.header.time,
            self.header.bits,
            self.header.nonce,
            self.transactions.len(),
            self.signature.len(),
        )
    }
}
