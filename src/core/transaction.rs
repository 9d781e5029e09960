//! Transactions as seen by block assembly and classification.
//!
//! Only the surface blocks depend on lives here: outpoint references,
//! coinbase/coinstake shape checks, timestamps, and the deterministic txid.
//! Script execution and validity rules belong to the validation layer.

use crate::types::bytes::Bytes;
use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use crate::types::hash::Hash;
use std::fmt;
use std::sync::Arc;

/// Shared immutable handle to a transaction.
///
/// Blocks hold transactions through this alias; during a reorganization
/// several blocks may reference the same underlying transaction data.
pub type TransactionRef = Arc<Transaction>;

/// Reference to a specific output of a previous transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutPoint {
    /// Txid of the transaction holding the output.
    pub hash: Hash,
    /// Position of the output within that transaction.
    pub index: u32,
}

impl OutPoint {
    /// The null reference: zero hash and an out-of-range index.
    ///
    /// Spent only by coinbase inputs, which create value instead of
    /// consuming it.
    pub fn null() -> OutPoint {
        OutPoint {
            hash: Hash::zero(),
            index: u32::MAX,
        }
    }

    /// Returns true for the null reference.
    pub fn is_null(&self) -> bool {
        self.hash.is_zero() && self.index == u32::MAX
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}

impl Encode for OutPoint {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.hash.encode(out);
        self.index.encode(out);
    }
}

impl Decode for OutPoint {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(OutPoint {
            hash: Hash::decode(input)?,
            index: u32::decode(input)?,
        })
    }
}

/// Transaction input consuming a previous output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    /// Output being spent; null for coinbase inputs.
    pub prevout: OutPoint,
    /// Unlocking script payload.
    pub script_sig: Bytes,
    /// Relative-ordering field carried through from the wire.
    pub sequence: u32,
}

impl Encode for TxInput {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.prevout.encode(out);
        self.script_sig.encode(out);
        self.sequence.encode(out);
    }
}

impl Decode for TxInput {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(TxInput {
            prevout: OutPoint::decode(input)?,
            script_sig: Bytes::decode(input)?,
            sequence: u32::decode(input)?,
        })
    }
}

/// Transaction output carrying value to a locking script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    /// Amount in base units.
    pub value: u64,
    /// Locking script payload.
    pub script_pubkey: Bytes,
}

impl TxOutput {
    /// True for the valueless, scriptless marker output.
    ///
    /// A coinstake transaction opens with exactly this shape.
    pub fn is_empty(&self) -> bool {
        self.value == 0 && self.script_pubkey.is_empty()
    }
}

impl Encode for TxOutput {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.value.encode(out);
        self.script_pubkey.encode(out);
    }
}

impl Decode for TxOutput {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(TxOutput {
            value: u64::decode(input)?,
            script_pubkey: Bytes::decode(input)?,
        })
    }
}

/// A timestamped transaction.
///
/// Immutable after construction; blocks share instances by reference
/// counting, so content never mutates underneath a holder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,
    /// Creation timestamp in Unix seconds; the coinstake timestamp feeds
    /// stake-kernel checks downstream.
    pub time: u32,
    /// Ordered inputs; `inputs[0]` decides coinbase/coinstake shape.
    pub inputs: Vec<TxInput>,
    /// Ordered outputs.
    pub outputs: Vec<TxOutput>,
    /// Earliest inclusion constraint carried through from the wire.
    pub lock_time: u32,
}

impl Transaction {
    /// True for the block-reward transaction: a single input spending the
    /// null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    /// True for a stake transaction: it consumes a real previous output and
    /// its first output is the empty marker.
    ///
    /// Coinbase and coinstake shapes are disjoint; the null-prevout test
    /// keeps them so.
    pub fn is_coinstake(&self) -> bool {
        !self.inputs.is_empty()
            && !self.inputs[0].prevout.is_null()
            && self.outputs.len() >= 2
            && self.outputs[0].is_empty()
    }

    /// Deterministic transaction id: double SHA-256 over the serialized form.
    pub fn hash(&self) -> Hash {
        let mut h = Hash::sha256d();
        self.encode(&mut h);
        h.finalize()
    }
}

impl Encode for Transaction {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.version.encode(out);
        self.time.encode(out);
        self.inputs.encode(out);
        self.outputs.encode(out);
        self.lock_time.encode(out);
    }
}

impl Decode for Transaction {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Transaction {
            version: u32::decode(input)?,
            time: u32::decode(input)?,
            inputs: Vec::decode(input)?,
            outputs: Vec::decode(input)?,
            lock_time: u32::decode(input)?,
        })
    }
}
