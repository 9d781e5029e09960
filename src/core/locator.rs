//! Compact chain-position summaries for common-ancestor discovery.

use crate::types::encoding::{
    Decode, DecodeError, DecodeWith, Encode, EncodeSink, EncodeWith, EncodingContext,
};
use crate::types::hash::Hash;

/// Wire protocol version stamped into versioned locator encodings.
pub const PROTOCOL_VERSION: i32 = 70002;

/// Sparse list of ancestor block hashes, most recent first.
///
/// Describes a place in the chain to another node: if the peer does not
/// share the same branch, it can still find a recent common trunk. The
/// further back an entry sits, the further before the fork it may be.
/// Built fresh by the sync layer from a snapshot of ancestor hashes and
/// discarded after one round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockLocator {
    pub hashes: Vec<Hash>,
}

impl BlockLocator {
    /// Wraps an ordered list of ancestor hashes.
    pub fn new(hashes: Vec<Hash>) -> Self {
        BlockLocator { hashes }
    }

    /// Clears the hash sequence.
    pub fn set_null(&mut self) {
        self.hashes.clear();
    }

    /// A locator is null iff it summarizes no blocks.
    pub fn is_null(&self) -> bool {
        self.hashes.is_empty()
    }
}

// The protocol version is wire negotiation metadata, not locator content:
// it leads every encoding except the hash domain, so an identity hash taken
// over a locator can never vary with protocol version.
impl EncodeWith for BlockLocator {
    fn encode_with<S: EncodeSink>(&self, ctx: EncodingContext, out: &mut S) {
        match ctx {
            EncodingContext::Full | EncodingContext::HeaderOnly => {
                PROTOCOL_VERSION.encode(out);
            }
            EncodingContext::HashDomain => {}
        }
        self.hashes.encode(out);
    }
}

impl DecodeWith for BlockLocator {
    fn decode_with(ctx: EncodingContext, input: &mut &[u8]) -> Result<Self, DecodeError> {
        match ctx {
            EncodingContext::Full | EncodingContext::HeaderOnly => {
                // Read and discard; the sender's version does not alter the
                // decoded value.
                let _version = i32::decode(input)?;
            }
            EncodingContext::HashDomain => {}
        }
        Ok(BlockLocator {
            hashes: Vec::decode(input)?,
        })
    }
}
