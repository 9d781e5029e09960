//! 32-byte hash values and the identity-hash builder.

use crate::types::encoding::{read_bytes, Decode, DecodeError, Encode, EncodeSink};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hash length in bytes.
pub const HASH_LEN: usize = 32;

/// Fixed-size 256-bit hash used for block and transaction identity.
///
/// This type is `Copy` for performance - hashes are passed constantly during
/// chain navigation and should live on the stack to avoid heap allocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; HASH_LEN]);

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    ///
    /// Used as a sentinel for the genesis parent and the null outpoint.
    pub fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    /// Returns true if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LEN]
    }

    /// Returns the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Low 64-bit word, read little-endian from the first eight bytes.
    ///
    /// Its least-significant bit is the stake entropy bit.
    pub fn low_u64(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(word)
    }

    /// Creates a new double-SHA-256 hash builder for incremental hashing.
    ///
    /// Use this for streaming serialized values into the identity hash
    /// without intermediate allocations.
    pub fn sha256d() -> HashBuilder {
        HashBuilder::new()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

// Fixed width: exactly 32 raw bytes, no length prefix.
impl Encode for Hash {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&self.0);
    }
}

impl Decode for Hash {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = read_bytes(input, HASH_LEN)?;
        let mut value = [0u8; HASH_LEN];
        value.copy_from_slice(bytes);
        Ok(Hash(value))
    }
}

/// Incremental double-SHA-256 hash builder.
///
/// Data streams through a single SHA-256 state; the second round runs at
/// finalize. Implements [`EncodeSink`] so encodable types can be hashed
/// directly without intermediate byte buffers.
pub struct HashBuilder {
    hasher: Sha256,
}

impl HashBuilder {
    /// Creates a new hash builder with empty state.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Consumes the builder and returns SHA-256(SHA-256(data)).
    pub fn finalize(self) -> Hash {
        let first = self.hasher.finalize();
        Hash(Sha256::digest(first).into())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSink for HashBuilder {
    fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_known_vector() {
        // SHA-256 applied twice to the empty string.
        let hash = Hash::sha256d().finalize();
        assert_eq!(
            hash.to_string(),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut split = Hash::sha256d();
        split.update(b"ab");
        split.update(b"cd");

        let mut whole = Hash::sha256d();
        whole.update(b"abcd");

        assert_eq!(split.finalize(), whole.finalize());
    }

    #[test]
    fn zero_hash_is_zero() {
        assert!(Hash::zero().is_zero());
        assert_eq!(Hash::default(), Hash::zero());

        let mut nonzero = Hash::zero();
        nonzero.0[31] = 1;
        assert!(!nonzero.is_zero());
    }

    #[test]
    fn low_u64_reads_first_eight_bytes_little_endian() {
        let mut hash = Hash::zero();
        hash.0[..8].copy_from_slice(&0x0123456789ABCDEFu64.to_le_bytes());
        hash.0[8] = 0xFF; // outside the low word
        assert_eq!(hash.low_u64(), 0x0123456789ABCDEF);
    }

    #[test]
    fn codec_is_fixed_width() {
        let mut hash = Hash::zero();
        hash.0[0] = 0xAB;
        hash.0[31] = 0xCD;

        let bytes = hash.to_bytes();
        assert_eq!(bytes.len(), HASH_LEN);
        assert_eq!(Hash::from_bytes(bytes.as_slice()).unwrap(), hash);
    }

    #[test]
    fn decode_rejects_short_input() {
        let result = Hash::from_bytes(&[0u8; HASH_LEN - 1]);
        assert!(result.is_err());
    }

    #[test]
    fn display_is_lowercase_hex() {
        let mut hash = Hash::zero();
        hash.0[0] = 0x0F;
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.starts_with("0f"));
    }
}
