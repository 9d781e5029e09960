//! Reference-counted byte buffer with copy-on-write semantics.

use crate::types::encoding::{read_bytes, Decode, DecodeError, Encode, EncodeSink};
use std::ops::Deref;
use std::sync::Arc;

/// A reference-counted, immutable byte buffer.
///
/// Wraps `Arc<Vec<u8>>` to provide cheap cloning and shared ownership.
/// Carries the block signature and script payloads; mutations trigger
/// copy-on-write via `Arc::make_mut`.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct Bytes(Arc<Vec<u8>>);

impl Bytes {
    /// Creates a new buffer from any type convertible to `Vec<u8>`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(data.into()))
    }

    /// Creates an empty buffer with the specified capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self(Arc::new(Vec::with_capacity(cap)))
    }

    /// Returns the number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of bytes the buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Returns the buffer contents as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Returns a mutable reference to the underlying vector.
    ///
    /// Clones the data if other references exist (copy-on-write).
    pub fn make_mut(&mut self) -> &mut Vec<u8> {
        Arc::make_mut(&mut self.0)
    }

    /// Appends bytes to the buffer, cloning if necessary.
    pub fn extend_from_slice(&mut self, s: &[u8]) {
        self.make_mut().extend_from_slice(s);
    }
}

impl Clone for Bytes {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Deref for Bytes {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

// Variable length: 8-byte prefix then the raw contents.
impl Encode for Bytes {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.len().encode(out);
        out.write(self.as_slice());
    }
}

impl Decode for Bytes {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let len = usize::decode(input)?;
        let contents = read_bytes(input, len)?;
        Ok(Bytes::new(contents))
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self::new(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(s: &[u8]) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_storage() {
        let original = Bytes::new(b"shared".as_slice());
        let clone = original.clone();
        assert_eq!(original.as_slice(), clone.as_slice());
        assert!(Arc::ptr_eq(&original.0, &clone.0));
    }

    #[test]
    fn mutation_is_copy_on_write() {
        let original = Bytes::new(b"base".as_slice());
        let mut clone = original.clone();
        clone.extend_from_slice(b"+more");

        assert_eq!(original.as_slice(), b"base");
        assert_eq!(clone.as_slice(), b"base+more");
    }

    #[test]
    fn codec_roundtrip() {
        let original = Bytes::new(vec![0x00, 0x01, 0xFE, 0xFF]);
        let encoded = original.to_bytes();

        // 8-byte length prefix then contents
        assert_eq!(&encoded[0..8], &4u64.to_le_bytes());
        assert_eq!(&encoded[8..], original.as_slice());
        assert_eq!(Bytes::from_bytes(encoded.as_slice()).unwrap(), original);
    }

    #[test]
    fn empty_roundtrip() {
        let empty = Bytes::default();
        let encoded = empty.to_bytes();
        assert_eq!(encoded.len(), 8);
        assert_eq!(Bytes::from_bytes(encoded.as_slice()).unwrap(), empty);
    }

    #[test]
    fn decode_rejects_truncated_contents() {
        let mut encoded = Vec::new();
        10usize.encode(&mut encoded);
        encoded.extend_from_slice(&[1, 2, 3]); // 3 of 10 promised bytes

        let result = Bytes::from_bytes(&encoded);
        assert!(matches!(result, Err(DecodeError::UnexpectedEof)));
    }
}
