//! Binary encoding and decoding traits for deterministic serialization.
//!
//! Every byte written here is consensus-relevant: block identity hashes are
//! computed over these exact encodings, so field order and widths must match
//! peer nodes bit-for-bit.
//!
//! # Binary Format
//!
//! - Integers: little-endian, fixed-width
//! - `usize`: encoded as `u64` for portability
//! - `Vec<T>`: 8-byte length prefix followed by elements
//! - `Arc<T>`: transparent, encodes as the pointee
//!
//! Types whose wire form never varies implement [`Encode`]/[`Decode`].
//! Types that serialize differently depending on what the bytes are for
//! (full relay, hashing, header-only relay) implement [`EncodeWith`]/
//! [`DecodeWith`] and receive an explicit [`EncodingContext`] on every call.

use crate::types::bytes::Bytes;

/// Sink for writing encoded bytes.
///
/// Implemented by byte buffers and hashers to allow encoding directly into
/// the target without intermediate allocations.
pub trait EncodeSink {
    /// Writes the given bytes to the sink.
    fn write(&mut self, bytes: &[u8]);
}

/// Counter for computing encoded size without allocating memory.
///
/// Used by `to_bytes` to pre-allocate exact capacity before encoding.
pub struct SizeCounter {
    len: usize,
}

impl SizeCounter {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self { len: 0 }
    }

    /// Returns the total number of bytes counted.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been counted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for SizeCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSink for SizeCounter {
    fn write(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }
}

impl EncodeSink for Bytes {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Selects which subset of fields a serialization pass includes.
///
/// The selector is always passed explicitly by the caller and matched
/// exhaustively by implementations; nothing about the encoded value itself
/// decides the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingContext {
    /// Network and disk form carrying every serialized field.
    Full,
    /// The byte range fed to identity hashing.
    HashDomain,
    /// Header relay form: block header fields only.
    HeaderOnly,
}

/// Errors that can occur during decoding.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Input ended before expected data was read.
    #[error("input ended before expected data was read")]
    UnexpectedEof,
    /// Data does not represent a valid value for the target type.
    #[error("data does not represent a valid value for the target type")]
    InvalidValue,
    /// Length prefix exceeds maximum allowed size.
    #[error("length prefix exceeds maximum allowed size")]
    LengthOverflow,
    /// Bytes remained after the value was fully decoded.
    #[error("unconsumed trailing bytes after decoding")]
    TrailingBytes,
}

/// Trait for types with a single, context-independent binary form.
pub trait Encode {
    /// Writes the binary representation to the given sink.
    fn encode<S: EncodeSink>(&self, out: &mut S);

    /// Serializes to a new byte buffer with exact capacity.
    ///
    /// Performs two passes: first to count bytes, then to encode.
    fn to_bytes(&self) -> Bytes {
        let mut counter = SizeCounter::new();
        self.encode(&mut counter);

        let mut out = Bytes::with_capacity(counter.len());
        self.encode(&mut out);
        out
    }
}

/// Trait for types that can be deserialized from binary format.
pub trait Decode: Sized {
    /// Reads and decodes a value from the input buffer.
    ///
    /// Advances the input slice past the consumed bytes.
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError>;

    /// Decodes a value from a byte slice, requiring all bytes to be consumed.
    fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let mut input = data;
        let value = Self::decode(&mut input)?;

        if !input.is_empty() {
            return Err(DecodeError::TrailingBytes);
        }

        Ok(value)
    }
}

/// Trait for types whose binary form depends on the encoding context.
pub trait EncodeWith {
    /// Writes the representation selected by `ctx` to the given sink.
    fn encode_with<S: EncodeSink>(&self, ctx: EncodingContext, out: &mut S);

    /// Serializes the `ctx` view to a new byte buffer with exact capacity.
    fn to_bytes_with(&self, ctx: EncodingContext) -> Bytes {
        let mut counter = SizeCounter::new();
        self.encode_with(ctx, &mut counter);

        let mut out = Bytes::with_capacity(counter.len());
        self.encode_with(ctx, &mut out);
        out
    }
}

/// Trait for context-dependent deserialization.
pub trait DecodeWith: Sized {
    /// Reads the `ctx` view of a value, advancing the input slice.
    fn decode_with(ctx: EncodingContext, input: &mut &[u8]) -> Result<Self, DecodeError>;

    /// Decodes the `ctx` view from a byte slice, requiring all bytes to be
    /// consumed. Truncated and oversupplied streams both fail.
    fn from_bytes_with(ctx: EncodingContext, data: &[u8]) -> Result<Self, DecodeError> {
        let mut input = data;
        let value = Self::decode_with(ctx, &mut input)?;

        if !input.is_empty() {
            return Err(DecodeError::TrailingBytes);
        }

        Ok(value)
    }
}

/// Reads exactly `n` bytes from the input, advancing the slice.
pub(crate) fn read_bytes<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], DecodeError> {
    if input.len() < n {
        return Err(DecodeError::UnexpectedEof);
    }
    let (bytes, rest) = input.split_at(n);
    *input = rest;
    Ok(bytes)
}

// u8
impl Encode for u8 {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&[*self]);
    }
}

impl Decode for u8 {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = read_bytes(input, 1)?;
        Ok(bytes[0])
    }
}

// Macro for fixed-size integer types
macro_rules! impl_int {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode<S: EncodeSink>(&self, out: &mut S) {
                    out.write(&self.to_le_bytes());
                }
            }

            impl Decode for $t {
                fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
                    let bytes = read_bytes(input, std::mem::size_of::<$t>())?;
                    Ok(<$t>::from_le_bytes(bytes.try_into().unwrap()))
                }
            }
        )*
    };
}

impl_int!(u16, u32, u64, i16, i32, i64);

// usize as u64
impl Encode for usize {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (*self as u64).encode(out);
    }
}

impl Decode for usize {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let v = u64::decode(input)?;
        usize::try_from(v).map_err(|_| DecodeError::LengthOverflow)
    }
}

/// Maximum allowed length for decoded sequences to prevent memory exhaustion.
const MAX_SEQUENCE_LEN: usize = 1_000_000;

// Vec<T>
impl<T: Encode> Encode for Vec<T> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.len().encode(out);
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let len = usize::decode(input)?;
        if len > MAX_SEQUENCE_LEN {
            return Err(DecodeError::LengthOverflow);
        }

        let mut vec = Vec::with_capacity(len);
        for _ in 0..len {
            vec.push(T::decode(input)?);
        }
        Ok(vec)
    }
}

// Arc<T>: shared handles serialize as their pointee.
impl<T: Encode> Encode for std::sync::Arc<T> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.as_ref().encode(out);
    }
}

impl<T: Decode> Decode for std::sync::Arc<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(std::sync::Arc::new(T::decode(input)?))
    }
}
