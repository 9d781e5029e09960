//! Memory-hard hashing for proof-of-work evaluation.
//!
//! Block identity uses double SHA-256; difficulty evaluation uses scrypt.
//! The two domains never mix, so the work function can change without
//! changing any block's identity.

use crate::types::hash::{Hash, HASH_LEN};
use scrypt::Params;

/// scrypt cost exponent fixed by the network: N = 2^10 = 1024.
const SCRYPT_LOG_N: u8 = 10;
/// Block-size and parallelism parameters, both fixed at 1.
const SCRYPT_R: u32 = 1;
const SCRYPT_P: u32 = 1;

/// Hashes `data` with scrypt(N=1024, r=1, p=1), the message doubling as its
/// own salt.
///
/// Pure and deterministic; every node must derive the same 256-bit value
/// for the same input bytes.
pub fn scrypt_hash(data: &[u8]) -> Hash {
    let params =
        Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, HASH_LEN).expect("fixed parameters are valid");

    let mut output = [0u8; HASH_LEN];
    scrypt::scrypt(data, data, &params, &mut output)
        .expect("32-byte output satisfies scrypt length bounds");
    Hash(output)
}
