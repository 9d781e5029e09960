//! Test utilities shared across modules.

#[cfg(test)]
pub mod utils {
    use crate::core::transaction::{OutPoint, Transaction, TransactionRef, TxInput, TxOutput};
    use crate::types::bytes::Bytes;
    use crate::types::hash::{Hash, HASH_LEN};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    static COUNTER: AtomicU64 = AtomicU64::new(1);

    /// Deterministic unique hash for tests.
    pub fn random_hash() -> Hash {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut value = [0u8; HASH_LEN];
        value[..8].copy_from_slice(&n.to_le_bytes());
        Hash(value)
    }

    /// Decodes a 64-character hex string into a `Hash`.
    pub fn hex_hash(s: &str) -> Hash {
        let bytes = hex::decode(s).expect("valid hex");
        let mut value = [0u8; HASH_LEN];
        value.copy_from_slice(bytes.as_slice());
        Hash(value)
    }

    /// Coinbase transaction: a single input spending the null outpoint.
    pub fn coinbase_tx(time: u32) -> TransactionRef {
        Arc::new(Transaction {
            version: 1,
            time,
            inputs: vec![TxInput {
                prevout: OutPoint::null(),
                script_sig: Bytes::new(b"height tag".as_slice()),
                sequence: u32::MAX,
            }],
            outputs: vec![TxOutput {
                value: 50_000_000,
                script_pubkey: Bytes::new(b"reward script".as_slice()),
            }],
            lock_time: 0,
        })
    }

    /// Coinstake transaction: a real kernel input and the empty first output.
    pub fn coinstake_tx(time: u32) -> TransactionRef {
        Arc::new(Transaction {
            version: 1,
            time,
            inputs: vec![TxInput {
                prevout: OutPoint {
                    hash: random_hash(),
                    index: 0,
                },
                script_sig: Bytes::new(b"kernel script".as_slice()),
                sequence: u32::MAX,
            }],
            outputs: vec![
                TxOutput {
                    value: 0,
                    script_pubkey: Bytes::default(),
                },
                TxOutput {
                    value: 60_000_000,
                    script_pubkey: Bytes::new(b"stake return script".as_slice()),
                },
            ],
            lock_time: 0,
        })
    }

    /// Ordinary value transfer, neither coinbase nor coinstake.
    pub fn spend_tx(time: u32) -> TransactionRef {
        Arc::new(Transaction {
            version: 1,
            time,
            inputs: vec![TxInput {
                prevout: OutPoint {
                    hash: random_hash(),
                    index: 1,
                },
                script_sig: Bytes::new(b"unlock script".as_slice()),
                sequence: u32::MAX,
            }],
            outputs: vec![TxOutput {
                value: 25_000_000,
                script_pubkey: Bytes::new(b"payee script".as_slice()),
            }],
            lock_time: 0,
        })
    }
}
