use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::warn;

use crate::error::KVError;
use crate::traits::{self, KVStore};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Stored values carry an 8-byte big-endian expiry deadline (unix millis,
/// 0 = never) followed by the payload.
const HEADER_LEN: usize = 8;

/// RedbStore is a KVStore implementation backed by redb — a pure-Rust
/// embedded key-value database. Expired entries are treated as absent on
/// read and reclaimed lazily when their key is next written.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(|e| KVError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
        })
    }
}

fn encode(value: &[u8], deadline: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + value.len());
    buf.extend_from_slice(&deadline.to_be_bytes());
    buf.extend_from_slice(value);
    buf
}

fn decode(key: &str, raw: &[u8]) -> Result<(u64, Vec<u8>), KVError> {
    if raw.len() < HEADER_LEN {
        warn!(key, len = raw.len(), "kv entry shorter than expiry header");
        return Err(KVError::Corrupt(format!("entry '{}' too short", key)));
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&raw[..HEADER_LEN]);
    Ok((u64::from_be_bytes(header), raw[HEADER_LEN..].to_vec()))
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        match table.get(key) {
            Ok(Some(val)) => {
                let (deadline, payload) = decode(key, val.value())?;
                if traits::is_expired(deadline) {
                    return Ok(None);
                }
                Ok(Some(payload))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(KVError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Option<std::time::Duration>) -> Result<(), KVError> {
        let encoded = encode(value, traits::deadline_millis(ttl));

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .insert(key, encoded.as_slice())
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        let mut result = Vec::new();
        let range = table
            .range(prefix..)
            .map_err(|e| KVError::Storage(e.to_string()))?;
        for entry in range {
            let (key, val) = entry.map_err(|e| KVError::Storage(e.to_string()))?;
            let key = key.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            let (deadline, payload) = decode(&key, val.value())?;
            if traits::is_expired(deadline) {
                continue;
            }
            result.push((key, payload));
        }
        Ok(result)
    }
}
