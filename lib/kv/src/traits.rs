use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::KVError;

/// KVStore provides a key-value cache interface with per-entry TTL.
///
/// Keys follow a namespaced convention: `guardian:{subject}:{viewer}`,
/// `session:{id}`, etc. Expiry is wall-clock based so entries written
/// before a process restart keep their deadline.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist
    /// or its TTL has elapsed.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair. `ttl` of None means the entry never expires.
    fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all live (non-expired) keys matching a prefix.
    /// Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}

/// Current wall-clock time in unix milliseconds.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Absolute expiry deadline in unix milliseconds; 0 means "never".
pub(crate) fn deadline_millis(ttl: Option<Duration>) -> u64 {
    match ttl {
        None => 0,
        Some(ttl) => now_millis().saturating_add(ttl.as_millis() as u64),
    }
}

/// Whether a deadline (0 = never) has passed.
pub(crate) fn is_expired(deadline: u64) -> bool {
    deadline != 0 && now_millis() >= deadline
}
