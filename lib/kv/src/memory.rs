use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;

use crate::error::KVError;
use crate::traits::{self, KVStore};

/// MemoryStore is an in-process KVStore over a BTreeMap. Used in tests and
/// for embedded setups that do not need the cache to survive restarts.
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Entry>>,
}

struct Entry {
    /// Unix-millis deadline; 0 = never expires.
    deadline: u64,
    value: Vec<u8>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(entries.get(key).and_then(|entry| {
            if traits::is_expired(entry.deadline) {
                None
            } else {
                Some(entry.value.clone())
            }
        }))
    }

    fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), KVError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        entries.insert(
            key.to_string(),
            Entry {
                deadline: traits::deadline_millis(ttl),
                value: value.to_vec(),
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .filter(|(_, entry)| !traits::is_expired(entry.deadline))
            .map(|(k, entry)| (k.clone(), entry.value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", b"v", None).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn ttl_expiry() {
        let store = MemoryStore::new();
        store.set("short", b"1", Some(Duration::ZERO)).unwrap();
        assert_eq!(store.get("short").unwrap(), None);

        store.set("long", b"1", Some(Duration::from_secs(3600))).unwrap();
        assert_eq!(store.get("long").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn scan_is_sorted_and_prefix_bounded() {
        let store = MemoryStore::new();
        store.set("p:b", b"2", None).unwrap();
        store.set("p:a", b"1", None).unwrap();
        store.set("q:c", b"3", None).unwrap();

        let keys: Vec<String> = store.scan("p:").unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["p:a", "p:b"]);
    }
}
