// crates/skillswap-store/src/rocks.rs
//
// RocksDB-backed persistent key/value store.
//
// Keys and values are stored verbatim. The trait has no listing API;
// records are reachable only through the registry index.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rocksdb::{DBWithThreadMode, MultiThreaded, Options};

use skillswap_core::error::SkillError;
use skillswap_core::identity::WriteAuthorization;
use skillswap_core::traits::{KeyValueStore, WriteReceipt};

use crate::check_authorization;

/// Key read by the readiness probe. Never written.
const PROBE_KEY: &[u8] = b"__skillswap_probe";

/// RocksDB wrapper implementing the `KeyValueStore` trait.
#[derive(Debug)]
pub struct RocksKvStore {
    db: DBWithThreadMode<MultiThreaded>,
    /// Write sequence for receipts. Restarts at 0 each time the store is opened.
    sequence: AtomicU64,
}

impl RocksKvStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, SkillError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path).map_err(|e| {
            SkillError::StoreUnavailable(format!("Failed to open RocksDB at {}: {}", path, e))
        })?;

        Ok(Self {
            db,
            sequence: AtomicU64::new(0),
        })
    }

    /// Get raw bytes from RocksDB, mapping errors to SkillError::StoreUnavailable.
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, SkillError> {
        self.db
            .get(key)
            .map_err(|e| SkillError::StoreUnavailable(format!("RocksDB get failed: {}", e)))
    }

    /// Put raw bytes into RocksDB, mapping errors to SkillError::WriteFailed.
    fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), SkillError> {
        self.db
            .put(key, value)
            .map_err(|e| SkillError::WriteFailed(format!("RocksDB put failed: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for RocksKvStore {
    async fn is_available(&self) -> Result<bool, SkillError> {
        match self.get_raw(PROBE_KEY) {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("RocksDB readiness probe failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, SkillError> {
        Ok(self.get_raw(key.as_bytes())?.unwrap_or_default())
    }

    async fn set_data(
        &self,
        key: &str,
        value: &[u8],
        auth: &WriteAuthorization,
    ) -> Result<WriteReceipt, SkillError> {
        check_authorization(key, value, auth)?;
        self.put_raw(key.as_bytes(), value)?;
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("RocksDB wrote {} ({} bytes) for {}", key, value.len(), auth.signer);

        Ok(WriteReceipt {
            key: key.to_string(),
            bytes_written: value.len(),
            signer: auth.signer.clone(),
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::authorize;

    /// Create a temporary directory path using UUID to avoid conflicts.
    fn temp_db_path(label: &str) -> String {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("skillswap_test_{}_{}", label, uuid::Uuid::now_v7()));
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_rocks_roundtrip_and_absent_key() {
        let path = temp_db_path("roundtrip");
        let store = RocksKvStore::open(&path).unwrap();

        assert!(store.is_available().await.unwrap());
        assert!(store.get_data("skill_keys").await.unwrap().is_empty());

        let receipt = store
            .set_data("skill_keys", b"[]", &authorize("skill_keys", b"[]"))
            .await
            .unwrap();
        assert_eq!(receipt.sequence, 1);
        assert_eq!(store.get_data("skill_keys").await.unwrap(), b"[]");

        drop(store);
        let _ = std::fs::remove_dir_all(&path);
    }

    #[tokio::test]
    async fn test_rocks_persists_across_reopen() {
        let path = temp_db_path("reopen");
        {
            let store = RocksKvStore::open(&path).unwrap();
            store
                .set_data("skill_1", b"blob", &authorize("skill_1", b"blob"))
                .await
                .unwrap();
        }
        let store = RocksKvStore::open(&path).unwrap();
        assert_eq!(store.get_data("skill_1").await.unwrap(), b"blob");

        drop(store);
        let _ = std::fs::remove_dir_all(&path);
    }
}
