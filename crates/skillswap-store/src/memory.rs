// crates/skillswap-store/src/memory.rs
//
// In-memory key/value store.
//
// Backs tests and the CLI's `memory` backend. Availability and write
// failures can be switched on at runtime to exercise error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use skillswap_core::error::SkillError;
use skillswap_core::identity::WriteAuthorization;
use skillswap_core::traits::{KeyValueStore, WriteReceipt};

use crate::check_authorization;

/// `HashMap`-backed implementation of `KeyValueStore`.
#[derive(Debug)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
    write_failure: Mutex<Option<String>>,
    sequence: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            write_failure: Mutex::new(None),
            sequence: AtomicU64::new(0),
        }
    }

    /// Toggle the readiness probe and read path.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every subsequent `set_data` fail with `WriteFailed(reason)`,
    /// or clear the failure with `None`.
    pub fn fail_writes(&self, reason: Option<&str>) {
        if let Ok(mut failure) = self.write_failure.lock() {
            *failure = reason.map(str::to_string);
        }
    }

    /// Write bytes without authorization. For seeding fixtures, including
    /// deliberately malformed blobs.
    pub fn put_raw(&self, key: &str, value: &[u8]) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_vec());
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn is_available(&self) -> Result<bool, SkillError> {
        Ok(self.available.load(Ordering::SeqCst))
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, SkillError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(SkillError::StoreUnavailable("in-memory store is offline".to_string()));
        }
        let entries = self
            .entries
            .read()
            .map_err(|e| SkillError::StoreUnavailable(format!("RwLock poisoned: {}", e)))?;
        tracing::trace!("get_data {}", key);
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    async fn set_data(
        &self,
        key: &str,
        value: &[u8],
        auth: &WriteAuthorization,
    ) -> Result<WriteReceipt, SkillError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(SkillError::WriteFailed("in-memory store is offline".to_string()));
        }
        let injected = self
            .write_failure
            .lock()
            .map_err(|e| SkillError::WriteFailed(format!("Mutex poisoned: {}", e)))?
            .clone();
        if let Some(reason) = injected {
            return Err(SkillError::WriteFailed(reason));
        }
        check_authorization(key, value, auth)?;

        let mut entries = self
            .entries
            .write()
            .map_err(|e| SkillError::WriteFailed(format!("RwLock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_vec());
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("set_data {} ({} bytes, seq {})", key, value.len(), sequence);

        Ok(WriteReceipt {
            key: key.to_string(),
            bytes_written: value.len(),
            signer: auth.signer.clone(),
            sequence,
        })
    }
}
