// crates/skillswap-store/src/records.rs
//
// Record Store Accessor: reads and writes individual skill records at
// `{record_key_prefix}{id}` and aggregates the full record set for a load
// cycle.

use std::sync::Arc;

use skillswap_core::codec::{decode_record, encode_record};
use skillswap_core::error::SkillError;
use skillswap_core::identity::WalletSession;
use skillswap_core::record::SkillRecord;
use skillswap_core::traits::{KeyValueStore, WriteReceipt};

use crate::index::RegistryIndex;
use crate::keys::StoreKeys;
use crate::{authorized_write, read_error};

/// Per-record read/write access over a `KeyValueStore`.
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn KeyValueStore>,
    keys: StoreKeys,
}

impl RecordStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StoreKeys) -> Self {
        Self { store, keys }
    }

    /// Load one record. Empty bytes at the key mean the record is absent.
    pub async fn load_record(&self, id: &str) -> Result<Option<SkillRecord>, SkillError> {
        let bytes = self
            .store
            .get_data(&self.keys.record_key(id))
            .await
            .map_err(read_error)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        decode_record(id, &bytes).map(Some)
    }

    /// Whether anything is stored at the key derived from `id`.
    pub async fn record_exists(&self, id: &str) -> Result<bool, SkillError> {
        let bytes = self
            .store
            .get_data(&self.keys.record_key(id))
            .await
            .map_err(read_error)?;
        Ok(!bytes.is_empty())
    }

    /// Write a record, replacing whatever was at its key. Last write wins;
    /// there is no version check.
    pub async fn save_record(
        &self,
        record: &SkillRecord,
        session: &WalletSession,
    ) -> Result<WriteReceipt, SkillError> {
        let bytes = encode_record(record)?;
        let key = self.keys.record_key(&record.id);
        authorized_write(self.store.as_ref(), session, &key, &bytes).await
    }

    /// Load every record reachable through the index.
    ///
    /// Probes availability first. Records that are absent, unreadable, or
    /// fail to decode are skipped with a logged note rather than aborting
    /// the batch. The result is sorted newest first; the sort is stable, so
    /// equal timestamps keep index order.
    pub async fn load_all(&self, index: &RegistryIndex) -> Result<Vec<SkillRecord>, SkillError> {
        if !self.store.is_available().await.map_err(read_error)? {
            tracing::error!("Key/value store is not available");
            return Err(SkillError::StoreUnavailable(
                "store readiness probe returned false".to_string(),
            ));
        }

        let ids = index.load_index().await?;
        let mut records = Vec::with_capacity(ids.len());

        for id in &ids {
            match self.load_record(id).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {
                    tracing::warn!("Indexed record {} has no stored value; skipping", id);
                }
                Err(SkillError::DecodeError(e)) => {
                    tracing::warn!("Error parsing record {}: {}", id, e);
                }
                Err(e) => {
                    tracing::warn!("Error loading record {}: {}", id, e);
                }
            }
        }

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        tracing::info!("Loaded {} of {} indexed records", records.len(), ids.len());
        Ok(records)
    }
}
