// crates/skillswap-store/src/index.rs
//
// Registry Index Manager.
//
// The key/value store cannot enumerate its keys, so the registry keeps one
// aggregate list of record ids at a well-known key. The list is created
// lazily by the first append and never deleted.
//
// Known hazard: `append_index` is an unguarded read-modify-write. Two
// appends whose read and write interleave will each persist only the ids
// they saw, and the earlier writer's id silently drops out of the index.
// Its record stays in the store but is no longer reachable. See the
// `concurrent_index_appends_lose_an_update` test in skillswap-client for a
// reproduction.

use std::sync::Arc;

use skillswap_core::codec::{decode_index, encode_index};
use skillswap_core::error::SkillError;
use skillswap_core::identity::WalletSession;
use skillswap_core::traits::{KeyValueStore, WriteReceipt};

use crate::keys::StoreKeys;
use crate::{authorized_write, read_error};

/// Owner of the aggregate list of record identifiers.
#[derive(Clone)]
pub struct RegistryIndex {
    store: Arc<dyn KeyValueStore>,
    keys: StoreKeys,
}

impl RegistryIndex {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StoreKeys) -> Self {
        Self { store, keys }
    }

    /// Key the index blob lives at.
    pub fn index_key(&self) -> &str {
        &self.keys.index_key
    }

    /// Read the index.
    ///
    /// An absent key is an empty index. Bytes that do not parse are logged
    /// and also read as an empty index ("no records yet"). Store failures
    /// propagate as `StoreUnavailable`.
    pub async fn load_index(&self) -> Result<Vec<String>, SkillError> {
        match self.read_index().await {
            Ok(ids) => Ok(ids),
            Err(SkillError::DecodeError(e)) => {
                tracing::warn!("Error parsing registry index at {}: {}", self.keys.index_key, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Append `id` to the index: load, push, persist.
    ///
    /// No guard spans the read and the write. Unlike `load_index`, an
    /// existing index that fails to parse aborts the append with
    /// `DecodeError` instead of being replaced by a one-element list.
    pub async fn append_index(
        &self,
        id: &str,
        session: &WalletSession,
    ) -> Result<WriteReceipt, SkillError> {
        let mut ids = self.read_index().await?;
        ids.push(id.to_string());
        let bytes = encode_index(&ids)?;

        let receipt =
            authorized_write(self.store.as_ref(), session, &self.keys.index_key, &bytes).await?;
        tracing::debug!("Registry index now holds {} ids (seq {})", ids.len(), receipt.sequence);
        Ok(receipt)
    }

    async fn read_index(&self) -> Result<Vec<String>, SkillError> {
        let bytes = self
            .store
            .get_data(&self.keys.index_key)
            .await
            .map_err(read_error)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        decode_index(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::test_support::session;

    fn index_over(store: &Arc<InMemoryStore>) -> RegistryIndex {
        RegistryIndex::new(store.clone(), StoreKeys::default())
    }

    #[tokio::test]
    async fn test_absent_index_is_empty() {
        let store = Arc::new(InMemoryStore::new());
        assert!(index_over(&store).load_index().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sequential_appends_preserve_order() {
        let store = Arc::new(InMemoryStore::new());
        let index = index_over(&store);
        let session = session();

        for id in ["a", "b", "c"] {
            index.append_index(id, &session).await.unwrap();
        }
        assert_eq!(index.load_index().await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_corrupt_index_reads_empty_but_blocks_append() {
        let store = Arc::new(InMemoryStore::new());
        store.put_raw("skill_keys", b"{not json");
        let index = index_over(&store);

        assert!(index.load_index().await.unwrap().is_empty());
        let err = index.append_index("a", &session()).await.unwrap_err();
        assert!(matches!(err, SkillError::DecodeError(_)));
        assert_eq!(store.get_data("skill_keys").await.unwrap(), b"{not json");
    }

    #[tokio::test]
    async fn test_legacy_index_is_extended_in_current_format() {
        let store = Arc::new(InMemoryStore::new());
        store.put_raw("skill_keys", br#"["old-1"]"#);
        let index = index_over(&store);

        index.append_index("new-2", &session()).await.unwrap();
        assert_eq!(index.load_index().await.unwrap(), vec!["old-1", "new-2"]);
        let raw = store.get_data("skill_keys").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["version"], 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_propagates() {
        let store = Arc::new(InMemoryStore::new());
        store.set_available(false);
        let err = index_over(&store).load_index().await.unwrap_err();
        assert!(matches!(err, SkillError::StoreUnavailable(_)));
    }
}
