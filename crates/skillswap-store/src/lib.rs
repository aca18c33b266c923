// crates/skillswap-store/src/lib.rs
//
// skillswap-store: Storage layer for the SkillSwap registry.
//
// Provides the key/value store backends (RocksDB for persistence, an
// in-memory map for tests and ephemeral sessions), the Registry Index
// Manager that tracks every record id at one well-known key, and the
// Record Store Accessor that reads and writes individual records.

pub mod index;
pub mod keys;
pub mod memory;
pub mod records;
pub mod rocks;

// Re-export key types for ergonomic access from downstream crates.
pub use index::RegistryIndex;
pub use keys::StoreKeys;
pub use memory::InMemoryStore;
pub use records::RecordStore;
pub use rocks::RocksKvStore;

use skillswap_core::error::SkillError;
use skillswap_core::identity::{address_from_public_key, WalletSession, WriteAuthorization};
use skillswap_core::traits::{KeyValueStore, WriteReceipt};

/// Normalize a failure on the read path to `StoreUnavailable`.
pub(crate) fn read_error(e: SkillError) -> SkillError {
    match e {
        SkillError::StoreUnavailable(_) => e,
        other => SkillError::StoreUnavailable(other.to_string()),
    }
}

/// Normalize a failure on the write path: rejections stay rejections,
/// everything else becomes `WriteFailed`.
pub(crate) fn write_error(e: SkillError) -> SkillError {
    match e {
        SkillError::UserRejected(_) | SkillError::WriteFailed(_) => e,
        other => SkillError::WriteFailed(other.to_string()),
    }
}

/// Ask the session's wallet to authorize `value` at `key`, then write it.
pub(crate) async fn authorized_write(
    store: &dyn KeyValueStore,
    session: &WalletSession,
    key: &str,
    value: &[u8],
) -> Result<WriteReceipt, SkillError> {
    let auth = session
        .provider
        .authorize_write(&session.address, key, value)
        .await
        .map_err(write_error)?;
    store.set_data(key, value, &auth).await.map_err(write_error)
}

/// Reject a write whose authorization does not cover exactly this key/value
/// pair or whose signer does not match its public key.
pub(crate) fn check_authorization(
    key: &str,
    value: &[u8],
    auth: &WriteAuthorization,
) -> Result<(), SkillError> {
    if address_from_public_key(&auth.public_key) != auth.signer {
        return Err(SkillError::WriteFailed(format!(
            "signer {} does not match authorization key",
            auth.signer
        )));
    }
    if !auth.verify(key, value)? {
        return Err(SkillError::WriteFailed(format!(
            "invalid write authorization for {}",
            key
        )));
    }
    Ok(())
}
