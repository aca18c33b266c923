// crates/skillswap-core/src/traits.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SkillError;
use crate::identity::WriteAuthorization;
use crate::record::SkillDraft;

/// Acknowledgement returned by a successful `set_data` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Key that was written.
    pub key: String,
    /// Number of value bytes persisted.
    pub bytes_written: usize,
    /// Address of the wallet that authorized the write.
    pub signer: String,
    /// Store-assigned, monotonically increasing write sequence number.
    pub sequence: u64,
}

/// Generic key/value store collaborator.
///
/// The store offers no listing or iteration primitive, which is why the
/// registry keeps its own index of record identifiers at a fixed key.
/// Implemented by skillswap-store (RocksDB and in-memory backends).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Readiness probe, checked before any load.
    async fn is_available(&self) -> Result<bool, SkillError>;

    /// Read the value at `key`. Returns empty bytes if the key is absent.
    async fn get_data(&self, key: &str) -> Result<Vec<u8>, SkillError>;

    /// Overwrite the value at `key`. No version check is performed.
    async fn set_data(
        &self,
        key: &str,
        value: &[u8],
        auth: &WriteAuthorization,
    ) -> Result<WriteReceipt, SkillError>;
}

/// Callback invoked with the new account list when the wallet switches accounts.
pub type AccountsChangedHandler = Arc<dyn Fn(Vec<String>) + Send + Sync>;

/// Wallet/provider collaborator: supplies the account used to stamp record
/// owners and authorizes every store write.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the provider for its accounts. The first one becomes the session address.
    async fn request_accounts(&self) -> Result<Vec<String>, SkillError>;

    /// Register a handler for account switches.
    fn on_accounts_changed(&self, handler: AccountsChangedHandler);

    /// Authorize a write of `value` at `key` on behalf of `address`.
    ///
    /// Returns `SkillError::UserRejected` if the signer declines.
    async fn authorize_write(
        &self,
        address: &str,
        key: &str,
        value: &[u8],
    ) -> Result<WriteAuthorization, SkillError>;
}

/// Privacy-encoding step applied to submission drafts.
///
/// The only implementation today is a reversible placeholder
/// (`codec::PlaceholderCipher`); callers must not assume the payload is
/// unreadable.
pub trait PayloadCipher: Send + Sync {
    /// Encode a draft into an opaque payload string.
    fn encode(&self, draft: &SkillDraft) -> Result<String, SkillError>;

    /// Recover the draft from a payload produced by `encode`.
    fn decode(&self, payload: &str) -> Result<SkillDraft, SkillError>;
}
