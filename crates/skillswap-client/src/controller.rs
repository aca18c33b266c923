// crates/skillswap-client/src/controller.rs
//
// SkillRegistryController: the single owner of application state.
//
// Constructed once by the presentation layer, which calls the operations
// below in response to user intent and subscribes to `AppEvent`s to learn
// when to re-render. The record set is replaced wholesale on every load and
// never mutated in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use skillswap_core::codec::PlaceholderCipher;
use skillswap_core::error::SkillError;
use skillswap_core::identity::WalletSession;
use skillswap_core::record::{
    generate_record_id, short_prefix, SkillDraft, SkillRecord, MAX_RATING,
};
use skillswap_core::traits::{KeyValueStore, PayloadCipher, WalletProvider};
use skillswap_store::{RecordStore, RegistryIndex};

use crate::activity::{ActivityEntry, ActivityLog};
use crate::config::ClientConfig;
use crate::events::AppEvent;
use crate::orchestrator::{OperationKind, TransactionOrchestrator};
use crate::read_model::{category_stats, filter_records, CategoryFilter, RegistryStats};
use crate::transaction::TransactionState;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Everything the presentation layer renders, minus the transaction banner
/// (owned by the orchestrator).
struct AppState {
    records: Arc<Vec<SkillRecord>>,
    session: Option<WalletSession>,
    /// Bumped on every connect/disconnect so stale account handlers go quiet.
    session_epoch: u64,
    activity: ActivityLog,
    last_load_error: Option<String>,
    /// Sequence number of the load whose result `records` holds.
    applied_load: u64,
}

/// Controller exposing the registry operations and read-only views.
pub struct SkillRegistryController {
    config: ClientConfig,
    index: RegistryIndex,
    records: RecordStore,
    cipher: Arc<dyn PayloadCipher>,
    orchestrator: TransactionOrchestrator,
    state: Arc<RwLock<AppState>>,
    events: broadcast::Sender<AppEvent>,
    load_seq: AtomicU64,
}

impl SkillRegistryController {
    /// Create a controller over `store` using the placeholder payload cipher.
    pub fn new(store: Arc<dyn KeyValueStore>, config: ClientConfig) -> Self {
        Self::with_cipher(store, config, Arc::new(PlaceholderCipher))
    }

    /// Create a controller with a specific payload cipher.
    pub fn with_cipher(
        store: Arc<dyn KeyValueStore>,
        config: ClientConfig,
        cipher: Arc<dyn PayloadCipher>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let state = AppState {
            records: Arc::new(Vec::new()),
            session: None,
            session_epoch: 0,
            activity: ActivityLog::new(config.activity_capacity),
            last_load_error: None,
            applied_load: 0,
        };

        Self {
            index: RegistryIndex::new(store.clone(), config.keys.clone()),
            records: RecordStore::new(store, config.keys.clone()),
            cipher,
            orchestrator: TransactionOrchestrator::new(&config, events.clone()),
            state: Arc::new(RwLock::new(state)),
            events,
            load_seq: AtomicU64::new(0),
            config,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    // ---------------------------------------------------------------
    // Wallet session
    // ---------------------------------------------------------------

    /// Connect a wallet provider; its first account becomes the session.
    ///
    /// Later account switches update the session address in place. Writes
    /// already in flight keep the session they started with.
    pub async fn connect_wallet(
        &self,
        provider: Arc<dyn WalletProvider>,
    ) -> Result<String, SkillError> {
        let accounts = provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .filter(|a| !a.is_empty())
            .ok_or(SkillError::WalletNotConnected)?;

        let epoch = {
            let mut state = write(&self.state);
            state.session_epoch += 1;
            state.session = Some(WalletSession::new(address.clone(), provider.clone()));
            state.session_epoch
        };
        let _ = self.events.send(AppEvent::SessionChanged {
            address: Some(address.clone()),
        });
        record_activity(
            &self.state,
            &self.events,
            format!("Wallet connected: {}...", short_prefix(&address, 6)),
        );

        // Weak: the session holds the provider, which holds this handler.
        let state = Arc::downgrade(&self.state);
        let events = self.events.clone();
        provider.on_accounts_changed(Arc::new(move |accounts: Vec<String>| {
            let Some(state) = state.upgrade() else {
                return;
            };
            let next = accounts.into_iter().next().unwrap_or_default();
            {
                let mut guard = write(&state);
                if guard.session_epoch != epoch {
                    return;
                }
                if next.is_empty() {
                    guard.session = None;
                } else if let Some(session) = guard.session.as_mut() {
                    session.address = next.clone();
                } else {
                    return;
                }
            }
            let address = (!next.is_empty()).then(|| next.clone());
            let _ = events.send(AppEvent::SessionChanged { address });
            record_activity(
                &state,
                &events,
                format!("Wallet changed to: {}...", short_prefix(&next, 6)),
            );
        }));

        tracing::info!("Wallet connected: {}", address);
        Ok(address)
    }

    /// Drop the wallet session.
    pub fn disconnect_wallet(&self) {
        {
            let mut state = write(&self.state);
            state.session_epoch += 1;
            state.session = None;
        }
        let _ = self.events.send(AppEvent::SessionChanged { address: None });
        record_activity(&self.state, &self.events, "Wallet disconnected");
    }

    // ---------------------------------------------------------------
    // Load path
    // ---------------------------------------------------------------

    /// Reload every record reachable through the index.
    ///
    /// On failure the previous record set is kept and the error is logged
    /// to the activity log as well as returned.
    pub async fn load_all(&self) -> Result<usize, SkillError> {
        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;

        match self.records.load_all(&self.index).await {
            Ok(records) => {
                let count = records.len();
                {
                    let mut state = write(&self.state);
                    if seq < state.applied_load {
                        tracing::debug!("Discarding load {} superseded by {}", seq, state.applied_load);
                        return Ok(count);
                    }
                    state.records = Arc::new(records);
                    state.applied_load = seq;
                    state.last_load_error = None;
                }
                let _ = self.events.send(AppEvent::RecordsReloaded { count });
                record_activity(&self.state, &self.events, format!("Loaded {} skills", count));
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Error loading skills: {}", e);
                write(&self.state).last_load_error = Some(e.to_string());
                let _ = self.events.send(AppEvent::LoadFailed {
                    message: e.to_string(),
                });
                record_activity(&self.state, &self.events, "Error loading skills");
                Err(e)
            }
        }
    }

    // ---------------------------------------------------------------
    // Write path
    // ---------------------------------------------------------------

    /// Submit a new skill record. Returns the new record's id.
    pub async fn submit(&self, draft: SkillDraft) -> Result<String, SkillError> {
        let ticket = self.orchestrator.begin(OperationKind::Submit)?;

        match self.try_submit(&draft).await {
            Ok(id) => {
                let completed = self.orchestrator.succeed(ticket);
                record_activity(
                    &self.state,
                    &self.events,
                    format!("Added new skill: {}", draft.category),
                );
                let _ = self.load_all().await;
                self.orchestrator.schedule_dismiss(completed);
                Ok(id)
            }
            Err(e) => {
                self.orchestrator.fail(ticket, &e);
                Err(e)
            }
        }
    }

    async fn try_submit(&self, draft: &SkillDraft) -> Result<String, SkillError> {
        let session = self.session().ok_or(SkillError::WalletNotConnected)?;
        let payload = self.cipher.encode(draft)?;
        let id = self.allocate_id().await?;

        let record = SkillRecord::new(id.clone(), payload, session.address.clone(), draft.category);
        self.records.save_record(&record, &session).await?;
        self.index.append_index(&id, &session).await?;

        tracing::info!("Submitted skill {} ({})", id, draft.category);
        Ok(id)
    }

    /// Pick a fresh id whose record key is still empty.
    ///
    /// Narrows, but does not close, the collision window: another writer
    /// can still claim the key between this check and the write.
    async fn allocate_id(&self) -> Result<String, SkillError> {
        let attempts = self.config.id_allocation_attempts.max(1);
        for attempt in 1..=attempts {
            let id = generate_record_id();
            if !self.records.record_exists(&id).await? {
                return Ok(id);
            }
            tracing::warn!("Record id {} already taken (attempt {}/{})", id, attempt, attempts);
        }
        Err(SkillError::WriteFailed(
            "could not allocate a unique record id".to_string(),
        ))
    }

    /// Set the star rating (1-5) of an existing record.
    ///
    /// Rewrites the whole record; a concurrent rating of the same record is
    /// last-write-wins.
    pub async fn rate(&self, id: &str, value: u8) -> Result<(), SkillError> {
        let ticket = self.orchestrator.begin(OperationKind::Rate)?;

        match self.try_rate(id, value).await {
            Ok(()) => {
                let completed = self.orchestrator.succeed(ticket);
                record_activity(
                    &self.state,
                    &self.events,
                    format!("Rated skill {}... as {} stars", short_prefix(id, 6), value),
                );
                let _ = self.load_all().await;
                self.orchestrator.schedule_dismiss(completed);
                Ok(())
            }
            Err(e) => {
                self.orchestrator.fail(ticket, &e);
                Err(e)
            }
        }
    }

    async fn try_rate(&self, id: &str, value: u8) -> Result<(), SkillError> {
        if value == 0 || value > MAX_RATING {
            return Err(SkillError::InvalidRating(value));
        }
        let session = self.session().ok_or(SkillError::WalletNotConnected)?;
        let existing = self
            .records
            .load_record(id)
            .await?
            .ok_or_else(|| SkillError::NotFound("Skill not found".to_string()))?;

        self.records.save_record(&existing.with_rating(value), &session).await?;
        tracing::info!("Rated skill {} as {}", id, value);
        Ok(())
    }

    /// Record interest in learning a listed skill. Purely informational:
    /// nothing is written to the store.
    pub fn request_learn(&self, id: &str) -> Result<(), SkillError> {
        let record = read(&self.state)
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| SkillError::NotFound(format!("Skill not found: {}", id)))?;

        record_activity(
            &self.state,
            &self.events,
            format!(
                "Requested to learn {} from {}...",
                record.category,
                short_prefix(&record.owner, 6)
            ),
        );
        Ok(())
    }

    // ---------------------------------------------------------------
    // Read-only views
    // ---------------------------------------------------------------

    /// Current record set, newest first.
    pub fn records(&self) -> Arc<Vec<SkillRecord>> {
        read(&self.state).records.clone()
    }

    /// Records matching a search term and category filter.
    pub fn view(&self, search: &str, filter: CategoryFilter) -> Vec<SkillRecord> {
        filter_records(&self.records(), search, filter)
    }

    /// Per-category statistics over the current record set.
    pub fn stats(&self) -> RegistryStats {
        category_stats(&self.records())
    }

    /// Activity log, most recent first.
    pub fn activity(&self) -> Vec<ActivityEntry> {
        read(&self.state).activity.entries()
    }

    /// Current transaction banner.
    pub fn transaction(&self) -> TransactionState {
        self.orchestrator.state()
    }

    /// Whether the trigger for `kind` should be disabled.
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.orchestrator.is_busy(kind)
    }

    /// Active wallet session, if connected.
    pub fn session(&self) -> Option<WalletSession> {
        read(&self.state).session.clone()
    }

    /// Message of the most recent failed load, cleared by a successful one.
    pub fn last_load_error(&self) -> Option<String> {
        read(&self.state).last_load_error.clone()
    }

    /// Decode a record's payload back into its draft fields.
    pub fn reveal(&self, record: &SkillRecord) -> Result<SkillDraft, SkillError> {
        self.cipher.decode(&record.payload)
    }
}

fn record_activity(
    state: &RwLock<AppState>,
    events: &broadcast::Sender<AppEvent>,
    text: impl Into<String>,
) {
    let entry = write(state).activity.record(text);
    let _ = events.send(AppEvent::ActivityRecorded(entry));
}

fn read(state: &RwLock<AppState>) -> RwLockReadGuard<'_, AppState> {
    state.read().unwrap_or_else(|p| p.into_inner())
}

fn write(state: &RwLock<AppState>) -> RwLockWriteGuard<'_, AppState> {
    state.write().unwrap_or_else(|p| p.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{ApprovalPolicy, LocalWallet};
    use skillswap_core::record::SkillCategory;
    use skillswap_store::InMemoryStore;

    fn controller() -> (SkillRegistryController, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (
            SkillRegistryController::new(store.clone(), ClientConfig::default()),
            store,
        )
    }

    #[tokio::test]
    async fn test_submit_without_wallet_surfaces_error() {
        let (ctl, store) = controller();
        let err = ctl
            .submit(SkillDraft::new(SkillCategory::Cooking))
            .await
            .unwrap_err();
        assert!(matches!(err, SkillError::WalletNotConnected));
        let banner = ctl.transaction();
        assert!(banner.visible);
        assert_eq!(banner.message, "Please connect wallet first");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_submit_then_reveal_payload() {
        let (ctl, _store) = controller();
        ctl.connect_wallet(Arc::new(LocalWallet::generate(ApprovalPolicy::AutoApprove)))
            .await
            .unwrap();

        let draft = SkillDraft::new(SkillCategory::Language)
            .with_description("Spanish tutoring")
            .with_experience("3 years");
        let id = ctl.submit(draft.clone()).await.unwrap();

        let records = ctl.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].owner, ctl.session().unwrap().address);
        assert_eq!(ctl.reveal(&records[0]).unwrap(), draft);
    }

    #[tokio::test]
    async fn test_rate_rejects_out_of_range_and_unknown() {
        let (ctl, _store) = controller();
        ctl.connect_wallet(Arc::new(LocalWallet::generate(ApprovalPolicy::AutoApprove)))
            .await
            .unwrap();

        assert!(matches!(ctl.rate("x", 6).await, Err(SkillError::InvalidRating(6))));
        assert!(matches!(ctl.rate("x", 0).await, Err(SkillError::InvalidRating(0))));
        let err = ctl.rate("missing", 3).await.unwrap_err();
        assert!(matches!(err, SkillError::NotFound(_)));
        assert_eq!(ctl.transaction().message, "Rating failed: Skill not found");
    }

    #[tokio::test]
    async fn test_user_rejection_message() {
        let (ctl, store) = controller();
        ctl.connect_wallet(Arc::new(LocalWallet::generate(ApprovalPolicy::DenyAll)))
            .await
            .unwrap();

        let err = ctl.submit(SkillDraft::new(SkillCategory::Other)).await.unwrap_err();
        assert!(err.is_user_rejection());
        assert_eq!(ctl.transaction().message, "Transaction rejected by user");
        assert!(store.is_empty());
        assert!(!ctl.is_busy(OperationKind::Submit));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_records() {
        let (ctl, store) = controller();
        ctl.connect_wallet(Arc::new(LocalWallet::generate(ApprovalPolicy::AutoApprove)))
            .await
            .unwrap();
        ctl.submit(SkillDraft::new(SkillCategory::Cooking)).await.unwrap();

        store.set_available(false);
        assert!(matches!(ctl.load_all().await, Err(SkillError::StoreUnavailable(_))));
        assert_eq!(ctl.records().len(), 1);
        assert!(ctl.last_load_error().is_some());
        assert_eq!(ctl.activity()[0].text, "Error loading skills");
    }

    #[tokio::test]
    async fn test_account_switch_updates_session_in_place() {
        let (ctl, _store) = controller();
        let wallet = Arc::new(LocalWallet::generate(ApprovalPolicy::AutoApprove));
        let first = ctl.connect_wallet(wallet.clone()).await.unwrap();
        let held = ctl.session().unwrap();

        wallet.switch_account(skillswap_core::crypto::Keypair::generate());
        let second = ctl.session().unwrap().address;
        assert_ne!(first, second);
        assert_eq!(second, wallet.address());
        // A session snapshot taken before the switch is untouched.
        assert_eq!(held.address, first);
        assert!(ctl.activity()[0].text.starts_with("Wallet changed to: 0x"));

        ctl.disconnect_wallet();
        wallet.switch_account(skillswap_core::crypto::Keypair::generate());
        assert!(ctl.session().is_none());
        assert_eq!(ctl.activity()[0].text, "Wallet disconnected");
    }

    #[tokio::test]
    async fn test_request_learn_logs_activity() {
        let (ctl, _store) = controller();
        ctl.connect_wallet(Arc::new(LocalWallet::generate(ApprovalPolicy::AutoApprove)))
            .await
            .unwrap();
        let id = ctl.submit(SkillDraft::new(SkillCategory::Cooking)).await.unwrap();

        ctl.request_learn(&id).unwrap();
        let text = &ctl.activity()[0].text;
        assert!(text.starts_with("Requested to learn Cooking from 0x"));
        assert!(matches!(ctl.request_learn("nope"), Err(SkillError::NotFound(_))));
    }
}
