// crates/skillswap-client/src/orchestrator.rs
//
// Transaction Orchestrator: wraps every write path (submit, rate) in the
// pending/success/error lifecycle and owns the timers that return the
// banner to idle.
//
// Only one operation of a given kind may be pending at a time. Operations
// of different kinds may overlap; they share the single banner, and the
// most recent transition is what the banner shows. A new operation cancels
// the banner's dismiss timer but never a pending submission form reset.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use skillswap_core::error::SkillError;

use crate::config::ClientConfig;
use crate::events::AppEvent;
use crate::transaction::{DismissTimer, PhaseMachine, TransactionState, TxPhase};

/// Kinds of write operation the orchestrator tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Submit,
    Rate,
}

impl OperationKind {
    pub fn pending_message(&self) -> &'static str {
        match self {
            OperationKind::Submit => "Encrypting skill data with FHE...",
            OperationKind::Rate => "Processing encrypted rating with FHE...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            OperationKind::Submit => "Encrypted skill submitted securely!",
            OperationKind::Rate => "FHE rating completed successfully!",
        }
    }

    fn failure_label(&self) -> &'static str {
        match self {
            OperationKind::Submit => "Submission",
            OperationKind::Rate => "Rating",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Submit => write!(f, "submit"),
            OperationKind::Rate => write!(f, "rate"),
        }
    }
}

/// Banner text for a failed operation.
pub fn error_message(kind: OperationKind, err: &SkillError) -> String {
    match err {
        e if e.is_user_rejection() => "Transaction rejected by user".to_string(),
        SkillError::WalletNotConnected => err.to_string(),
        other => format!("{} failed: {}", kind.failure_label(), other),
    }
}

/// Banner state plus the id of the operation that last wrote it.
#[derive(Debug)]
struct Banner {
    state: TransactionState,
    owner: u64,
}

/// Handle for a pending operation. Dropping it frees the operation kind.
#[derive(Debug)]
pub struct OperationTicket {
    kind: OperationKind,
    id: u64,
    machine: PhaseMachine,
    busy: Arc<Mutex<HashSet<OperationKind>>>,
}

impl OperationTicket {
    fn advance(&mut self, next: TxPhase) {
        if let Err(e) = self.machine.transition(next) {
            tracing::error!("{} operation {}: {}", self.kind, self.id, e);
        }
    }
}

impl Drop for OperationTicket {
    fn drop(&mut self) {
        lock(&self.busy).remove(&self.kind);
    }
}

/// A successful operation waiting for its dismiss timer to be scheduled.
#[derive(Debug)]
pub struct CompletedOperation {
    kind: OperationKind,
    id: u64,
    machine: PhaseMachine,
}

/// Drives the transaction banner through each write's lifecycle.
pub struct TransactionOrchestrator {
    banner: Arc<Mutex<Banner>>,
    busy: Arc<Mutex<HashSet<OperationKind>>>,
    timer: Mutex<DismissTimer>,
    /// One task per successful submission; independent of the banner timer.
    form_resets: Mutex<Vec<JoinHandle<()>>>,
    next_id: AtomicU64,
    events: broadcast::Sender<AppEvent>,
    success_dismiss: Duration,
    error_dismiss: Duration,
    form_reset: Duration,
}

impl TransactionOrchestrator {
    pub fn new(config: &ClientConfig, events: broadcast::Sender<AppEvent>) -> Self {
        Self {
            banner: Arc::new(Mutex::new(Banner {
                state: TransactionState::idle(),
                owner: 0,
            })),
            busy: Arc::new(Mutex::new(HashSet::new())),
            timer: Mutex::new(DismissTimer::new()),
            form_resets: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            events,
            success_dismiss: config.success_dismiss(),
            error_dismiss: config.error_dismiss(),
            form_reset: config.form_reset(),
        }
    }

    /// Current banner state.
    pub fn state(&self) -> TransactionState {
        lock(&self.banner).state.clone()
    }

    /// Whether an operation of `kind` is pending (its trigger is disabled).
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        lock(&self.busy).contains(&kind)
    }

    /// Enter `pending` for a new operation.
    ///
    /// Refuses with `OperationInProgress` if the same kind is already
    /// pending. Cancels any dismiss timer still waiting.
    pub fn begin(&self, kind: OperationKind) -> Result<OperationTicket, SkillError> {
        if !lock(&self.busy).insert(kind) {
            return Err(SkillError::OperationInProgress(kind.to_string()));
        }
        if lock(&self.timer).cancel() {
            tracing::debug!("Dismiss timer superseded by new {} operation", kind);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut ticket = OperationTicket {
            kind,
            id,
            machine: PhaseMachine::new(),
            busy: self.busy.clone(),
        };
        ticket.advance(TxPhase::Pending);
        self.show(id, TransactionState::pending(kind.pending_message()));
        Ok(ticket)
    }

    /// Enter `success`. The caller reloads, then calls `schedule_dismiss`.
    pub fn succeed(&self, mut ticket: OperationTicket) -> CompletedOperation {
        ticket.advance(TxPhase::Success);
        self.show(ticket.id, TransactionState::success(ticket.kind.success_message()));
        CompletedOperation {
            kind: ticket.kind,
            id: ticket.id,
            machine: std::mem::take(&mut ticket.machine),
        }
    }

    /// Arm the return to idle after the success delay. Submissions also get
    /// a `SubmissionFormReset` once the form reset delay has elapsed, even if
    /// a later operation supersedes the banner in the meantime.
    pub fn schedule_dismiss(&self, completed: CompletedOperation) {
        if completed.kind == OperationKind::Submit {
            self.schedule_form_reset();
        }
        self.arm(completed.id, completed.machine, self.success_dismiss);
    }

    /// Number of submission form resets still waiting to fire.
    pub fn pending_form_resets(&self) -> usize {
        let mut resets = lock(&self.form_resets);
        resets.retain(|h| !h.is_finished());
        resets.len()
    }

    fn schedule_form_reset(&self) {
        let delay = self.form_reset.max(self.success_dismiss);
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(AppEvent::SubmissionFormReset);
        });

        let mut resets = lock(&self.form_resets);
        resets.retain(|h| !h.is_finished());
        resets.push(handle);
    }

    /// Enter `error` with a classified message and arm the return to idle.
    pub fn fail(&self, mut ticket: OperationTicket, err: &SkillError) -> TransactionState {
        ticket.advance(TxPhase::Error);
        let state = TransactionState::error(error_message(ticket.kind, err));
        tracing::warn!("{} operation failed: {}", ticket.kind, err);
        self.show(ticket.id, state.clone());
        let machine = std::mem::take(&mut ticket.machine);
        self.arm(ticket.id, machine, self.error_dismiss);
        state
    }

    fn show(&self, owner: u64, state: TransactionState) {
        {
            let mut banner = lock(&self.banner);
            banner.state = state.clone();
            banner.owner = owner;
        }
        let _ = self.events.send(AppEvent::TransactionChanged(state));
    }

    fn arm(&self, id: u64, mut machine: PhaseMachine, delay: Duration) {
        let banner = self.banner.clone();
        let events = self.events.clone();

        lock(&self.timer).schedule(async move {
            tokio::time::sleep(delay).await;

            if let Err(e) = machine.transition(TxPhase::Idle) {
                tracing::error!("operation {}: {}", id, e);
            }
            let dismissed = {
                let mut banner = lock(&banner);
                if banner.owner == id {
                    banner.state = TransactionState::idle();
                    true
                } else {
                    false
                }
            };
            if dismissed {
                let _ = events.send(AppEvent::TransactionChanged(TransactionState::idle()));
            }
        });
    }
}

impl Drop for TransactionOrchestrator {
    fn drop(&mut self) {
        for handle in lock(&self.form_resets).drain(..) {
            handle.abort();
        }
    }
}

/// Lock a mutex, recovering the data if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TxStatus;

    fn orchestrator() -> (TransactionOrchestrator, broadcast::Receiver<AppEvent>) {
        let (tx, rx) = broadcast::channel(64);
        (TransactionOrchestrator::new(&ClientConfig::default(), tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_then_auto_dismiss() {
        let (orch, _rx) = orchestrator();
        let ticket = orch.begin(OperationKind::Rate).unwrap();
        assert_eq!(orch.state().status, TxStatus::Pending);
        assert!(orch.is_busy(OperationKind::Rate));

        let done = orch.succeed(ticket);
        assert!(!orch.is_busy(OperationKind::Rate));
        assert_eq!(orch.state(), TransactionState::success(OperationKind::Rate.success_message()));

        orch.schedule_dismiss(done);
        tokio::time::sleep(Duration::from_millis(1990)).await;
        assert!(orch.state().visible);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(orch.state().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_dismisses_after_three_seconds() {
        let (orch, _rx) = orchestrator();
        let ticket = orch.begin(OperationKind::Submit).unwrap();
        let state = orch.fail(ticket, &SkillError::WriteFailed("reverted".into()));
        assert_eq!(state.status, TxStatus::Error);
        assert_eq!(state.message, "Submission failed: Write failed: reverted");

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(orch.state().visible);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(orch.state().is_idle());
    }

    #[tokio::test]
    async fn test_same_kind_refused_other_kind_allowed() {
        let (orch, _rx) = orchestrator();
        let submit = orch.begin(OperationKind::Submit).unwrap();
        assert!(matches!(
            orch.begin(OperationKind::Submit),
            Err(SkillError::OperationInProgress(_))
        ));
        let rate = orch.begin(OperationKind::Rate).unwrap();
        assert_eq!(orch.state().message, OperationKind::Rate.pending_message());

        drop(rate);
        drop(submit);
        assert!(orch.begin(OperationKind::Submit).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_operation_cancels_pending_dismiss() {
        let (orch, _rx) = orchestrator();
        let done = orch.succeed(orch.begin(OperationKind::Rate).unwrap());
        orch.schedule_dismiss(done);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let _ticket = orch.begin(OperationKind::Submit).unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        let state = orch.state();
        assert!(state.visible);
        assert_eq!(state.message, OperationKind::Submit.pending_message());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_dismiss_emits_form_reset() {
        let (orch, mut rx) = orchestrator();
        let done = orch.succeed(orch.begin(OperationKind::Submit).unwrap());
        orch.schedule_dismiss(done);
        tokio::time::sleep(Duration::from_millis(2100)).await;

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        let resets = seen.iter().filter(|e| **e == AppEvent::SubmissionFormReset).count();
        assert_eq!(resets, 1);
        assert!(seen.contains(&AppEvent::TransactionChanged(TransactionState::idle())));
        assert_eq!(orch.pending_form_resets(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_form_reset_survives_later_operation() {
        let (orch, mut rx) = orchestrator();
        let submitted = orch.succeed(orch.begin(OperationKind::Submit).unwrap());
        orch.schedule_dismiss(submitted);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let rated = orch.succeed(orch.begin(OperationKind::Rate).unwrap());
        orch.schedule_dismiss(rated);
        assert_eq!(orch.pending_form_resets(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut resets = 0;
        while let Ok(event) = rx.try_recv() {
            if event == AppEvent::SubmissionFormReset {
                resets += 1;
            }
        }
        assert_eq!(resets, 1);
        assert!(orch.state().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_operation_keeps_form_reset() {
        let (orch, mut rx) = orchestrator();
        let submitted = orch.succeed(orch.begin(OperationKind::Submit).unwrap());
        orch.schedule_dismiss(submitted);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let ticket = orch.begin(OperationKind::Rate).unwrap();
        orch.fail(ticket, &SkillError::WriteFailed("reverted".into()));

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut resets = 0;
        while let Ok(event) = rx.try_recv() {
            if event == AppEvent::SubmissionFormReset {
                resets += 1;
            }
        }
        assert_eq!(resets, 1);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            error_message(OperationKind::Submit, &SkillError::UserRejected("denied".into())),
            "Transaction rejected by user"
        );
        assert_eq!(
            error_message(OperationKind::Rate, &SkillError::WalletNotConnected),
            "Please connect wallet first"
        );
        assert_eq!(
            error_message(OperationKind::Rate, &SkillError::NotFound("Skill not found".into())),
            "Rating failed: Skill not found"
        );
    }
}
