// crates/skillswap-client/src/transaction.rs
//
// Transaction lifecycle shown to the presentation layer.
//
// Valid transitions per operation:
//   Idle -> Pending -> Success -> Idle
//                  \-> Error   -> Idle

use std::fmt;
use std::future::Future;

use serde::Serialize;
use tokio::task::JoinHandle;

/// Status of the visible transaction banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
    Error,
}

/// Presentation-facing transaction state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionState {
    pub visible: bool,
    pub status: TxStatus,
    pub message: String,
}

impl TransactionState {
    /// Hidden banner; the resting state between operations.
    pub fn idle() -> Self {
        Self {
            visible: false,
            status: TxStatus::Pending,
            message: String::new(),
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::shown(TxStatus::Pending, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::shown(TxStatus::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::shown(TxStatus::Error, message)
    }

    fn shown(status: TxStatus, message: impl Into<String>) -> Self {
        Self {
            visible: true,
            status,
            message: message.into(),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.visible
    }
}

impl Default for TransactionState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Lifecycle phase of one write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Idle,
    Pending,
    Success,
    Error,
}

impl fmt::Display for TxPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxPhase::Idle => write!(f, "Idle"),
            TxPhase::Pending => write!(f, "Pending"),
            TxPhase::Success => write!(f, "Success"),
            TxPhase::Error => write!(f, "Error"),
        }
    }
}

/// State machine for one operation's lifecycle.
#[derive(Debug)]
pub struct PhaseMachine {
    pub current: TxPhase,
}

impl PhaseMachine {
    /// Create a new state machine starting in the Idle state.
    pub fn new() -> Self {
        Self {
            current: TxPhase::Idle,
        }
    }

    /// Attempt to transition to a new phase.
    ///
    /// Returns an error if the transition is not valid.
    pub fn transition(&mut self, next: TxPhase) -> Result<(), String> {
        let valid = matches!(
            (self.current, next),
            (TxPhase::Idle, TxPhase::Pending)
                | (TxPhase::Pending, TxPhase::Success)
                | (TxPhase::Pending, TxPhase::Error)
                | (TxPhase::Success, TxPhase::Idle)
                | (TxPhase::Error, TxPhase::Idle)
        );

        if valid {
            tracing::trace!("Transaction phase: {} -> {}", self.current, next);
            self.current = next;
            Ok(())
        } else {
            Err(format!(
                "Invalid transaction transition: {} -> {}",
                self.current, next
            ))
        }
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellable delayed action backing the status auto-dismiss.
///
/// Scheduling replaces (and aborts) any action still waiting; dropping the
/// timer aborts it too.
#[derive(Debug, Default)]
pub struct DismissTimer {
    handle: Option<JoinHandle<()>>,
}

impl DismissTimer {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Run `action` on the tokio runtime, replacing any pending action.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(action));
    }

    /// Abort the pending action, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_valid_lifecycle() {
        let mut machine = PhaseMachine::new();
        machine.transition(TxPhase::Pending).unwrap();
        machine.transition(TxPhase::Success).unwrap();
        machine.transition(TxPhase::Idle).unwrap();
        machine.transition(TxPhase::Pending).unwrap();
        machine.transition(TxPhase::Error).unwrap();
        machine.transition(TxPhase::Idle).unwrap();
    }

    #[test]
    fn test_invalid_transitions() {
        let mut machine = PhaseMachine::new();
        assert!(machine.transition(TxPhase::Success).is_err());
        machine.transition(TxPhase::Pending).unwrap();
        assert!(machine.transition(TxPhase::Idle).is_err());
        machine.transition(TxPhase::Error).unwrap();
        assert!(machine.transition(TxPhase::Success).is_err());
        assert_eq!(machine.current, TxPhase::Error);
    }

    #[test]
    fn test_idle_state_is_hidden() {
        assert!(TransactionState::idle().is_idle());
        assert!(!TransactionState::error("x").is_idle());
        assert_eq!(TransactionState::default(), TransactionState::idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let mut timer = DismissTimer::new();
        timer.schedule(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert!(timer.is_armed());

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(!fired.load(Ordering::SeqCst));
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let mut timer = DismissTimer::new();
        timer.schedule(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert!(timer.cancel());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
        assert!(!timer.is_armed());
    }
}
