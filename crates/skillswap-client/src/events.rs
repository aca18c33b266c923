// crates/skillswap-client/src/events.rs
//
// Change notifications broadcast from the controller to observers.
//
// The controller publishes events on a tokio broadcast channel. The
// presentation layer subscribes and re-renders from the controller's
// read-only accessors.

use crate::activity::ActivityEntry;
use crate::transaction::TransactionState;

/// Events emitted whenever observable application state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The record set was replaced by a fresh load.
    RecordsReloaded {
        /// Number of records in the new set.
        count: usize,
    },
    /// A load cycle failed; the previous record set is kept.
    LoadFailed { message: String },
    /// The transaction banner changed.
    TransactionChanged(TransactionState),
    /// An activity log entry was added.
    ActivityRecorded(ActivityEntry),
    /// The wallet session was connected, switched, or dropped.
    SessionChanged { address: Option<String> },
    /// A successful submission's form should be cleared and closed.
    SubmissionFormReset,
}
