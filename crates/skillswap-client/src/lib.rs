// crates/skillswap-client/src/lib.rs
//
// skillswap-client: Application layer for the SkillSwap registry.
//
// Wires the storage layer into a single controller that owns the record
// set, the wallet session, the transaction banner, and the activity log,
// and broadcasts change events to whatever presentation layer sits on top.

pub mod activity;
pub mod config;
pub mod controller;
pub mod events;
pub mod orchestrator;
pub mod read_model;
pub mod transaction;
pub mod wallet;

// Re-export key types for ergonomic access from downstream crates.
pub use activity::{ActivityEntry, ActivityLog};
pub use config::ClientConfig;
pub use controller::SkillRegistryController;
pub use events::AppEvent;
pub use orchestrator::{OperationKind, TransactionOrchestrator};
pub use read_model::{CategoryFilter, CategoryStat, RegistryStats};
pub use transaction::{TransactionState, TxStatus};
pub use wallet::{ApprovalPolicy, LocalWallet, WriteRequest};
