// crates/skillswap-core/src/lib.rs
//
// skillswap-core: Core types, traits, and codec for the SkillSwap registry.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the skill record model, the error type, the byte-level record
// and index encodings, wallet crypto helpers, and the collaborator traits
// (key/value store, wallet provider, payload cipher).

pub mod codec;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod record;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use skillswap_core::SkillRecord;`

// Record types
pub use record::{generate_record_id, SkillCategory, SkillDraft, SkillRecord, MAX_RATING};

// Codec
pub use codec::PlaceholderCipher;

// Identity types
pub use identity::{WalletSession, WriteAuthorization};

// Error type
pub use error::SkillError;

// Traits
pub use traits::{AccountsChangedHandler, KeyValueStore, PayloadCipher, WalletProvider, WriteReceipt};
