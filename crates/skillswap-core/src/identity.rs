// crates/skillswap-core/src/identity.rs

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crypto;
use crate::error::SkillError;
use crate::traits::WalletProvider;

/// Proof that a wallet approved one specific write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteAuthorization {
    /// Address of the approving account.
    pub signer: String,
    /// Public key the signature verifies under.
    pub public_key: [u8; 32],
    /// Ed25519 signature over `write_message(key, value)`.
    pub signature: Vec<u8>,
}

impl WriteAuthorization {
    /// Check the signature against the key/value pair it claims to cover.
    pub fn verify(&self, key: &str, value: &[u8]) -> Result<bool, SkillError> {
        crypto::verify_signature(&self.public_key, &write_message(key, value), &self.signature)
    }
}

/// Bytes a wallet signs to authorize a write: SHA-256(key || 0x00 || value).
pub fn write_message(key: &str, value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(key.len() + 1 + value.len());
    buf.extend_from_slice(key.as_bytes());
    buf.push(0);
    buf.extend_from_slice(value);
    crypto::hash_bytes(&buf).to_vec()
}

/// Derive a wallet address from an ed25519 public key:
/// `0x` + hex of the last 20 bytes of SHA-256(public key).
pub fn address_from_public_key(public_key: &[u8; 32]) -> String {
    let digest = crypto::hash_bytes(public_key);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// A connected wallet: the active address plus the provider that signs for it.
///
/// Owned by the presentation layer; the core reads the address to stamp
/// record owners and uses the provider to authorize writes.
#[derive(Clone)]
pub struct WalletSession {
    pub address: String,
    pub provider: Arc<dyn WalletProvider>,
}

impl WalletSession {
    pub fn new(address: String, provider: Arc<dyn WalletProvider>) -> Self {
        Self { address, provider }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
