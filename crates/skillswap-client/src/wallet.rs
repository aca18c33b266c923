// crates/skillswap-client/src/wallet.rs
//
// LocalWallet: a key-file backed wallet provider.
//
// Holds one ed25519 keypair as the active account, asks an approval policy
// before signing each write, and notifies subscribers when the active
// keypair is switched.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use skillswap_core::crypto::Keypair;
use skillswap_core::error::SkillError;
use skillswap_core::identity::{address_from_public_key, write_message, WriteAuthorization};
use skillswap_core::traits::{AccountsChangedHandler, WalletProvider};

/// What the signer is being asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub address: String,
    pub key: String,
    pub value_len: usize,
}

/// Interactive approval callback. Returns `true` to sign.
pub type Approver = Arc<dyn Fn(&WriteRequest) -> bool + Send + Sync>;

/// How the wallet decides whether to sign a write.
#[derive(Clone)]
pub enum ApprovalPolicy {
    /// Sign every request.
    AutoApprove,
    /// Decline every request (watch-only wallet).
    DenyAll,
    /// Ask a callback. The callback may block; it runs off the async runtime.
    Prompt(Approver),
}

impl fmt::Debug for ApprovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalPolicy::AutoApprove => write!(f, "AutoApprove"),
            ApprovalPolicy::DenyAll => write!(f, "DenyAll"),
            ApprovalPolicy::Prompt(_) => write!(f, "Prompt(..)"),
        }
    }
}

/// Wallet provider backed by an in-process keypair.
pub struct LocalWallet {
    keypair: RwLock<Keypair>,
    policy: ApprovalPolicy,
    handlers: Mutex<Vec<AccountsChangedHandler>>,
}

impl LocalWallet {
    pub fn new(keypair: Keypair, policy: ApprovalPolicy) -> Self {
        Self {
            keypair: RwLock::new(keypair),
            policy,
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Wallet with a freshly generated keypair.
    pub fn generate(policy: ApprovalPolicy) -> Self {
        Self::new(Keypair::generate(), policy)
    }

    /// Load the keypair from a hex-encoded secret key file.
    pub fn from_key_file(path: &str, policy: ApprovalPolicy) -> Result<Self, SkillError> {
        let secret = std::fs::read_to_string(path)
            .map_err(|e| SkillError::Crypto(format!("Could not read key file {}: {}", path, e)))?;
        Ok(Self::new(Keypair::from_secret_hex(&secret)?, policy))
    }

    /// Address of the active account.
    pub fn address(&self) -> String {
        let keypair = self.keypair.read().unwrap_or_else(|p| p.into_inner());
        address_from_public_key(&keypair.public_key_bytes())
    }

    /// Replace the active account and notify `on_accounts_changed` subscribers.
    pub fn switch_account(&self, keypair: Keypair) {
        {
            let mut active = self.keypair.write().unwrap_or_else(|p| p.into_inner());
            *active = keypair;
        }
        let accounts = vec![self.address()];
        tracing::info!("Wallet switched to {}", accounts[0]);

        let handlers: Vec<AccountsChangedHandler> = self
            .handlers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        for handler in handlers {
            handler(accounts.clone());
        }
    }

    async fn approve(&self, request: WriteRequest) -> Result<bool, SkillError> {
        match &self.policy {
            ApprovalPolicy::AutoApprove => Ok(true),
            ApprovalPolicy::DenyAll => Ok(false),
            ApprovalPolicy::Prompt(approver) => {
                let approver = approver.clone();
                tokio::task::spawn_blocking(move || approver(&request))
                    .await
                    .map_err(|e| SkillError::WriteFailed(format!("approval prompt failed: {}", e)))
            }
        }
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, SkillError> {
        Ok(vec![self.address()])
    }

    fn on_accounts_changed(&self, handler: AccountsChangedHandler) {
        self.handlers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(handler);
    }

    async fn authorize_write(
        &self,
        address: &str,
        key: &str,
        value: &[u8],
    ) -> Result<WriteAuthorization, SkillError> {
        let request = WriteRequest {
            address: address.to_string(),
            key: key.to_string(),
            value_len: value.len(),
        };
        if !self.approve(request).await? {
            tracing::info!("Signer declined write to {}", key);
            return Err(SkillError::UserRejected(format!("write to {} declined", key)));
        }

        let keypair = self.keypair.read().unwrap_or_else(|p| p.into_inner());
        let public_key = keypair.public_key_bytes();
        Ok(WriteAuthorization {
            signer: address_from_public_key(&public_key),
            public_key,
            signature: keypair.sign(&write_message(key, value)),
        })
    }
}
