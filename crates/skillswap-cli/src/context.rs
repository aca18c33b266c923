// crates/skillswap-cli/src/context.rs
//
// Shared wiring for commands: opens the configured store, loads the wallet
// from its key file, and builds the registry controller.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use skillswap_client::{ApprovalPolicy, LocalWallet, SkillRegistryController, WriteRequest};
use skillswap_core::traits::KeyValueStore;
use skillswap_store::{InMemoryStore, RocksKvStore};

use crate::config::{expand_tilde, CliConfig, StoreBackend};
use crate::output::OutputFormat;

/// Everything a command needs: parsed config plus output mode.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: CliConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: CliConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Open the configured key/value backend.
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
        match self.config.store_backend {
            StoreBackend::Rocksdb => {
                let path = self.config.rocksdb_path();
                std::fs::create_dir_all(expand_tilde(&self.config.data_dir))?;
                let store = RocksKvStore::open(&path)?;
                tracing::debug!("Opened RocksDB store at {}", path);
                Ok(Arc::new(store))
            }
            StoreBackend::Memory => {
                tracing::debug!("Using in-memory store; data will not persist");
                Ok(Arc::new(InMemoryStore::new()))
            }
        }
    }

    /// Build a controller over the configured store. No wallet is connected.
    pub fn controller(&self) -> Result<SkillRegistryController, Box<dyn std::error::Error>> {
        Ok(SkillRegistryController::new(
            self.open_store()?,
            self.config.client.clone(),
        ))
    }

    /// Build a controller and connect the wallet from the key file.
    pub async fn connected_controller(
        &self,
    ) -> Result<SkillRegistryController, Box<dyn std::error::Error>> {
        let controller = self.controller()?;
        let wallet = self.load_wallet()?;
        controller.connect_wallet(Arc::new(wallet)).await?;
        Ok(controller)
    }

    /// Load the wallet from `wallet_key_path`.
    pub fn load_wallet(&self) -> Result<LocalWallet, Box<dyn std::error::Error>> {
        let path = expand_tilde(&self.config.wallet_key_path);
        if !Path::new(&path).exists() {
            return Err(format!(
                "No wallet found at {}. Run `skillswap wallet create` first.",
                path
            )
            .into());
        }
        Ok(LocalWallet::from_key_file(&path, self.approval_policy())?)
    }

    fn approval_policy(&self) -> ApprovalPolicy {
        if self.config.auto_approve {
            ApprovalPolicy::AutoApprove
        } else {
            ApprovalPolicy::Prompt(Arc::new(prompt_on_stdin))
        }
    }
}

/// Ask on the terminal whether to sign a write.
fn prompt_on_stdin(request: &WriteRequest) -> bool {
    print!(
        "Sign write to '{}' ({} bytes) as {}? [y/N] ",
        request.key, request.value_len, request.address
    );
    let _ = io::stdout().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
