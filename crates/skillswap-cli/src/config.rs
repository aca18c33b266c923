// crates/skillswap-cli/src/config.rs
//
// Configuration for the SkillSwap CLI.
// Loaded from a TOML file or populated with sensible defaults.

use std::fs;

use serde::{Deserialize, Serialize};

use skillswap_client::ClientConfig;
use skillswap_core::error::SkillError;

/// Which key/value backend the CLI opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Persistent RocksDB database under `data_dir`.
    Rocksdb,
    /// Process-local map; contents vanish on exit. Useful with `shell`.
    Memory,
}

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Directory for local data storage (RocksDB).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Store backend: "rocksdb" or "memory".
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overridden by `RUST_LOG` when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Path to the hex-encoded wallet secret key.
    #[serde(default = "default_wallet_key_path")]
    pub wallet_key_path: String,

    /// Sign writes without asking. When false, every write prompts on stdin.
    #[serde(default)]
    pub auto_approve: bool,

    /// Client settings: key layout, status timings, activity log size.
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_data_dir() -> String {
    "~/.skillswap/data".to_string()
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Rocksdb
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_wallet_key_path() -> String {
    "~/.skillswap/keys/wallet.secret".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_backend: default_store_backend(),
            log_level: default_log_level(),
            wallet_key_path: default_wallet_key_path(),
            auto_approve: false,
            client: ClientConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns `SkillError::Config` if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, SkillError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SkillError::Config(format!("cannot read {}: {}", path, e)))?;
        toml::from_str(&contents)
            .map_err(|e| SkillError::Config(format!("cannot parse {}: {}", path, e)))
    }

    /// RocksDB directory derived from `data_dir`.
    pub fn rocksdb_path(&self) -> String {
        format!("{}/registry_rocksdb", expand_tilde(&self.data_dir))
    }
}

/// Default config file written by `skillswap init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# SkillSwap CLI configuration

data_dir = "~/.skillswap/data"
store_backend = "rocksdb"
log_level = "info"
wallet_key_path = "~/.skillswap/keys/wallet.secret"
auto_approve = false

[client]
index_key = "skill_keys"
record_key_prefix = "skill_"
success_dismiss_ms = 2000
error_dismiss_ms = 3000
form_reset_ms = 2000
activity_capacity = 10
id_allocation_attempts = 3
"#;

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_matches_defaults() {
        let parsed: CliConfig = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        let defaults = CliConfig::default();
        assert_eq!(parsed.data_dir, defaults.data_dir);
        assert_eq!(parsed.store_backend, defaults.store_backend);
        assert_eq!(parsed.wallet_key_path, defaults.wallet_key_path);
        assert_eq!(parsed.client.keys, defaults.client.keys);
        assert_eq!(parsed.client.success_dismiss_ms, 2000);
        assert_eq!(parsed.client.activity_capacity, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: CliConfig = toml::from_str("store_backend = \"memory\"\n").unwrap();
        assert_eq!(parsed.store_backend, StoreBackend::Memory);
        assert_eq!(parsed.log_level, "info");
        assert!(!parsed.auto_approve);
        assert_eq!(parsed.client.keys.index_key, "skill_keys");
    }

    #[test]
    fn test_load_failures_are_config_errors() {
        let missing = std::env::temp_dir().join("skillswap_no_such_config.toml");
        let err = CliConfig::load(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SkillError::Config(_)));

        let bad = std::env::temp_dir().join(format!(
            "skillswap_bad_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&bad, "store_backend = \"floppy\"\n").unwrap();
        let err = CliConfig::load(bad.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SkillError::Config(ref m) if m.contains("cannot parse")));
        let _ = std::fs::remove_file(&bad);
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/lib/skillswap"), "/var/lib/skillswap");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_tilde("~/.skillswap"),
                format!("{}/.skillswap", home.display())
            );
        }
    }
}
