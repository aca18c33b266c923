// crates/skillswap-client/src/config.rs
//
// Runtime configuration for the registry client.
// Deserialized from the `[client]` table of the CLI config file, or
// populated with defaults.

use std::time::Duration;

use serde::Deserialize;

use skillswap_store::StoreKeys;

/// Client-side settings: store key layout, status timings, log bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Index key and record key prefix.
    #[serde(flatten)]
    pub keys: StoreKeys,

    /// How long a success status stays visible before returning to idle.
    #[serde(default = "default_success_dismiss_ms")]
    pub success_dismiss_ms: u64,

    /// How long an error status stays visible before returning to idle.
    #[serde(default = "default_error_dismiss_ms")]
    pub error_dismiss_ms: u64,

    /// Delay after a successful submission before the form is reset,
    /// measured from success. Clamped to at least `success_dismiss_ms`.
    #[serde(default = "default_form_reset_ms")]
    pub form_reset_ms: u64,

    /// Number of entries the activity log retains.
    #[serde(default = "default_activity_capacity")]
    pub activity_capacity: usize,

    /// How many fresh ids a submission tries before giving up on a collision.
    #[serde(default = "default_id_allocation_attempts")]
    pub id_allocation_attempts: u32,
}

fn default_success_dismiss_ms() -> u64 {
    2000
}

fn default_error_dismiss_ms() -> u64 {
    3000
}

fn default_form_reset_ms() -> u64 {
    2000
}

fn default_activity_capacity() -> usize {
    10
}

fn default_id_allocation_attempts() -> u32 {
    3
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            keys: StoreKeys::default(),
            success_dismiss_ms: default_success_dismiss_ms(),
            error_dismiss_ms: default_error_dismiss_ms(),
            form_reset_ms: default_form_reset_ms(),
            activity_capacity: default_activity_capacity(),
            id_allocation_attempts: default_id_allocation_attempts(),
        }
    }
}

impl ClientConfig {
    pub fn success_dismiss(&self) -> Duration {
        Duration::from_millis(self.success_dismiss_ms)
    }

    pub fn error_dismiss(&self) -> Duration {
        Duration::from_millis(self.error_dismiss_ms)
    }

    pub fn form_reset(&self) -> Duration {
        Duration::from_millis(self.form_reset_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.keys, StoreKeys::default());
        assert_eq!(config.success_dismiss(), Duration::from_secs(2));
        assert_eq!(config.error_dismiss(), Duration::from_secs(3));
        assert_eq!(config.activity_capacity, 10);
    }

    #[test]
    fn test_overrides_are_read() {
        let config: ClientConfig = toml::from_str(
            r#"
            index_key = "registry"
            record_key_prefix = "rec/"
            error_dismiss_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.keys.record_key("x"), "rec/x");
        assert_eq!(config.keys.index_key, "registry");
        assert_eq!(config.error_dismiss_ms, 500);
        assert_eq!(config.success_dismiss_ms, 2000);
    }
}
