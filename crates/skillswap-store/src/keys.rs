// crates/skillswap-store/src/keys.rs
//
// Fixed key layout inside the key/value store.
//
//   - Index:  `{index_key}`            -> serialized registry index
//   - Record: `{record_key_prefix}{id}` -> serialized skill record

use serde::{Deserialize, Serialize};

/// Key layout shared by the index manager and the record accessor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreKeys {
    /// Well-known key holding the registry index.
    #[serde(default = "default_index_key")]
    pub index_key: String,

    /// Prefix joined with a record id to form its key.
    #[serde(default = "default_record_key_prefix")]
    pub record_key_prefix: String,
}

fn default_index_key() -> String {
    "skill_keys".to_string()
}

fn default_record_key_prefix() -> String {
    "skill_".to_string()
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            index_key: default_index_key(),
            record_key_prefix: default_record_key_prefix(),
        }
    }
}

impl StoreKeys {
    /// Build the record key for an identifier: `{prefix}{id}`.
    pub fn record_key(&self, id: &str) -> String {
        format!("{}{}", self.record_key_prefix, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let keys = StoreKeys::default();
        assert_eq!(keys.index_key, "skill_keys");
        assert_eq!(keys.record_key("170-abc"), "skill_170-abc");
    }
}
