// crates/skillswap-cli/src/output.rs
//
// Output formatting utilities for the SkillSwap CLI.
// Supports table and JSON output modes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled};

use skillswap_client::{ActivityEntry, RegistryStats, TransactionState, TxStatus};
use skillswap_core::record::{short_prefix, SkillRecord, MAX_RATING};

/// Output format for CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// A row in the skill listing.
#[derive(Tabled)]
pub struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Skill")]
    category: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Shared")]
    shared: String,
}

impl From<&SkillRecord> for RecordRow {
    fn from(record: &SkillRecord) -> Self {
        Self {
            id: record.id.clone(),
            category: record.category.to_string(),
            owner: format!("{}...", short_prefix(&record.owner, 10)),
            rating: stars(record.rating),
            shared: format_timestamp(record.timestamp),
        }
    }
}

/// A row in the category statistics table.
#[derive(Tabled)]
pub struct StatRow {
    #[tabled(rename = "Skill")]
    category: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

/// Rows for the statistics table, one per category.
pub fn stat_rows(stats: &RegistryStats) -> Vec<StatRow> {
    stats
        .categories
        .iter()
        .map(|s| StatRow {
            category: s.category.to_string(),
            count: s.count,
            share: format!("{:.1}%", s.percentage),
        })
        .collect()
}

/// A row in the activity table.
#[derive(Tabled)]
pub struct ActivityRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Activity")]
    text: String,
}

impl From<&ActivityEntry> for ActivityRow {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            time: entry.timestamp.clone(),
            text: entry.text.clone(),
        }
    }
}

/// Filled and hollow stars for a 0..=5 rating; "unrated" for 0.
pub fn stars(rating: u8) -> String {
    if rating == 0 {
        return "unrated".to_string();
    }
    let filled = rating.min(MAX_RATING) as usize;
    format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(MAX_RATING as usize - filled)
    )
}

/// Render unix seconds as `YYYY-MM-DD HH:MM` UTC.
pub fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// One-line rendering of the transaction banner, or `None` when hidden.
pub fn format_banner(state: &TransactionState) -> Option<String> {
    if state.is_idle() {
        return None;
    }
    let tag = match state.status {
        TxStatus::Pending => "pending",
        TxStatus::Success => "ok",
        TxStatus::Error => "error",
    };
    Some(format!("[{}] {}", tag, state.message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(0), "unrated");
        assert_eq!(stars(4), "★★★★☆");
        assert_eq!(stars(5), "★★★★★");
    }

    #[test]
    fn test_banner_hidden_when_idle() {
        assert_eq!(format_banner(&TransactionState::idle()), None);
        assert_eq!(
            format_banner(&TransactionState::error("Transaction rejected by user")).as_deref(),
            Some("[error] Transaction rejected by user")
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
    }
}
