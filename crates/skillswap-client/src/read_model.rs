// crates/skillswap-client/src/read_model.rs
//
// Read-only views over the loaded record set: search, category filter,
// and per-category statistics. Pure; no I/O.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use skillswap_core::error::SkillError;
use skillswap_core::record::{SkillCategory, SkillRecord};

/// Category selector for the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(SkillCategory),
}

impl CategoryFilter {
    fn matches(&self, category: SkillCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

/// Records matching `search` and `filter`, in the set's existing order.
///
/// `search` is a case-insensitive substring matched against the category
/// name and the owner address; an empty term matches everything.
pub fn filter_records(
    records: &[SkillRecord],
    search: &str,
    filter: CategoryFilter,
) -> Vec<SkillRecord> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|r| {
            let matches_search = r.category.as_str().to_lowercase().contains(&needle)
                || r.owner.to_lowercase().contains(&needle);
            matches_search && filter.matches(r.category)
        })
        .cloned()
        .collect()
}

/// Count and share of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: SkillCategory,
    pub count: usize,
    /// 0.0..=100.0
    pub percentage: f64,
}

/// Per-category breakdown of the whole record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStats {
    pub total: usize,
    pub categories: Vec<CategoryStat>,
}

impl RegistryStats {
    pub fn get(&self, category: SkillCategory) -> Option<&CategoryStat> {
        self.categories.iter().find(|s| s.category == category)
    }
}

/// Per-category counts and percentages. The divisor is floored at 1, so an
/// empty set reports 0% everywhere.
pub fn category_stats(records: &[SkillRecord]) -> RegistryStats {
    let total = records.len();
    let divisor = total.max(1) as f64;

    let categories = SkillCategory::ALL
        .into_iter()
        .map(|category| {
            let count = records.iter().filter(|r| r.category == category).count();
            CategoryStat {
                category,
                count,
                percentage: count as f64 / divisor * 100.0,
            }
        })
        .collect();

    RegistryStats { total, categories }
}
