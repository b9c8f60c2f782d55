//! Diff calculation between Repology package names and Wikidata claims.
//!
//! For one item and one mapping, computes which Repology values are
//! missing from Wikidata and which Wikidata values are extra.
//!
//! Missing values are checked against all claims, deprecated and expired
//! included, so a value a human once deprecated is never re-added. Extra
//! values only consider current claims.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::{Mapping, Project};
use crate::store::{ClaimStore, ClaimValue};

/// Result of comparing one mapping for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueDiff {
    /// Number of distinct Repology values
    pub source_count: usize,
    /// In Repology, absent from every Wikidata claim
    pub missing: BTreeSet<String>,
    /// In current Wikidata claims, absent from Repology
    pub extra: BTreeSet<ClaimValue>,
}

impl ValueDiff {
    /// Check if there are any differences.
    pub fn has_changes(&self) -> bool {
        !self.missing.is_empty() || !self.extra.is_empty()
    }

    /// Whether the source side exceeds a mapping's threshold while
    /// something would be added.
    pub fn exceeds(&self, max_entries: usize) -> bool {
        !self.missing.is_empty() && self.source_count > max_entries
    }
}

/// Union of a mapping's field values over a project group.
pub fn source_values(projects: &[Project], mapping: &Mapping) -> BTreeSet<String> {
    projects
        .iter()
        .flat_map(|project| project.values_iter(&mapping.repo, &mapping.field))
        .map(String::from)
        .collect()
}

/// Compare source values with current and all target claims.
pub fn compute_diff(
    source: &BTreeSet<String>,
    current: &[ClaimValue],
    all: &[ClaimValue],
) -> ValueDiff {
    let known: BTreeSet<&str> = all.iter().filter_map(ClaimValue::as_str).collect();

    let missing = source
        .iter()
        .filter(|value| !known.contains(value.as_str()))
        .cloned()
        .collect();

    let extra = current
        .iter()
        .filter(|c| c.as_str().is_none_or(|v| !source.contains(v)))
        .cloned()
        .collect();

    ValueDiff {
        source_count: source.len(),
        missing,
        extra,
    }
}

/// Query the store and diff one mapping for one item.
pub async fn diff_mapping(
    store: &dyn ClaimStore,
    item: &str,
    projects: &[Project],
    mapping: &Mapping,
) -> Result<ValueDiff> {
    let source = source_values(projects, mapping);
    let current = store.query(item, &mapping.prop, false).await?;
    let all = store.query(item, &mapping.prop, true).await?;
    Ok(compute_diff(&source, &current, &all))
}
