//! Claim store abstractions for the Wikidata side of reconciliation.
//!
//! A store answers "which values does item X hold for property P" and
//! accepts new claims. Two backends exist:
//!
//! - `WikidataStore`: the live MediaWiki action API
//! - `MemoryStore`: in-process claims for tests and offline runs

pub mod memory;
pub mod wikidata;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use memory::{Edit, MemoryStore};
pub use wikidata::WikidataStore;

/// Value of a single claim as seen by the reconciler.
///
/// `NoValue` stands for an explicit "no value" (or "unknown value")
/// statement. It never compares equal to any package name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClaimValue {
    Value(String),
    NoValue,
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::Value(value) => Some(value),
            ClaimValue::NoValue => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::Value(value.to_string())
    }
}

/// Trait for claim store backends.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Claims of `item` for `prop`.
    ///
    /// Deprecated and expired claims are only included when
    /// `allow_deprecated` is set.
    async fn query(&self, item: &str, prop: &str, allow_deprecated: bool)
    -> Result<Vec<ClaimValue>>;

    /// Add a string claim to `item`.
    async fn mutate(&self, item: &str, prop: &str, value: &str, summary: &str) -> Result<()>;
}
