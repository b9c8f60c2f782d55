//! Service layer for the reconciliation bot.
//!
//! This module contains the Repology side of the data flow:
//! - Project feed access (`ProjectSource`)
//! - The HTTP implementation (`RepologyClient`)

mod repology;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::PackageRecord;

pub use repology::RepologyClient;

/// One page of the project feed: project name to its packages.
pub type ProjectPage = BTreeMap<String, Vec<PackageRecord>>;

/// Trait for paginated project feeds.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Fetch the page starting at `cursor` (inclusive), or the first
    /// page when no cursor is given.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ProjectPage>;
}
