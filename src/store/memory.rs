//! In-memory claim store.
//!
//! Holds claims in a map and records every accepted edit. Edits for
//! selected items can be made to fail, which exercises per-action error
//! isolation during the apply phase.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::store::{ClaimStore, ClaimValue};

#[derive(Debug, Clone)]
struct StoredClaim {
    value: ClaimValue,
    deprecated: bool,
}

/// An edit accepted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub item: String,
    pub prop: String,
    pub value: String,
    pub summary: String,
}

/// In-memory claim store backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    claims: Mutex<HashMap<(String, String), Vec<StoredClaim>>>,
    edits: Mutex<Vec<Edit>>,
    failing_items: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a current claim.
    pub fn with_claim(self, item: &str, prop: &str, value: &str) -> Self {
        self.insert(item, prop, ClaimValue::from(value), false);
        self
    }

    /// Add a deprecated (or expired) claim.
    pub fn with_deprecated_claim(self, item: &str, prop: &str, value: &str) -> Self {
        self.insert(item, prop, ClaimValue::from(value), true);
        self
    }

    /// Add a "no value" statement.
    pub fn with_no_value(self, item: &str, prop: &str) -> Self {
        self.insert(item, prop, ClaimValue::NoValue, false);
        self
    }

    /// Make every edit of `item` fail.
    pub fn fail_edits_for(mut self, item: &str) -> Self {
        self.failing_items.insert(item.to_string());
        self
    }

    /// Edits accepted so far, in order.
    pub fn edits(&self) -> Vec<Edit> {
        lock(&self.edits).clone()
    }

    fn insert(&self, item: &str, prop: &str, value: ClaimValue, deprecated: bool) {
        lock(&self.claims)
            .entry((item.to_string(), prop.to_string()))
            .or_default()
            .push(StoredClaim { value, deprecated });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ClaimStore for MemoryStore {
    async fn query(
        &self,
        item: &str,
        prop: &str,
        allow_deprecated: bool,
    ) -> Result<Vec<ClaimValue>> {
        let claims = lock(&self.claims);
        Ok(claims
            .get(&(item.to_string(), prop.to_string()))
            .map(|stored| {
                stored
                    .iter()
                    .filter(|claim| allow_deprecated || !claim.deprecated)
                    .map(|claim| claim.value.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn mutate(&self, item: &str, prop: &str, value: &str, summary: &str) -> Result<()> {
        if self.failing_items.contains(item) {
            return Err(AppError::store_mutate(item, prop, "edit rejected"));
        }

        self.insert(item, prop, ClaimValue::from(value), false);
        lock(&self.edits).push(Edit {
            item: item.to_string(),
            prop: prop.to_string(),
            value: value.to_string(),
            summary: summary.to_string(),
        });
        Ok(())
    }
}
