//! Application of report actions to the claim store.
//!
//! Only additions are applied automatically; every other action needs a
//! human decision and stays report-only. Each action is applied on its own
//! so one failed edit does not stop the rest.

use crate::error::Result;
use crate::models::{Action, ActionKind};
use crate::pipeline::report::ReportItem;
use crate::store::ClaimStore;

/// Outcome of an apply run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Whether an action has a safe automated remediation.
pub fn is_performable(action: &Action) -> bool {
    matches!(action.kind, ActionKind::AddProperty { .. })
}

/// Applies performable actions through a claim store.
pub struct ActionPerformer<'a> {
    store: &'a dyn ClaimStore,
    summary: String,
}

impl<'a> ActionPerformer<'a> {
    /// Create a performer attaching `summary` to every edit.
    pub fn new(store: &'a dyn ClaimStore, summary: impl Into<String>) -> Self {
        Self {
            store,
            summary: summary.into(),
        }
    }

    /// Apply a single action; returns false when it is not performable.
    pub async fn perform(&self, action: &Action) -> Result<bool> {
        match &action.kind {
            ActionKind::AddProperty { prop, value, .. } => {
                self.store
                    .mutate(&action.item, prop, value, &self.summary)
                    .await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Apply every performable action of a report, isolating failures.
    pub async fn perform_all(&self, items: &[ReportItem]) -> ApplySummary {
        let mut summary = ApplySummary::default();

        for action in items.iter().flat_map(|item| &item.actions) {
            if !is_performable(action) {
                summary.skipped += 1;
                continue;
            }

            match self.perform(action).await {
                Ok(_) => {
                    summary.applied += 1;
                    if let Some(value) = action.kind.value() {
                        log::info!("{}: added {}", action.item, value);
                    }
                }
                Err(error) => {
                    summary.failed += 1;
                    log::error!("{error}");
                }
            }
        }

        summary
    }
}
