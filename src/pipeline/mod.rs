//! Pipeline stages of a reconciliation run.
//!
//! - `aggregate`: Walk the paginated Repology feed into projects
//! - `index`: Group projects by Wikidata item
//! - `diff`: Compare Repology values with Wikidata claims per mapping
//! - `classify`: Turn differences into actions
//! - `report`: Group and order actions for rendering
//! - `perform`: Apply additions to Wikidata
//! - `analyze`: Drive the analysis steps end to end

pub mod aggregate;
pub mod analyze;
pub mod classify;
pub mod diff;
pub mod index;
pub mod perform;
pub mod report;

pub use analyze::{Analysis, AnalysisOptions, run_analysis};
pub use perform::{ActionPerformer, ApplySummary, is_performable};
pub use report::{ReportItem, aggregate_report};
