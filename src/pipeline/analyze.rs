// src/pipeline/analyze.rs

//! Analysis driver: feed enumeration, indexing and classification.
//!
//! Runs strictly before any reporting or writing. Every error here aborts
//! the run so no report is built over inconsistent state.

use crate::error::{AppError, Result};
use crate::models::{Action, Blacklist, Config};
use crate::pipeline::aggregate::ProjectPager;
use crate::pipeline::classify::Classifier;
use crate::pipeline::index::ProjectIndex;
use crate::services::ProjectSource;
use crate::store::ClaimStore;
use crate::utils::Progress;

/// Options for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// First project name to process (inclusive)
    pub from: Option<String>,
    /// Last project name to process (inclusive)
    pub to: Option<String>,
    /// Repositories or properties to check; empty checks all mappings
    pub repo_filter: Vec<String>,
    pub show_progress: bool,
}

/// Outcome of an analysis run.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub actions: Vec<Action>,
    pub projects_seen: usize,
    pub projects_indexed: usize,
    pub projects_excluded: usize,
    pub keys: usize,
}

/// Enumerate the feed, group projects by item and classify every group.
pub async fn run_analysis(
    source: &dyn ProjectSource,
    store: &dyn ClaimStore,
    config: &Config,
    blacklist: Blacklist,
    options: &AnalysisOptions,
) -> Result<Analysis> {
    if let (Some(from), Some(to)) = (&options.from, &options.to) {
        if from > to {
            return Err(AppError::validation(format!(
                "project range is empty: {from} sorts after {to}"
            )));
        }
    }

    let link_repo = config.repology.link_repo.as_str();

    log::info!("[STEP 1/2] Fetching Repology projects");
    let mut index = ProjectIndex::new(link_repo, blacklist);
    let mut pager = ProjectPager::new(source, options.from.as_deref(), options.to.as_deref());
    let mut progress = Progress::counting("Fetching projects", options.show_progress);

    while let Some(batch) = pager.next_batch().await? {
        progress.advance(batch.len());
        index.add_projects(batch);
    }
    progress.finish();

    log::info!(
        "Fetched {} projects, {} linked to {} items, {} excluded",
        pager.seen(),
        index.indexed_count(),
        index.len(),
        index.excluded_count()
    );

    log::info!("[STEP 2/2] Comparing with Wikidata");
    let classifier = Classifier::new(store, &config.mappings, &options.repo_filter, link_repo);
    if classifier.mappings().is_empty() {
        log::warn!(
            "No mapping matches {:?}, nothing to compare",
            options.repo_filter
        );
    }

    let keys = index.sorted_keys();
    let mut progress = Progress::new("Analyzing items", keys.len(), options.show_progress);
    let mut actions = Vec::new();

    for key in &keys {
        let projects = index.get(key).unwrap_or_default();
        log::debug!("Checking {key}");
        actions.extend(classifier.classify_group(key, projects).await?);
        progress.advance(1);
    }
    progress.finish();

    log::info!("Analysis produced {} actions", actions.len());

    Ok(Analysis {
        actions,
        projects_seen: pager.seen(),
        projects_indexed: index.indexed_count(),
        projects_excluded: index.excluded_count(),
        keys: keys.len(),
    })
}
