//! Classification of diff results into typed actions.
//!
//! Precedence for one project group:
//!
//! 1. More than one linking value: a single `MultipleLinkingValues`,
//!    no mapping is looked at.
//! 2. Per mapping, too many Repology values with something missing: a
//!    single `TooManyValues`, no add or remove for that mapping.
//! 3. Otherwise one `AddProperty` per missing value, one `NoValue` per
//!    "no value" statement and one `RemoveProperty` per extra value
//!    unless the mapping ignores missing values.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::{Action, ActionKind, Mapping, Project};
use crate::pipeline::diff::{ValueDiff, diff_mapping};
use crate::pipeline::index::LINK_FIELD;
use crate::store::{ClaimStore, ClaimValue};

/// Distinct linking values carried by a project group.
pub fn linking_values<'a>(projects: &'a [Project], link_repo: &str) -> BTreeSet<&'a str> {
    projects
        .iter()
        .flat_map(|project| project.values_iter(link_repo, LINK_FIELD))
        .collect()
}

/// Sorted names of a project group.
pub fn project_names(projects: &[Project]) -> Vec<String> {
    let names: BTreeSet<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    names.into_iter().map(String::from).collect()
}

/// Turn one mapping's diff into actions.
pub fn classify_mapping(
    item: &str,
    project_names: &[String],
    mapping: &Mapping,
    diff: &ValueDiff,
) -> Vec<Action> {
    let action = |kind| Action {
        item: item.to_string(),
        project_names: project_names.to_vec(),
        kind,
    };

    if diff.exceeds(mapping.max_entries) {
        return vec![action(ActionKind::TooManyValues {
            repo: mapping.repo.clone(),
            prop: mapping.prop.clone(),
            count: diff.source_count,
        })];
    }

    let mut actions = Vec::new();

    for value in &diff.missing {
        actions.push(action(ActionKind::AddProperty {
            repo: mapping.repo.clone(),
            prop: mapping.prop.clone(),
            value: value.clone(),
            url: mapping.value_url(value),
        }));
    }

    for claim in &diff.extra {
        match claim {
            ClaimValue::NoValue => actions.push(action(ActionKind::NoValue {
                repo: mapping.repo.clone(),
                prop: mapping.prop.clone(),
            })),
            ClaimValue::Value(_) if mapping.ignore_missing => {}
            ClaimValue::Value(value) => actions.push(action(ActionKind::RemoveProperty {
                repo: mapping.repo.clone(),
                prop: mapping.prop.clone(),
                value: value.clone(),
                url: mapping.value_url(value),
                history_urls: mapping.history_urls(value),
            })),
        }
    }

    actions
}

/// Classifier running every enabled mapping against the claim store.
pub struct Classifier<'a> {
    store: &'a dyn ClaimStore,
    mappings: Vec<&'a Mapping>,
    link_repo: &'a str,
}

impl<'a> Classifier<'a> {
    /// Create a classifier over the mappings selected by `filter`
    /// (repository names or property ids; empty selects all).
    pub fn new(
        store: &'a dyn ClaimStore,
        mappings: &'a [Mapping],
        filter: &[String],
        link_repo: &'a str,
    ) -> Self {
        Self {
            store,
            mappings: mappings
                .iter()
                .filter(|mapping| mapping.matches_filter(filter))
                .collect(),
            link_repo,
        }
    }

    /// Mappings in use, in declaration order.
    pub fn mappings(&self) -> &[&'a Mapping] {
        &self.mappings
    }

    /// Produce all actions for the projects linked to `item`.
    pub async fn classify_group(&self, item: &str, projects: &[Project]) -> Result<Vec<Action>> {
        let names = project_names(projects);

        if linking_values(projects, self.link_repo).len() > 1 {
            return Ok(vec![Action {
                item: item.to_string(),
                project_names: names,
                kind: ActionKind::MultipleLinkingValues,
            }]);
        }

        let mut actions = Vec::new();
        for mapping in &self.mappings {
            let diff = diff_mapping(self.store, item, projects, mapping).await?;
            actions.extend(classify_mapping(item, &names, mapping, &diff));
        }
        Ok(actions)
    }
}
