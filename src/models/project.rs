// src/models/project.rs

//! Repology package records and per-project value tables.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Package fields that carry a name worth reconciling.
pub const NAME_FIELDS: [&str; 3] = ["name", "srcname", "binname"];

/// A single package entry of a Repology project.
///
/// Only the repository and name-bearing fields are kept, every other
/// field of the API response is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub repo: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binname: Option<String>,
}

impl PackageRecord {
    /// Value of a name-bearing field, if present.
    pub fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "srcname" => self.srcname.as_deref(),
            "binname" => self.binname.as_deref(),
            _ => None,
        }
    }
}

/// A Repology project with package names grouped by (repository, field).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    values_by_repo_field: BTreeMap<(String, String), BTreeSet<String>>,
}

impl Project {
    /// Build a project from its raw package list.
    ///
    /// Records lacking a field are skipped for that field only.
    pub fn from_packages(name: impl Into<String>, packages: &[PackageRecord]) -> Self {
        let mut values_by_repo_field: BTreeMap<(String, String), BTreeSet<String>> =
            BTreeMap::new();

        for package in packages {
            for field in NAME_FIELDS {
                if let Some(value) = package.field(field) {
                    values_by_repo_field
                        .entry((package.repo.clone(), field.to_string()))
                        .or_default()
                        .insert(value.to_string());
                }
            }
        }

        Self {
            name: name.into(),
            values_by_repo_field,
        }
    }

    /// Values collected for a repository field, if any.
    pub fn values(&self, repo: &str, field: &str) -> Option<&BTreeSet<String>> {
        self.values_by_repo_field
            .get(&(repo.to_string(), field.to_string()))
    }

    /// Values collected for a repository field; empty when absent.
    pub fn values_iter<'a>(&'a self, repo: &str, field: &str) -> impl Iterator<Item = &'a str> {
        self.values(repo, field)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}
