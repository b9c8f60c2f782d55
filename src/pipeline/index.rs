//! Cross-reference index from Wikidata items to Repology projects.
//!
//! Several Repology projects may point to the same Wikidata item, so
//! projects are grouped by every linking value they carry.
//!
//! > Example: `{"Q698": [firefox, firefox-esr], "Q596034": [zsh]}`

use std::collections::HashMap;

use crate::models::{Blacklist, Project};

/// Field of the linking repository holding the item id.
pub const LINK_FIELD: &str = "name";

/// Builder grouping projects by linking key.
pub struct ProjectIndex {
    link_repo: String,
    blacklist: Blacklist,
    by_key: HashMap<String, Vec<Project>>,
    indexed: usize,
    excluded: usize,
}

impl ProjectIndex {
    /// Create an index keyed on `link_repo` package names.
    pub fn new(link_repo: impl Into<String>, blacklist: Blacklist) -> Self {
        Self {
            link_repo: link_repo.into(),
            blacklist,
            by_key: HashMap::new(),
            indexed: 0,
            excluded: 0,
        }
    }

    /// Add a project under each of its linking values.
    ///
    /// Returns false when the project was excluded or links nowhere.
    pub fn add_project(&mut self, project: Project) -> bool {
        let keys: Vec<String> = project
            .values_iter(&self.link_repo, LINK_FIELD)
            .map(String::from)
            .collect();

        if keys.is_empty() {
            return false;
        }

        if self.blacklist.contains(&project.name)
            || keys.iter().any(|key| self.blacklist.contains(key))
        {
            log::debug!("Skipping blacklisted project {}", project.name);
            self.excluded += 1;
            return false;
        }

        self.indexed += 1;
        for key in keys {
            self.by_key.entry(key).or_default().push(project.clone());
        }
        true
    }

    /// Add every project of a batch.
    pub fn add_projects(&mut self, projects: impl IntoIterator<Item = Project>) {
        for project in projects {
            self.add_project(project);
        }
    }

    /// Projects grouped under a key.
    pub fn get(&self, key: &str) -> Option<&[Project]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    /// Linking keys in lexicographic order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of distinct linking keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Number of projects indexed.
    pub fn indexed_count(&self) -> usize {
        self.indexed
    }

    /// Number of projects dropped by the blacklist.
    pub fn excluded_count(&self) -> usize {
        self.excluded
    }

    /// Repository holding the linking values.
    pub fn link_repo(&self) -> &str {
        &self.link_repo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PackageRecord;

    fn project(name: &str, items: &[&str]) -> Project {
        let packages: Vec<PackageRecord> = items
            .iter()
            .map(|item| PackageRecord {
                repo: "wikidata".into(),
                name: Some(item.to_string()),
                ..PackageRecord::default()
            })
            .collect();
        Project::from_packages(name, &packages)
    }

    #[test]
    fn test_groups_projects_sharing_item() {
        let mut index = ProjectIndex::new("wikidata", Blacklist::default());
        index.add_projects([
            project("firefox", &["Q698"]),
            project("firefox-esr", &["Q698"]),
            project("zsh", &["Q596034"]),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.indexed_count(), 3);
        let names: Vec<_> = index
            .get("Q698")
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["firefox", "firefox-esr"]);
        assert_eq!(index.sorted_keys(), vec!["Q596034", "Q698"]);
    }

    #[test]
    fn test_project_with_two_items_lands_in_both() {
        let mut index = ProjectIndex::new("wikidata", Blacklist::default());
        index.add_project(project("foo", &["Q1", "Q2"]));
        assert_eq!(index.get("Q1").unwrap().len(), 1);
        assert_eq!(index.get("Q2").unwrap().len(), 1);
        assert_eq!(index.indexed_count(), 1);
    }

    #[test]
    fn test_unlinked_project_is_ignored() {
        let mut index = ProjectIndex::new("wikidata", Blacklist::default());
        assert!(!index.add_project(project("orphan", &[])));
        assert!(index.is_empty());
        assert_eq!(index.excluded_count(), 0);
    }

    #[test]
    fn test_blacklist_by_project_or_item() {
        let mut index = ProjectIndex::new("wikidata", Blacklist::parse("bad-project\nQ13\n"));
        assert!(!index.add_project(project("bad-project", &["Q1"])));
        assert!(!index.add_project(project("good-name", &["Q13", "Q2"])));
        assert!(index.add_project(project("fine", &["Q3"])));

        assert_eq!(index.excluded_count(), 2);
        assert!(index.get("Q1").is_none());
        assert!(index.get("Q2").is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_custom_link_repo() {
        let mut index = ProjectIndex::new("other", Blacklist::default());
        assert!(!index.add_project(project("foo", &["Q1"])));
        assert_eq!(index.link_repo(), "other");
    }
}
