//! Reconciliation axes: which Repology repository field feeds which
//! Wikidata property.

use serde::{Deserialize, Serialize};

use crate::utils::url::substitute;

/// One Repology repository field paired with one Wikidata property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Repology repository name (e.g. "gentoo")
    pub repo: String,

    /// Wikidata property id (e.g. "P3499")
    pub prop: String,

    /// Package field providing the values
    #[serde(default = "default_field")]
    pub field: String,

    /// Package page URL, `{}` is replaced by the escaped value
    pub url: String,

    /// Package history URLs shown when a value needs investigation
    #[serde(default)]
    pub hist_urls: Vec<String>,

    /// Never report Wikidata values missing from Repology
    #[serde(default)]
    pub ignore_missing: bool,

    /// Skip the mapping for a project with more Repology values than this
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_field() -> String {
    "srcname".into()
}

fn default_max_entries() -> usize {
    50
}

impl Mapping {
    /// Mapping with default field selector and policies.
    pub fn new(repo: &str, prop: &str, url: &str) -> Self {
        Self {
            repo: repo.to_string(),
            prop: prop.to_string(),
            field: default_field(),
            url: url.to_string(),
            hist_urls: Vec::new(),
            ignore_missing: false,
            max_entries: default_max_entries(),
        }
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = field.to_string();
        self
    }

    pub fn with_hist_url(mut self, url: &str) -> Self {
        self.hist_urls.push(url.to_string());
        self
    }

    pub fn ignoring_missing(mut self) -> Self {
        self.ignore_missing = true;
        self
    }

    /// Package page URL for a value.
    pub fn value_url(&self, value: &str) -> String {
        substitute(&self.url, value)
    }

    /// History URLs for a value.
    pub fn history_urls(&self, value: &str) -> Vec<String> {
        self.hist_urls
            .iter()
            .map(|template| substitute(template, value))
            .collect()
    }

    /// Whether an allow-list entry selects this mapping by repo or property.
    pub fn matches_filter(&self, filter: &[String]) -> bool {
        filter.is_empty()
            || filter
                .iter()
                .any(|entry| *entry == self.repo || *entry == self.prop)
    }
}

/// Built-in mapping table, in reporting order.
pub fn default_mappings() -> Vec<Mapping> {
    vec![
        Mapping::new("arch", "P3454", "https://archlinux.org/packages/?q={}")
            .with_hist_url(
                "https://gitlab.archlinux.org/archlinux/packaging/packages/{}/-/commits/main",
            ),
        Mapping::new("aur", "P4162", "https://aur.archlinux.org/packages/{}")
            .with_hist_url("https://aur.archlinux.org/cgit/aur.git/log/?h={}"),
        Mapping::new(
            "debian_unstable",
            "P3442",
            "https://packages.debian.org/source/sid/{}",
        )
        .with_hist_url("https://tracker.debian.org/pkg/{}"),
        Mapping::new(
            "fedora_rawhide",
            "P3463",
            "https://src.fedoraproject.org/rpms/{}",
        )
        .with_hist_url("https://src.fedoraproject.org/rpms/{}/commits/rawhide"),
        Mapping::new("freebsd", "P7427", "https://www.freshports.org/{}")
            .with_hist_url("https://cgit.freebsd.org/ports/log/{}"),
        Mapping::new(
            "gentoo",
            "P3499",
            "https://packages.gentoo.org/packages/{}",
        )
        .with_hist_url("https://gitweb.gentoo.org/repo/gentoo.git/log/{}"),
        // Only additions for Ubuntu
        Mapping::new(
            "ubuntu_24_04",
            "P3473",
            "https://packages.ubuntu.com/source/noble/{}",
        )
        .ignoring_missing(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_url_escapes_value() {
        let mapping = Mapping::new(
            "gentoo",
            "P3499",
            "https://packages.gentoo.org/packages/{}",
        );
        assert_eq!(
            mapping.value_url("dev-libs/foo bar"),
            "https://packages.gentoo.org/packages/dev-libs/foo%20bar"
        );
    }

    #[test]
    fn test_history_urls_per_template() {
        let mapping = Mapping::new("aur", "P4162", "https://aur.archlinux.org/packages/{}")
            .with_hist_url("https://a.example/{}/log")
            .with_hist_url("https://b.example/?h={}");
        assert_eq!(
            mapping.history_urls("yay"),
            vec!["https://a.example/yay/log", "https://b.example/?h=yay"]
        );
    }

    #[test]
    fn test_matches_filter_by_repo_or_prop() {
        let mapping = Mapping::new("gentoo", "P3499", "https://example.com/{}");
        assert!(mapping.matches_filter(&[]));
        assert!(mapping.matches_filter(&["gentoo".to_string()]));
        assert!(mapping.matches_filter(&["P3499".to_string()]));
        let others = ["arch".to_string(), "P3454".to_string()];
        assert!(!mapping.matches_filter(&others));
    }

    #[test]
    fn test_default_table_is_well_formed() {
        let mappings = default_mappings();
        assert!(!mappings.is_empty());
        for mapping in &mappings {
            assert!(mapping.url.contains("{}"));
            assert!(mapping.prop.starts_with('P'));
            assert_eq!(mapping.max_entries, 50);
        }
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let text = "repo = \"gentoo\"\nprop = \"P3499\"\nurl = \"https://x/{}\"";
        let mapping: Mapping = toml::from_str(text).unwrap();
        assert_eq!(mapping.field, "srcname");
        assert_eq!(mapping.max_entries, 50);
        assert!(!mapping.ignore_missing);
        assert!(mapping.hist_urls.is_empty());
    }
}
