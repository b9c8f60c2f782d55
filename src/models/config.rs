//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Mapping;

/// Environment variable holding the Wikidata OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "WIKIDATA_ACCESS_TOKEN";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repology feed settings
    #[serde(default)]
    pub repology: RepologyConfig,

    /// Wikidata API settings
    #[serde(default)]
    pub wikidata: WikidataConfig,

    /// Reconciliation axes, in reporting order
    #[serde(default = "crate::models::default_mappings")]
    pub mappings: Vec<Mapping>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Fill secrets missing from the file with environment values.
    pub fn apply_env(&mut self) {
        if self.wikidata.access_token.is_none() {
            self.wikidata.access_token = std::env::var(ACCESS_TOKEN_ENV)
                .ok()
                .filter(|token| !token.trim().is_empty());
        }
    }

    /// Override every mapping's threshold.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        for mapping in &mut self.mappings {
            mapping.max_entries = max_entries;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.repology.user_agent.trim().is_empty() {
            return Err(AppError::config("repology.user_agent is empty"));
        }
        if self.wikidata.user_agent.trim().is_empty() {
            return Err(AppError::config("wikidata.user_agent is empty"));
        }
        if self.repology.timeout_secs == 0 || self.wikidata.timeout_secs == 0 {
            return Err(AppError::config("timeout_secs must be > 0"));
        }
        Url::parse(&self.repology.api_url)?;
        Url::parse(&self.wikidata.api_url)?;
        if !self.repology.api_url.ends_with('/') {
            return Err(AppError::config("repology.api_url must end with a slash"));
        }
        if self.repology.link_repo.trim().is_empty() {
            return Err(AppError::config("repology.link_repo is empty"));
        }
        if self.mappings.is_empty() {
            return Err(AppError::config("No mappings defined"));
        }

        let prop_re = Regex::new(r"^P[1-9][0-9]*$")
            .map_err(|e| AppError::config(format!("property pattern: {e}")))?;
        let mut seen = HashSet::new();

        for mapping in &self.mappings {
            let label = format!("mapping {} ({})", mapping.repo, mapping.prop);
            if mapping.repo.trim().is_empty() || mapping.field.trim().is_empty() {
                return Err(AppError::config(format!("{label}: empty repo or field")));
            }
            if !prop_re.is_match(&mapping.prop) {
                return Err(AppError::config(format!("{label}: invalid property id")));
            }
            if mapping.max_entries == 0 {
                return Err(AppError::config(format!("{label}: zero max_entries")));
            }
            if !mapping.url.contains("{}")
                || mapping.hist_urls.iter().any(|url| !url.contains("{}"))
            {
                return Err(AppError::config(format!(
                    "{label}: URL templates need a {{}} placeholder"
                )));
            }
            if !seen.insert((mapping.repo.as_str(), mapping.prop.as_str())) {
                return Err(AppError::config(format!("{label}: duplicate mapping")));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repology: RepologyConfig::default(),
            wikidata: WikidataConfig::default(),
            mappings: crate::models::default_mappings(),
        }
    }
}

/// Repology project feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepologyConfig {
    /// Projects API endpoint, must end with a slash
    #[serde(default = "defaults::repology_api_url")]
    pub api_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Repository whose package names are Wikidata item ids
    #[serde(default = "defaults::link_repo")]
    pub link_repo: String,
}

impl Default for RepologyConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::repology_api_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            link_repo: defaults::link_repo(),
        }
    }
}

/// Wikidata API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikidataConfig {
    /// MediaWiki action API endpoint
    #[serde(default = "defaults::wikidata_api_url")]
    pub api_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Summary attached to every edit
    #[serde(default = "defaults::edit_summary")]
    pub edit_summary: String,

    /// OAuth access token used for edits
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::wikidata_api_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            edit_summary: defaults::edit_summary(),
            access_token: None,
        }
    }
}

mod defaults {
    pub fn repology_api_url() -> String {
        "https://repology.org/api/v1/projects/".into()
    }
    pub fn wikidata_api_url() -> String {
        "https://www.wikidata.org/w/api.php".into()
    }
    pub fn user_agent() -> String {
        concat!("repology-wikidata-bot/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        60
    }
    pub fn link_repo() -> String {
        "wikidata".into()
    }
    pub fn edit_summary() -> String {
        "adding package information from Repology".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_property() {
        let mut config = Config::default();
        config.mappings[0].prop = "Q5".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let mut config = Config::default();
        config.mappings[0].hist_urls.push("https://example.com/".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_mapping() {
        let mut config = Config::default();
        let first = config.mappings[0].clone();
        config.mappings.push(first);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_api_url_without_slash() {
        let mut config = Config::default();
        config.repology.api_url = "https://repology.org/api/v1/projects".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_api_url() {
        let mut config = Config::default();
        config.wikidata.api_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn parse_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [repology]
            link_repo = "wikidata"

            [[mappings]]
            repo = "gentoo"
            prop = "P3499"
            url = "https://packages.gentoo.org/packages/{}"
            "#,
        )
        .unwrap();

        assert_eq!(config.mappings.len(), 1);
        assert_eq!(
            config.repology.api_url,
            "https://repology.org/api/v1/projects/"
        );
        assert_eq!(config.mappings[0].max_entries, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn set_max_entries_overrides_all_mappings() {
        let mut config = Config::default();
        config.set_max_entries(5);
        assert!(config.mappings.iter().all(|m| m.max_entries == 5));
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("/nonexistent/config.toml");
        assert_eq!(config.mappings, crate::models::default_mappings());
    }
}
