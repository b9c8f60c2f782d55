// src/services/repology.rs

//! Repology projects API client.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::RepologyConfig;
use crate::services::{ProjectPage, ProjectSource};
use crate::utils::http;
use crate::utils::url::quote;

/// Client for the Repology `/api/v1/projects/` endpoint.
///
/// Only projects present in the linking repository are requested.
pub struct RepologyClient {
    client: Client,
    api_url: String,
    inrepo: String,
}

impl RepologyClient {
    /// Create a client from configuration.
    pub fn new(config: &RepologyConfig) -> Result<Self> {
        let client = http::create_client(&config.user_agent, config.timeout_secs)?;
        let source = Self::with_client(client, &config.api_url, &config.link_repo);
        Ok(source)
    }

    /// Create a client with an existing HTTP client.
    pub fn with_client(client: Client, api_url: &str, inrepo: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            inrepo: inrepo.to_string(),
        }
    }

    /// URL of the page starting at `cursor`.
    fn page_url(&self, cursor: Option<&str>) -> String {
        match cursor {
            None => format!("{}?inrepo={}", self.api_url, quote(&self.inrepo)),
            Some(name) => format!(
                "{}{}/?inrepo={}",
                self.api_url,
                quote(name),
                quote(&self.inrepo)
            ),
        }
    }
}

#[async_trait]
impl ProjectSource for RepologyClient {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ProjectPage> {
        let url = self.page_url(cursor);
        log::debug!("Fetching {url}");

        let body = http::get_text(&self.client, &url)
            .await
            .map_err(|e| AppError::source_fetch(format!("{url}: {e}")))?;

        serde_json::from_str(&body).map_err(|e| AppError::source_fetch(format!("{url}: {e}")))
    }
}
