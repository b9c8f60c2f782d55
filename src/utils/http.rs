// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;

/// Create a configured asynchronous HTTP client.
pub fn create_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a URL and return the body of a successful response.
pub async fn get_text(client: &Client, url: &str) -> std::result::Result<String, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    response.text().await
}
