//! Wikidata claim store backed by the MediaWiki action API.
//!
//! Reads use `wbgetclaims`, writes use `wbcreateclaim` with a CSRF token
//! fetched through an OAuth bearer token. The claims of the most recently
//! read item are cached, since every mapping queries the same item twice.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::WikidataConfig;
use crate::store::{ClaimStore, ClaimValue};
use crate::utils::http;

/// Qualifier marking a claim as no longer valid.
const END_TIME_QUALIFIER: &str = "P582";

/// Token returned to anonymous sessions.
const ANONYMOUS_TOKEN: &str = "+\\";

type EntityClaims = HashMap<String, Vec<Statement>>;

/// Live Wikidata backend.
pub struct WikidataStore {
    client: Client,
    api_url: String,
    access_token: Option<String>,
    cache: Mutex<Option<(String, Arc<EntityClaims>)>>,
}

impl WikidataStore {
    /// Create a store from configuration.
    pub fn new(config: &WikidataConfig) -> Result<Self> {
        let client = http::create_client(&config.user_agent, config.timeout_secs)?;
        Ok(Self::with_client(
            client,
            &config.api_url,
            config.access_token.clone(),
        ))
    }

    /// Create a store with an existing HTTP client.
    pub fn with_client(client: Client, api_url: &str, access_token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            access_token,
            cache: Mutex::new(None),
        }
    }

    fn cache(&self) -> MutexGuard<'_, Option<(String, Arc<EntityClaims>)>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims of an item, served from cache when it was the last one read.
    async fn entity_claims(&self, item: &str) -> Result<Arc<EntityClaims>> {
        let cached = self
            .cache()
            .as_ref()
            .filter(|(cached_item, _)| cached_item == item)
            .map(|(_, claims)| Arc::clone(claims));
        if let Some(claims) = cached {
            return Ok(claims);
        }

        log::debug!("Fetching claims of {item}");
        let body = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "wbgetclaims"),
                ("entity", item),
                ("format", "json"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::store_query(item, e))?
            .text()
            .await
            .map_err(|e| AppError::store_query(item, e))?;

        let claims = Arc::new(parse_claims(item, &body)?);
        self.remember(item, Arc::clone(&claims));
        Ok(claims)
    }

    fn remember(&self, item: &str, claims: Arc<EntityClaims>) {
        *self.cache() = Some((item.to_string(), claims));
    }

    /// Drop cached claims of `item`, if they are the cached ones.
    fn invalidate(&self, item: &str) {
        let mut cache = self.cache();
        if cache.as_ref().is_some_and(|(cached, _)| cached == item) {
            *cache = None;
        }
    }

    async fn csrf_token(&self, access_token: &str) -> std::result::Result<String, String> {
        let body = self
            .client
            .get(&self.api_url)
            .bearer_auth(access_token)
            .query(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", "csrf"),
                ("format", "json"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| e.to_string())?
            .text()
            .await
            .map_err(|e| e.to_string())?;

        let response: TokenResponse = serde_json::from_str(&body).map_err(|e| e.to_string())?;
        if let Some(error) = response.error {
            return Err(error.to_string());
        }

        let token = response
            .query
            .map(|query| query.tokens.csrftoken)
            .ok_or("no csrf token in response")?;
        if token == ANONYMOUS_TOKEN {
            return Err("access token was not accepted".into());
        }
        Ok(token)
    }
}

#[async_trait]
impl ClaimStore for WikidataStore {
    async fn query(
        &self,
        item: &str,
        prop: &str,
        allow_deprecated: bool,
    ) -> Result<Vec<ClaimValue>> {
        let claims = self.entity_claims(item).await?;
        Ok(claims
            .get(prop)
            .map(|statements| {
                statements
                    .iter()
                    .filter(|statement| allow_deprecated || statement.is_current())
                    .filter_map(Statement::value)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn mutate(&self, item: &str, prop: &str, value: &str, summary: &str) -> Result<()> {
        let access_token = self
            .access_token
            .as_deref()
            .ok_or_else(|| AppError::store_mutate(item, prop, "no access token"))?;

        let csrf = self
            .csrf_token(access_token)
            .await
            .map_err(|e| AppError::store_mutate(item, prop, e))?;

        // String datavalues are sent JSON-encoded
        let encoded =
            serde_json::to_string(value).map_err(|e| AppError::store_mutate(item, prop, e))?;

        let body = self
            .client
            .post(&self.api_url)
            .bearer_auth(access_token)
            .form(&[
                ("action", "wbcreateclaim"),
                ("entity", item),
                ("property", prop),
                ("snaktype", "value"),
                ("value", encoded.as_str()),
                ("summary", summary),
                ("bot", "1"),
                ("format", "json"),
                ("token", csrf.as_str()),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::store_mutate(item, prop, e))?
            .text()
            .await
            .map_err(|e| AppError::store_mutate(item, prop, e))?;

        let response: EditResponse =
            serde_json::from_str(&body).map_err(|e| AppError::store_mutate(item, prop, e))?;
        if let Some(error) = response.error {
            return Err(AppError::store_mutate(item, prop, error));
        }

        self.invalidate(item);
        Ok(())
    }
}

/// Parse a `wbgetclaims` response body.
fn parse_claims(item: &str, body: &str) -> Result<EntityClaims> {
    let response: ClaimsResponse =
        serde_json::from_str(body).map_err(|e| AppError::store_query(item, e))?;
    if let Some(error) = response.error {
        return Err(AppError::store_query(item, error));
    }
    Ok(response.claims)
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.info)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsResponse {
    #[serde(default, deserialize_with = "object_or_empty_array")]
    claims: EntityClaims,
    #[serde(default)]
    error: Option<ApiError>,
}

/// The API encodes an empty claims object as `[]`.
fn object_or_empty_array<'de, D>(deserializer: D) -> std::result::Result<EntityClaims, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(values) if values.is_empty() => Ok(EntityClaims::new()),
        value => serde_json::from_value(value).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct Statement {
    mainsnak: Snak,
    #[serde(default)]
    rank: String,
    #[serde(default)]
    qualifiers: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Snak {
    snaktype: String,
    #[serde(default)]
    datavalue: Option<DataValue>,
}

#[derive(Debug, Deserialize)]
struct DataValue {
    value: Value,
}

impl Statement {
    /// Neither deprecated nor carrying an end time.
    fn is_current(&self) -> bool {
        self.rank != "deprecated" && !self.qualifiers.contains_key(END_TIME_QUALIFIER)
    }

    fn value(&self) -> Option<ClaimValue> {
        match self.mainsnak.snaktype.as_str() {
            "value" => self
                .mainsnak
                .datavalue
                .as_ref()
                .and_then(|datavalue| datavalue.value.as_str())
                .map(ClaimValue::from),
            "novalue" | "somevalue" => Some(ClaimValue::NoValue),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    query: Option<TokenQuery>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    tokens: Tokens,
}

#[derive(Debug, Deserialize)]
struct Tokens {
    csrftoken: String,
}

#[derive(Debug, Deserialize)]
struct EditResponse {
    #[serde(default)]
    error: Option<ApiError>,
}
