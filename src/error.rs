// src/error.rs

//! Unified error handling for the reconciliation bot.

use std::fmt;

use thiserror::Error;

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Reading the Repology project feed failed
    #[error("Repology fetch error: {0}")]
    SourceFetch(String),

    /// Reading claims from the target store failed
    #[error("Claim query failed for {item}: {message}")]
    StoreQuery { item: String, message: String },

    /// Writing a claim to the target store failed
    #[error("Claim edit failed for {item} ({prop}): {message}")]
    StoreMutate {
        item: String,
        prop: String,
        message: String,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client setup failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a feed fetch error.
    pub fn source_fetch(message: impl fmt::Display) -> Self {
        Self::SourceFetch(message.to_string())
    }

    /// Create a claim query error for an entity.
    pub fn store_query(item: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::StoreQuery {
            item: item.into(),
            message: message.to_string(),
        }
    }

    /// Create a claim edit error for an entity property.
    pub fn store_mutate(
        item: impl Into<String>,
        prop: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self::StoreMutate {
            item: item.into(),
            prop: prop.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
