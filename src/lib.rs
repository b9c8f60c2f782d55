// src/lib.rs

//! Repology to Wikidata reconciliation library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod reports;
pub mod services;
pub mod store;
pub mod utils;
