// src/models/mod.rs

//! Domain models for the reconciliation bot.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod action;
mod blacklist;
mod config;
mod mapping;
mod project;

// Re-export all public types
pub use action::{Action, ActionKind};
pub use blacklist::Blacklist;
pub use config::{ACCESS_TOKEN_ENV, Config, RepologyConfig, WikidataConfig};
pub use mapping::{Mapping, default_mappings};
pub use project::{NAME_FIELDS, PackageRecord, Project};
