//! Utility functions and helpers.

pub mod http;
pub mod progress;
pub mod url;

pub use progress::Progress;
