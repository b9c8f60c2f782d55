//! Report renderers over aggregated report items.
//!
//! All renderers consume the same ordered `ReportItem` sequence, so the
//! text, HTML and JSON outputs list actions identically.

pub mod html;
pub mod text;

use crate::error::Result;
use crate::pipeline::ReportItem;
use crate::utils::url::quote;

pub use html::format_html_report;
pub use text::format_text_report;

/// Wikidata page of an item.
pub fn item_url(item: &str) -> String {
    format!("https://www.wikidata.org/wiki/{}", quote(item))
}

/// Repology page of a project.
pub fn project_url(name: &str) -> String {
    format!("https://repology.org/project/{}", quote(name))
}

/// Serialize report items as pretty-printed JSON.
pub fn format_json_report(items: &[ReportItem]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(items)?;
    json.push('\n');
    Ok(json)
}
