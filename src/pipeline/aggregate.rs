// src/pipeline/aggregate.rs

//! Project aggregation over the paginated Repology feed.
//!
//! The feed is keyed by project name and paginated by the greatest name of
//! the previous page, which is included again at the start of the next
//! page. `ProjectPager` walks it as an explicit cursor and turns every page
//! into a batch of [`Project`]s.

use crate::error::Result;
use crate::models::Project;
use crate::services::ProjectSource;

/// Cursor over the project feed yielding one batch per page.
///
/// The sequence is finite and cannot be restarted.
pub struct ProjectPager<'a> {
    source: &'a dyn ProjectSource,
    to: Option<String>,
    cursor: Option<String>,
    continuation: bool,
    done: bool,
    seen: usize,
}

impl<'a> ProjectPager<'a> {
    /// Walk projects with names in `from..=to`; both bounds optional.
    pub fn new(source: &'a dyn ProjectSource, from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            source,
            to: to.map(String::from),
            cursor: from.map(String::from),
            continuation: false,
            done: false,
            seen: 0,
        }
    }

    /// Number of projects yielded so far.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Fetch the next batch of projects, `None` once the feed is exhausted.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Project>>> {
        while !self.done {
            let page = self.source.fetch_page(self.cursor.as_deref()).await?;

            // A continuation page only repeating the cursor means the end
            if page.is_empty() || (self.continuation && page.len() <= 1) {
                self.done = true;
                break;
            }

            let mut batch = Vec::with_capacity(page.len());
            for (name, packages) in &page {
                if self.continuation
                    && self
                        .cursor
                        .as_deref()
                        .is_some_and(|cursor| name.as_str() <= cursor)
                {
                    continue;
                }

                if self.to.as_deref().is_some_and(|to| name.as_str() > to) {
                    self.done = true;
                    break;
                }

                batch.push(Project::from_packages(name.as_str(), packages));

                if self.to.as_deref().is_some_and(|to| name.as_str() == to) {
                    self.done = true;
                    break;
                }
            }

            if !self.done {
                let last = page.keys().next_back().cloned();
                if self.continuation && last <= self.cursor {
                    log::warn!("Repology pagination stalled at {last:?}, stopping");
                    self.done = true;
                }
                self.cursor = last;
                self.continuation = true;
            }

            if !batch.is_empty() {
                self.seen += batch.len();
                return Ok(Some(batch));
            }
        }
        Ok(None)
    }
}
