//! Exclusion list of Repology project names and Wikidata item ids.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};

/// Identifiers excluded from reconciliation.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    entries: HashSet<String>,
}

impl Blacklist {
    /// Parse newline-delimited identifiers; `#` starts a comment.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { entries }
    }

    /// Load a blacklist file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Cannot read blacklist {}: {e}", path.display()))
        })?;
        Ok(Self::parse(&content))
    }

    /// Add identifiers given directly (e.g. on the command line).
    pub fn extend<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.extend(ids.into_iter().map(Into::into));
    }

    /// Merge another blacklist into this one.
    pub fn merge(&mut self, other: Blacklist) {
        self.entries.extend(other.entries);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_strips_comments_and_blanks() {
        let text = "foo\n\n  bar  # linked to wrong item\n# only comment\nQ42#\n";
        let blacklist = Blacklist::parse(text);
        assert_eq!(blacklist.len(), 3);
        assert!(blacklist.contains("foo"));
        assert!(blacklist.contains("bar"));
        assert!(blacklist.contains("Q42"));
        assert!(!blacklist.contains("# only comment"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "python:foo # duplicate").unwrap();
        writeln!(file, "Q1").unwrap();

        let blacklist = Blacklist::load(file.path()).unwrap();
        assert!(blacklist.contains("python:foo"));
        assert!(blacklist.contains("Q1"));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Blacklist::load("/nonexistent/blacklist.txt").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_extend_and_merge() {
        let mut blacklist = Blacklist::parse("a");
        blacklist.extend(["b"]);
        blacklist.merge(Blacklist::parse("c\n"));
        assert_eq!(blacklist.len(), 3);
        assert!(!Blacklist::default().contains("a"));
        assert!(Blacklist::default().is_empty());
    }
}
