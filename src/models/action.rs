// src/models/action.rs

//! Actions derived from comparing Repology with Wikidata.

use std::cmp::Ordering;

use serde::Serialize;

/// A proposed change or finding for one Wikidata item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Wikidata item id the action applies to
    pub item: String,

    /// Repology projects linked to the item, sorted
    pub project_names: Vec<String>,

    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Classification outcome of an action.
///
/// Variant order is the reporting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    /// Value packaged in Repology, absent from Wikidata (even deprecated)
    AddProperty {
        repo: String,
        prop: String,
        value: String,
        url: String,
    },

    /// Current Wikidata value not found in Repology
    RemoveProperty {
        repo: String,
        prop: String,
        value: String,
        url: String,
        history_urls: Vec<String>,
    },

    /// Wikidata holds a "no value" statement for the property
    NoValue { repo: String, prop: String },

    /// Too many Repology values to trust automatic edits
    TooManyValues {
        repo: String,
        prop: String,
        count: usize,
    },

    /// The project group links to more than one Wikidata item
    MultipleLinkingValues,
}

/// Fields compared, in order, when sorting actions of any kind.
type SortKey<'a> = (
    u8,
    Option<(&'a str, &'a str)>,
    Option<&'a str>,
    usize,
    Option<&'a str>,
    &'a [String],
);

impl ActionKind {
    /// Position of the variant in reporting order.
    pub fn rank(&self) -> u8 {
        match self {
            ActionKind::AddProperty { .. } => 0,
            ActionKind::RemoveProperty { .. } => 1,
            ActionKind::NoValue { .. } => 2,
            ActionKind::TooManyValues { .. } => 3,
            ActionKind::MultipleLinkingValues => 4,
        }
    }

    /// Short name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::AddProperty { .. } => "add_property",
            ActionKind::RemoveProperty { .. } => "remove_property",
            ActionKind::NoValue { .. } => "no_value",
            ActionKind::TooManyValues { .. } => "too_many_values",
            ActionKind::MultipleLinkingValues => "multiple_linking_values",
        }
    }

    /// Repository and property the action concerns, if any.
    pub fn repo_prop(&self) -> Option<(&str, &str)> {
        match self {
            ActionKind::AddProperty { repo, prop, .. }
            | ActionKind::RemoveProperty { repo, prop, .. }
            | ActionKind::NoValue { repo, prop }
            | ActionKind::TooManyValues { repo, prop, .. } => Some((repo, prop)),
            ActionKind::MultipleLinkingValues => None,
        }
    }

    /// Claim value the action concerns, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            ActionKind::AddProperty { value, .. } | ActionKind::RemoveProperty { value, .. } => {
                Some(value)
            }
            _ => None,
        }
    }

    fn url(&self) -> Option<&str> {
        match self {
            ActionKind::AddProperty { url, .. } | ActionKind::RemoveProperty { url, .. } => {
                Some(url)
            }
            _ => None,
        }
    }

    fn count(&self) -> usize {
        match self {
            ActionKind::TooManyValues { count, .. } => *count,
            _ => 0,
        }
    }

    fn history_urls(&self) -> &[String] {
        match self {
            ActionKind::RemoveProperty { history_urls, .. } => history_urls,
            _ => &[],
        }
    }

    /// Explicit comparison key: kind, repo, prop, value, then the rest.
    fn sort_key(&self) -> SortKey<'_> {
        (
            self.rank(),
            self.repo_prop(),
            self.value(),
            self.count(),
            self.url(),
            self.history_urls(),
        )
    }
}

impl Ord for ActionKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ActionKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Action {
    fn cmp(&self, other: &Self) -> Ordering {
        self.item
            .cmp(&other.item)
            .then_with(|| self.project_names.cmp(&other.project_names))
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for Action {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(repo: &str, value: &str) -> ActionKind {
        ActionKind::AddProperty {
            repo: repo.into(),
            prop: "P1".into(),
            value: value.into(),
            url: format!("https://example.com/{value}"),
        }
    }

    #[test]
    fn test_kind_rank_orders_by_declaration() {
        let mut kinds = vec![
            ActionKind::MultipleLinkingValues,
            ActionKind::TooManyValues {
                repo: "a".into(),
                prop: "P1".into(),
                count: 3,
            },
            ActionKind::NoValue {
                repo: "a".into(),
                prop: "P1".into(),
            },
            add("z", "z"),
        ];
        kinds.sort();
        let names: Vec<_> = kinds.iter().map(ActionKind::name).collect();
        assert_eq!(
            names,
            vec![
                "add_property",
                "no_value",
                "too_many_values",
                "multiple_linking_values",
            ]
        );
    }

    #[test]
    fn test_same_kind_orders_by_repo_then_value() {
        let mut kinds = vec![add("gentoo", "b"), add("arch", "z"), add("gentoo", "a")];
        kinds.sort();
        let values: Vec<_> = kinds.iter().filter_map(ActionKind::value).collect();
        assert_eq!(values, vec!["z", "a", "b"]);
    }

    #[test]
    fn test_serializes_with_action_tag() {
        let action = Action {
            item: "Q1".into(),
            project_names: vec!["foo".into()],
            kind: ActionKind::NoValue {
                repo: "gentoo".into(),
                prop: "P3499".into(),
            },
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "no_value");
        assert_eq!(json["item"], "Q1");
        assert_eq!(json["repo"], "gentoo");
    }
}
