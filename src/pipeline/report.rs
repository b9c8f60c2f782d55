//! Grouping of actions into deterministic report items.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Action;

/// All actions for one Wikidata item and its linked projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    pub item: String,
    pub project_names: Vec<String>,
    pub actions: Vec<Action>,
}

/// Group actions by (item, project names), both groups and actions sorted.
///
/// Any permutation of the same actions yields the same report.
pub fn aggregate_report(actions: impl IntoIterator<Item = Action>) -> Vec<ReportItem> {
    let mut by_item: BTreeMap<(String, Vec<String>), Vec<Action>> = BTreeMap::new();

    for action in actions {
        by_item
            .entry((action.item.clone(), action.project_names.clone()))
            .or_default()
            .push(action);
    }

    by_item
        .into_iter()
        .filter(|(_, actions)| !actions.is_empty())
        .map(|((item, project_names), mut actions)| {
            actions.sort();
            ReportItem {
                item,
                project_names,
                actions,
            }
        })
        .collect()
}

/// Number of actions per kind, keyed by kind name.
pub fn count_by_kind(items: &[ReportItem]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for action in items.iter().flat_map(|item| &item.actions) {
        *counts.entry(action.kind.name()).or_insert(0) += 1;
    }
    counts
}

/// Total number of actions in a report.
pub fn action_count(items: &[ReportItem]) -> usize {
    items.iter().map(|item| item.actions.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActionKind;

    fn action(item: &str, projects: &[&str], kind: ActionKind) -> Action {
        Action {
            item: item.into(),
            project_names: projects.iter().map(|p| p.to_string()).collect(),
            kind,
        }
    }

    fn add(value: &str) -> ActionKind {
        ActionKind::AddProperty {
            repo: "gentoo".into(),
            prop: "P3499".into(),
            value: value.into(),
            url: format!("https://packages.gentoo.org/packages/{value}"),
        }
    }

    fn no_value() -> ActionKind {
        ActionKind::NoValue {
            repo: "arch".into(),
            prop: "P3454".into(),
        }
    }

    fn sample() -> Vec<Action> {
        vec![
            action("Q2", &["zsh"], no_value()),
            action("Q1", &["foo"], add("b")),
            action("Q2", &["zsh"], add("app-shells/zsh")),
            action("Q1", &["foo"], add("a")),
            action("Q1", &["foo", "foo-bin"], ActionKind::MultipleLinkingValues),
        ]
    }

    #[test]
    fn test_groups_and_sorts() {
        let report = aggregate_report(sample());

        let keys: Vec<_> = report
            .iter()
            .map(|item| (item.item.as_str(), item.project_names.join(",")))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Q1", "foo".to_string()),
                ("Q1", "foo,foo-bin".to_string()),
                ("Q2", "zsh".to_string()),
            ]
        );

        let values: Vec<_> = report[0]
            .actions
            .iter()
            .filter_map(|a| a.kind.value())
            .collect();
        assert_eq!(values, vec!["a", "b"]);
        assert_eq!(report[2].actions[0].kind.name(), "add_property");
        assert_eq!(report[2].actions[1].kind.name(), "no_value");
    }

    #[test]
    fn test_permutations_aggregate_identically() {
        let forward = aggregate_report(sample());
        let mut reversed_input = sample();
        reversed_input.reverse();
        let reversed = aggregate_report(reversed_input);
        let mut rotated_input = sample();
        rotated_input.rotate_left(2);
        let rotated = aggregate_report(rotated_input);

        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_report(Vec::new()).is_empty());
    }

    #[test]
    fn test_counts() {
        let report = aggregate_report(sample());
        assert_eq!(action_count(&report), 5);
        let counts = count_by_kind(&report);
        assert_eq!(counts["add_property"], 3);
        assert_eq!(counts["no_value"], 1);
        assert_eq!(counts["multiple_linking_values"], 1);
    }
}
