//! Plain text report, optionally colorized.

use std::fmt::Write;

use colored::Colorize;

use crate::models::ActionKind;
use crate::pipeline::ReportItem;
use crate::reports::{item_url, project_url};

/// Role of a report fragment, mapped to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Url,
    Add,
    Remove,
    Skipped,
}

/// Color `text` for its tone, or return it unchanged.
pub fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Url => text.bright_blue().to_string(),
        Tone::Add => text.bright_green().to_string(),
        Tone::Remove => text.bright_red().to_string(),
        Tone::Skipped => text.bright_magenta().to_string(),
    }
}

struct TextFormatter {
    verbose: bool,
    color: bool,
}

impl TextFormatter {
    fn linked(&self, value: String, url: &str) -> String {
        if self.verbose {
            format!("{value} ({})", paint(url, Tone::Url, self.color))
        } else {
            value
        }
    }

    fn header(&self, item: &ReportItem) -> String {
        let projects: Vec<String> = item
            .project_names
            .iter()
            .map(|name| self.linked(name.clone(), &project_url(name)))
            .collect();
        format!(
            "===> {} / {}",
            self.linked(item.item.clone(), &item_url(&item.item)),
            projects.join(",")
        )
    }

    fn action(&self, kind: &ActionKind) -> String {
        let body = match kind {
            ActionKind::AddProperty { value, url, .. } => {
                let value = paint(value, Tone::Add, self.color);
                format!("adding {}", self.linked(value, url))
            }
            ActionKind::RemoveProperty {
                value,
                url,
                history_urls,
                ..
            } => {
                let mut text = format!(
                    "{} not present in Repology, needs investigation; see following urls:",
                    self.linked(paint(value, Tone::Remove, self.color), url)
                );
                for history_url in history_urls {
                    let _ = write!(text, "\n  {}", paint(history_url, Tone::Url, self.color));
                }
                text
            }
            ActionKind::NoValue { .. } => {
                let text = paint("no value", Tone::Remove, self.color);
                format!("{text} encountered, please remove")
            }
            ActionKind::TooManyValues { count, .. } => paint(
                &format!("too many ({count}) packages in Repology, skipping"),
                Tone::Skipped,
                self.color,
            ),
            ActionKind::MultipleLinkingValues => paint(
                "multiple wikidata items for project, skipping",
                Tone::Skipped,
                self.color,
            ),
        };

        match kind.repo_prop() {
            Some((repo, prop)) => format!("{repo} ({prop}): {body}"),
            None => body,
        }
    }
}

/// Render report items as text; `verbose` appends URLs.
pub fn format_text_report(items: &[ReportItem], verbose: bool, color: bool) -> String {
    let formatter = TextFormatter { verbose, color };
    let mut out = String::new();

    for item in items {
        let _ = writeln!(out, "{}", formatter.header(item));
        for action in &item.actions {
            let _ = writeln!(out, "{}", formatter.action(&action.kind));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;

    fn item(kinds: Vec<ActionKind>) -> ReportItem {
        let project_names = vec!["firefox".to_string(), "firefox-esr".to_string()];
        ReportItem {
            item: "Q698".into(),
            project_names: project_names.clone(),
            actions: kinds
                .into_iter()
                .map(|kind| Action {
                    item: "Q698".into(),
                    project_names: project_names.clone(),
                    kind,
                })
                .collect(),
        }
    }

    fn sample() -> ReportItem {
        item(vec![
            ActionKind::AddProperty {
                repo: "gentoo".into(),
                prop: "P3499".into(),
                value: "www-client/firefox".into(),
                url: "https://packages.gentoo.org/packages/www-client/firefox".into(),
            },
            ActionKind::RemoveProperty {
                repo: "arch".into(),
                prop: "P3454".into(),
                value: "firefox-old".into(),
                url: "https://archlinux.org/packages/?q=firefox-old".into(),
                history_urls: vec!["https://example.com/log/firefox-old".into()],
            },
            ActionKind::NoValue {
                repo: "aur".into(),
                prop: "P4162".into(),
            },
            ActionKind::TooManyValues {
                repo: "freebsd".into(),
                prop: "P7427".into(),
                count: 51,
            },
        ])
    }

    #[test]
    fn test_plain_report() {
        let text = format_text_report(&[sample()], false, false);
        let expected = "\
===> Q698 / firefox,firefox-esr
gentoo (P3499): adding www-client/firefox
arch (P3454): firefox-old not present in Repology, needs investigation; see following urls:
  https://example.com/log/firefox-old
aur (P4162): no value encountered, please remove
freebsd (P7427): too many (51) packages in Repology, skipping
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_verbose_report_has_urls() {
        let text = format_text_report(&[sample()], true, false);
        let first = text.lines().next().unwrap();
        assert_eq!(
            first,
            "===> Q698 (https://www.wikidata.org/wiki/Q698) / \
             firefox (https://repology.org/project/firefox),\
             firefox-esr (https://repology.org/project/firefox-esr)"
        );
        assert!(text.contains(
            "adding www-client/firefox (https://packages.gentoo.org/packages/www-client/firefox)"
        ));
    }

    #[test]
    fn test_ambiguity_has_no_prefix() {
        let items = [item(vec![ActionKind::MultipleLinkingValues])];
        let text = format_text_report(&items, false, false);
        assert_eq!(
            text.lines().nth(1),
            Some("multiple wikidata items for project, skipping")
        );
    }

    #[test]
    fn test_paint_without_color_is_identity() {
        assert_eq!(paint("x", Tone::Add, false), "x");
    }
}
