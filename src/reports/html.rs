//! Standalone HTML report.
//!
//! One row group per item: the item and project cells span every action
//! row, and each action cell is styled by kind.

use std::fmt::Write;

use crate::models::ActionKind;
use crate::pipeline::ReportItem;
use crate::reports::{item_url, project_url};

const TITLE: &str = "Repology wikidata bot report";
const STYLESHEET: &str = "https://stackpath.bootstrapcdn.com/bootstrap/4.3.1/css/bootstrap.min.css";

/// Escape text for HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn link(url: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(url), escape(text))
}

fn prefixed(kind: &ActionKind, body: String) -> String {
    match kind.repo_prop() {
        Some((repo, prop)) => format!("{} ({}): {body}", escape(repo), escape(prop)),
        None => body,
    }
}

/// Table cell for one action.
fn action_cell(kind: &ActionKind) -> String {
    let (class, body) = match kind {
        ActionKind::AddProperty { value, url, .. } => {
            ("table-success", format!("adding {}", link(url, value)))
        }
        ActionKind::RemoveProperty {
            value,
            url,
            history_urls,
            ..
        } => {
            let mut body = format!(
                "{} not present in Repology, needs investigation; see following urls:",
                link(url, value)
            );
            for (n, history_url) in history_urls.iter().enumerate() {
                let _ = write!(body, " {}", link(history_url, &format!("[{}]", n + 1)));
            }
            ("table-danger", body)
        }
        ActionKind::NoValue { .. } => (
            "table-warning",
            "<b>no value</b> encountered, please remove".to_string(),
        ),
        ActionKind::TooManyValues { count, .. } => (
            "table-warning",
            format!("too many ({count}) packages in Repology, skipping"),
        ),
        ActionKind::MultipleLinkingValues => (
            "table-danger",
            "multiple wikidata items for project, skipping".to_string(),
        ),
    };
    format!("<td class=\"{class}\">{}</td>", prefixed(kind, body))
}

/// Render report items as a complete HTML document.
pub fn format_html_report(items: &[ReportItem]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{TITLE}</title>");
    let _ = writeln!(out, "<link rel=\"stylesheet\" href=\"{STYLESHEET}\">");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<div class=\"container\">");
    let _ = writeln!(out, "<h1>{TITLE}</h1>");
    let _ = writeln!(out, "<table class=\"table table-sm table-hover\">");
    let _ = writeln!(
        out,
        "<thead><tr><th>Wikidata item</th><th>Repology project(s)</th><th>Action</th></tr></thead>"
    );
    let _ = writeln!(out, "<tbody>");

    for item in items {
        let rows = item.actions.len();
        let projects: Vec<String> = item
            .project_names
            .iter()
            .map(|name| link(&project_url(name), name))
            .collect();

        for (n, action) in item.actions.iter().enumerate() {
            out.push_str("<tr>");
            if n == 0 {
                let _ = write!(
                    out,
                    "<td rowspan=\"{rows}\">{}</td><td rowspan=\"{rows}\">{}</td>",
                    link(&item_url(&item.item), &item.item),
                    projects.join(" ")
                );
            }
            out.push_str(&action_cell(&action.kind));
            out.push_str("</tr>\n");
        }
    }

    let _ = writeln!(out, "</tbody>");
    let _ = writeln!(out, "</table>");
    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;

    fn report() -> Vec<ReportItem> {
        let names = vec!["foo".to_string()];
        let action = |kind| Action {
            item: "Q1".into(),
            project_names: names.clone(),
            kind,
        };
        vec![ReportItem {
            item: "Q1".into(),
            project_names: names.clone(),
            actions: vec![
                action(ActionKind::AddProperty {
                    repo: "gentoo".into(),
                    prop: "P3499".into(),
                    value: "dev-libs/foo".into(),
                    url: "https://packages.gentoo.org/packages/dev-libs/foo".into(),
                }),
                action(ActionKind::RemoveProperty {
                    repo: "arch".into(),
                    prop: "P3454".into(),
                    value: "foo<old>".into(),
                    url: "https://example.com/?a=1&b=2".into(),
                    history_urls: vec![
                        "https://example.com/h1".into(),
                        "https://example.com/h2".into(),
                    ],
                }),
                action(ActionKind::TooManyValues {
                    repo: "aur".into(),
                    prop: "P4162".into(),
                    count: 70,
                }),
            ],
        }]
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">&'"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_row_group_spans_actions() {
        let html = format_html_report(&report());
        assert_eq!(html.matches("rowspan=\"3\"").count(), 2);
        assert_eq!(html.matches("<tr><td").count(), 3);
        let item_link = "<a href=\"https://www.wikidata.org/wiki/Q1\">Q1</a>";
        let project_link = "<a href=\"https://repology.org/project/foo\">foo</a>";
        assert!(html.contains(item_link));
        assert!(html.contains(project_link));
    }

    #[test]
    fn test_cells_styled_by_kind() {
        let html = format_html_report(&report());
        let add = "<td class=\"table-success\">gentoo (P3499): adding ";
        let remove = "<td class=\"table-danger\">arch (P3454): ";
        let skipped = "<td class=\"table-warning\">aur (P4162): too many (70)";
        assert!(html.contains(add));
        assert!(html.contains(remove));
        assert!(html.contains(skipped));
        assert!(html.contains("[2]</a>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let html = format_html_report(&report());
        assert!(html.contains("foo&lt;old&gt;"));
        assert!(html.contains("href=\"https://example.com/?a=1&amp;b=2\""));
        assert!(!html.contains("foo<old>"));
    }
}
