//! Statistics blocks and the banners that frame a report run.

use crate::table::{display_width, pad, TableStyle, INDENT, NO_DATA};
use std::fmt::Display;

const ITEM_INDENT: &str = "     ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupKind {
    Ranking,
    Breakdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    kind: GroupKind,
    heading: String,
    items: Vec<(String, String)>,
}

/// A titled block of `label : value` lines followed by ranked or bulleted lists.
///
/// ```text
///   Users      : 4
///   Categories : 3
///
///   Top 3 customers:
///      1. alice (120.50€)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    title: String,
    fields: Vec<(String, String)>,
    groups: Vec<Group>,
}

impl Summary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, label: impl Into<String>, value: impl Display) -> Self {
        self.fields.push((label.into(), value.to_string()));
        self
    }

    /// Numbered list; `detail` is shown in parentheses after the name.
    pub fn ranking<N, D>(
        mut self,
        heading: impl Into<String>,
        items: impl IntoIterator<Item = (N, D)>,
    ) -> Self
    where
        N: Display,
        D: Display,
    {
        self.groups.push(Group {
            kind: GroupKind::Ranking,
            heading: heading.into(),
            items: items
                .into_iter()
                .map(|(n, d)| (n.to_string(), d.to_string()))
                .collect(),
        });
        self
    }

    /// Bulleted `- name: count` list.
    pub fn breakdown<N, D>(
        mut self,
        heading: impl Into<String>,
        items: impl IntoIterator<Item = (N, D)>,
    ) -> Self
    where
        N: Display,
        D: Display,
    {
        self.groups.push(Group {
            kind: GroupKind::Breakdown,
            heading: heading.into(),
            items: items
                .into_iter()
                .map(|(n, d)| (n.to_string(), d.to_string()))
                .collect(),
        });
        self
    }

    pub fn render(&self, style: &TableStyle) -> String {
        let banner = style.banner();
        let mut lines = vec![
            String::new(),
            banner.clone(),
            format!("{INDENT}{}", self.title),
            banner,
        ];

        let label_width = self
            .fields
            .iter()
            .map(|(label, _)| display_width(label))
            .max()
            .unwrap_or(0);
        for (label, value) in &self.fields {
            lines.push(format!("{INDENT}{} : {value}", pad(label, label_width)));
        }

        for group in &self.groups {
            lines.push(String::new());
            lines.push(format!("{INDENT}{}:", group.heading));
            if group.items.is_empty() {
                lines.push(format!("{ITEM_INDENT}{NO_DATA}"));
                continue;
            }
            for (rank, (name, detail)) in group.items.iter().enumerate() {
                let line = match group.kind {
                    GroupKind::Ranking => format!("{ITEM_INDENT}{}. {name} ({detail})", rank + 1),
                    GroupKind::Breakdown => format!("{ITEM_INDENT}- {name}: {detail}"),
                };
                lines.push(line);
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// First line printed by a report tool before it connects.
pub fn connecting_line(engine: &str, host: &str, port: u16, database: &str) -> String {
    format!("\nConnecting to {engine} {host}:{port}/{database}...")
}

/// Last block printed by a report tool on success.
pub fn closing_banner(style: &TableStyle) -> String {
    let banner = style.banner();
    format!("\n{banner}\n{INDENT}Done!\n{banner}\n")
}

/// Formats an amount in euros, the currency of the demo shop.
pub fn euros(amount: impl Display) -> String {
    format!("{amount}€")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_align_to_longest_label() {
        let out = Summary::new("Stats")
            .field("Users", 4)
            .field("Categories", 3)
            .render(&TableStyle::SHOP);

        assert!(out.contains("\n  Users      : 4\n"));
        assert!(out.contains("\n  Categories : 3\n"));
    }

    #[test]
    fn test_ranking_is_numbered_from_one() {
        let out = Summary::new("Stats")
            .ranking("Top customers", [("alice", "10€"), ("bob", "5€")])
            .render(&TableStyle::SHOP);

        assert!(out.contains("\n\n  Top customers:\n     1. alice (10€)\n     2. bob (5€)\n"));
    }

    #[test]
    fn test_breakdown_is_bulleted() {
        let out = Summary::new("Stats")
            .breakdown("Statuses", [("open", 3)])
            .render(&TableStyle::VERSIONS);

        assert!(out.contains("  Statuses:\n     - open: 3\n"));
        assert!(out.contains(&"=".repeat(80)));
    }

    #[test]
    fn test_empty_group_reports_no_data() {
        let out = Summary::new("Stats")
            .breakdown("Types", Vec::<(String, i64)>::new())
            .render(&TableStyle::SHOP);

        assert!(out.ends_with("  Types:\n     (no data)\n"));
    }

    #[test]
    fn test_banners() {
        assert_eq!(
            connecting_line("PostgreSQL", "db", 5432, "demo"),
            "\nConnecting to PostgreSQL db:5432/demo..."
        );
        let closing = closing_banner(&TableStyle::SHOP);
        assert!(closing.contains("  Done!"));
        assert_eq!(closing.matches(&"=".repeat(60)).count(), 2);
    }

    #[test]
    fn test_euros() {
        assert_eq!(euros("19.99"), "19.99€");
    }
}
