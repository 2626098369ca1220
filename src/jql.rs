//! JQL assembly for the issue list filters.

use std::sync::OnceLock;

use regex::Regex;

const DEFAULT_WINDOW: &str = "updated >= -30d";
const DEFAULT_ORDER: &str = "ORDER BY updated DESC";

/// Who an issue must be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeFilter {
    CurrentUser,
    Unassigned,
    Account(String),
}

impl AssigneeFilter {
    /// `me` and `none` are shorthands; anything else is an account id.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "me" => Self::CurrentUser,
            "none" | "unassigned" => Self::Unassigned,
            _ => Self::Account(value.trim().to_string()),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct IssueQuery {
    pub project: Option<String>,
    pub assignee: Option<AssigneeFilter>,
    pub status: Option<String>,
    pub issue_type: Option<String>,
    pub label: Option<String>,
    pub text: Option<String>,
    /// Raw JQL appended as an extra AND-clause.
    pub raw: Option<String>,
}

impl IssueQuery {
    pub fn to_jql(&self) -> String {
        let mut clauses = Vec::new();

        if let Some(project) = &self.project {
            clauses.push(format!("project = {}", quote(project)));
        }
        match &self.assignee {
            Some(AssigneeFilter::CurrentUser) => clauses.push("assignee = currentUser()".into()),
            Some(AssigneeFilter::Unassigned) => clauses.push("assignee is EMPTY".into()),
            Some(AssigneeFilter::Account(id)) => clauses.push(format!("assignee = {}", quote(id))),
            None => {}
        }
        if let Some(status) = &self.status {
            clauses.push(format!("status = {}", quote(status)));
        }
        if let Some(issue_type) = &self.issue_type {
            clauses.push(format!("type = {}", quote(issue_type)));
        }
        if let Some(label) = &self.label {
            clauses.push(format!("labels = {}", quote(label)));
        }
        if let Some(text) = &self.text {
            clauses.push(format!("text ~ {}", quote(text)));
        }

        let raw = self
            .raw
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty());
        let (raw_filter, raw_order) = match raw {
            Some(raw) => split_order_by(raw),
            None => (None, None),
        };
        if let Some(filter) = raw_filter {
            clauses.push(format!("({filter})"));
        }

        if clauses.is_empty() {
            clauses.push(DEFAULT_WINDOW.to_string());
        }

        let order = raw_order.unwrap_or(DEFAULT_ORDER);
        format!("{} {}", clauses.join(" AND "), order)
    }
}

fn order_by_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\border\s+by\b").expect("valid regex"))
}

/// Split `filter ORDER BY ...` into its two halves (either may be absent).
///
/// Only the keyword counts, not `order by` inside a quoted string.
fn split_order_by(raw: &str) -> (Option<&str>, Option<&str>) {
    let keyword = order_by_pattern()
        .find_iter(raw)
        .map(|m| m.start())
        .find(|&idx| !inside_quotes(&raw[..idx]));

    match keyword {
        Some(idx) => {
            let filter = raw[..idx].trim();
            let filter = (!filter.is_empty()).then_some(filter);
            (filter, Some(raw[idx..].trim()))
        }
        None => (Some(raw), None),
    }
}

/// Whether `prefix` ends inside an open JQL string literal.
fn inside_quotes(prefix: &str) -> bool {
    let mut open: Option<char> = None;
    let mut escaped = false;

    for c in prefix.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match (open, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => open = None,
            (None, '"' | '\'') => open = Some(c),
            _ => {}
        }
    }

    open.is_some()
}

/// Quote a JQL string literal.
pub fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_query_is_bounded() {
        assert_eq!(
            IssueQuery::default().to_jql(),
            "updated >= -30d ORDER BY updated DESC"
        );
    }

    #[test]
    fn combines_clauses_with_and() {
        let query = IssueQuery {
            project: Some("ENG".into()),
            assignee: Some(AssigneeFilter::CurrentUser),
            status: Some("In Progress".into()),
            label: Some("backend".into()),
            ..IssueQuery::default()
        };
        assert_eq!(
            query.to_jql(),
            "project = \"ENG\" AND assignee = currentUser() AND status = \"In Progress\" \
             AND labels = \"backend\" ORDER BY updated DESC"
        );
    }

    #[test]
    fn unassigned_and_account_filters() {
        let mut query = IssueQuery {
            assignee: Some(AssigneeFilter::parse("none")),
            ..IssueQuery::default()
        };
        assert_eq!(query.to_jql(), "assignee is EMPTY ORDER BY updated DESC");

        query.assignee = Some(AssigneeFilter::parse("5b10ac8d82e05b22cc7d4ef5"));
        assert_eq!(
            query.to_jql(),
            "assignee = \"5b10ac8d82e05b22cc7d4ef5\" ORDER BY updated DESC"
        );
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(quote(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);

        let query = IssueQuery {
            text: Some("crash \"on\" save".into()),
            ..IssueQuery::default()
        };
        assert_eq!(
            query.to_jql(),
            r#"text ~ "crash \"on\" save" ORDER BY updated DESC"#
        );
    }

    #[test]
    fn raw_jql_is_parenthesised() {
        let query = IssueQuery {
            project: Some("ENG".into()),
            raw: Some("priority = High OR labels = urgent".into()),
            ..IssueQuery::default()
        };
        assert_eq!(
            query.to_jql(),
            "project = \"ENG\" AND (priority = High OR labels = urgent) ORDER BY updated DESC"
        );
    }

    #[test]
    fn raw_order_by_replaces_default() {
        let query = IssueQuery {
            raw: Some("sprint in openSprints() order by rank".into()),
            ..IssueQuery::default()
        };
        assert_eq!(query.to_jql(), "(sprint in openSprints()) order by rank");

        let query = IssueQuery {
            project: Some("OPS".into()),
            raw: Some("ORDER BY created ASC".into()),
            ..IssueQuery::default()
        };
        assert_eq!(query.to_jql(), "project = \"OPS\" ORDER BY created ASC");
    }

    #[test]
    fn order_by_inside_words_or_quotes_is_not_a_keyword() {
        let query = IssueQuery {
            raw: Some("text ~ \"border bypass\"".into()),
            ..IssueQuery::default()
        };
        assert_eq!(
            query.to_jql(),
            "(text ~ \"border bypass\") ORDER BY updated DESC"
        );

        let query = IssueQuery {
            raw: Some("summary ~ \"sort order by date\"".into()),
            ..IssueQuery::default()
        };
        assert_eq!(
            query.to_jql(),
            "(summary ~ \"sort order by date\") ORDER BY updated DESC"
        );

        let query = IssueQuery {
            raw: Some(r#"summary ~ 'order by \' x' ORDER  BY priority"#.into()),
            ..IssueQuery::default()
        };
        assert_eq!(
            query.to_jql(),
            r#"(summary ~ 'order by \' x') ORDER  BY priority"#
        );
    }
}
