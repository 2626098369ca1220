use serde::Serialize;
use serde_json::{json, Map, Value};
use tabled::Tabled;

use crate::adf;
use crate::cli::{IssueCreateArgs, IssueListArgs, IssueUpdateArgs, IssueViewArgs};
use crate::client::{not_found_as_issue, JiraClient};
use crate::config::Config;
use crate::error::{JiraError, Result};
use crate::jql::{AssigneeFilter, IssueQuery};
use crate::output::{self, format_date, format_relative, status_colored, truncate};
use crate::responses::SearchPage;
use crate::types::{colored_priority, CreatedIssue, Issue, IssueKey};

use super::me::current_account_id;
use super::comments;

/// Jira caps enhanced search pages at 100 issues.
const MAX_PAGE_SIZE: usize = 100;

const LIST_FIELDS: &[&str] = &[
    "summary", "status", "priority", "issuetype", "assignee", "labels", "project", "updated",
];

const VIEW_FIELDS: &str = "summary,description,status,priority,issuetype,assignee,reporter,\
project,parent,labels,created,updated";

#[derive(Serialize)]
struct SearchRequest<'a> {
    jql: &'a str,
    #[serde(rename = "maxResults")]
    max_results: usize,
    fields: &'a [&'a str],
    #[serde(rename = "nextPageToken", skip_serializing_if = "Option::is_none")]
    next_page_token: Option<String>,
}

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Issue> for IssueRow {
    fn from(issue: &Issue) -> Self {
        let fields = &issue.fields;
        Self {
            key: issue.key.clone(),
            summary: truncate(&fields.summary, 50),
            status: fields
                .status
                .as_ref()
                .map(|s| status_colored(&s.name, s.category_key()))
                .unwrap_or_default(),
            priority: fields
                .priority
                .as_ref()
                .map(|p| colored_priority(&p.name))
                .unwrap_or_default(),
            assignee: fields
                .assignee
                .as_ref()
                .map(|u| u.display_name.clone())
                .unwrap_or_default(),
            updated: fields
                .updated
                .as_deref()
                .map(format_relative)
                .unwrap_or_default(),
        }
    }
}

fn compact_line(issue: &Issue) -> String {
    let status = issue
        .fields
        .status
        .as_ref()
        .map(|s| s.name.as_str())
        .unwrap_or("-");
    format!("{} [{}] {}", issue.key, status, issue.fields.summary)
}

/// Translate list flags into a JQL query.
pub fn build_query(config: &Config, args: &IssueListArgs) -> IssueQuery {
    let assignee = if args.mine {
        Some(AssigneeFilter::CurrentUser)
    } else {
        args.assignee.as_deref().map(AssigneeFilter::parse)
    };

    IssueQuery {
        project: config.resolve_project(args.project.as_deref()),
        assignee,
        status: args.status.clone(),
        issue_type: args.issue_type.clone(),
        label: args.label.clone(),
        text: args.text.clone(),
        raw: args.jql.clone(),
    }
}

/// Run a JQL search, following page tokens until `limit` issues are collected
/// (or every page has been read when `limit` is `None`).
pub async fn search(client: &JiraClient, jql: &str, limit: Option<usize>) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let mut next_page_token = None;

    loop {
        let remaining = limit.map(|l| l.saturating_sub(issues.len()));
        if remaining == Some(0) {
            break;
        }
        let page_size = remaining.map_or(MAX_PAGE_SIZE, |r| r.min(MAX_PAGE_SIZE));

        let request = SearchRequest {
            jql,
            max_results: page_size,
            fields: LIST_FIELDS,
            next_page_token: next_page_token.take(),
        };
        let page: SearchPage = client.post("/search/jql", &request).await?;
        tracing::debug!(count = page.issues.len(), "fetched search page");

        let is_final = page.is_final();
        let fetched = page.issues.len();
        issues.extend(page.issues);

        if is_final || fetched == 0 {
            break;
        }
        next_page_token = page.next_page_token;
    }

    if let Some(limit) = limit {
        issues.truncate(limit);
    }
    Ok(issues)
}

pub async fn list(client: &JiraClient, config: &Config, args: IssueListArgs) -> Result<()> {
    let jql = build_query(config, &args).to_jql();
    tracing::debug!(%jql, "searching issues");

    let limit = (!args.all).then_some(args.limit as usize);
    let issues = search(client, &jql, limit).await?;

    if issues.is_empty() {
        output::print_message("No issues found");
        return Ok(());
    }

    output::print_table(&issues, IssueRow::from, compact_line);

    Ok(())
}

pub async fn fetch_issue(client: &JiraClient, key: &IssueKey, fields: &str) -> Result<Issue> {
    client
        .get(
            &format!("/issue/{key}"),
            &[("fields", fields.to_string())],
        )
        .await
        .map_err(not_found_as_issue(key.as_str()))
}

pub async fn view(client: &JiraClient, args: IssueViewArgs) -> Result<()> {
    let fields = if args.comments {
        format!("{VIEW_FIELDS},comment")
    } else {
        VIEW_FIELDS.to_string()
    };
    let issue = fetch_issue(client, &args.key, &fields).await?;

    output::print_item(&issue, |issue| {
        let fields = &issue.fields;
        println!("{} - {}", issue.key, fields.summary);
        println!("{}", client.browse_url(&issue.key));
        println!();

        if let Some(desc) = &fields.description {
            let text = adf::to_text(desc);
            if !text.is_empty() {
                println!("{text}");
                println!();
            }
        }

        if let Some(project) = &fields.project {
            println!("Project:  {} ({})", project.name, project.key);
        }
        if let Some(issue_type) = &fields.issue_type {
            println!("Type:     {}", issue_type.name);
        }
        println!(
            "Status:   {}",
            fields
                .status
                .as_ref()
                .map(|s| status_colored(&s.name, s.category_key()))
                .unwrap_or_else(|| "-".to_string())
        );
        println!(
            "Priority: {}",
            fields
                .priority
                .as_ref()
                .map(|p| colored_priority(&p.name))
                .unwrap_or_else(|| "-".to_string())
        );
        println!(
            "Assignee: {}",
            fields
                .assignee
                .as_ref()
                .map(|u| u.display_name.as_str())
                .unwrap_or("Unassigned")
        );
        if let Some(reporter) = &fields.reporter {
            println!("Reporter: {}", reporter.display_name);
        }
        if let Some(parent) = &fields.parent {
            match &parent.fields {
                Some(pf) => println!("Parent:   {} - {}", parent.key, pf.summary),
                None => println!("Parent:   {}", parent.key),
            }
        }
        if !fields.labels.is_empty() {
            println!("Labels:   {}", fields.labels.join(", "));
        }
        if let Some(created) = &fields.created {
            println!("Created:  {}", format_date(created));
        }
        if let Some(updated) = &fields.updated {
            println!("Updated:  {}", format_date(updated));
        }

        if let Some(page) = &fields.comment {
            println!();
            println!("Comments ({}):", page.total);
            for comment in &page.comments {
                comments::print_comment(comment);
            }
        }
    });

    Ok(())
}

/// Body for `POST /issue`.
pub fn create_payload(
    project: &str,
    issue_type: &str,
    args: &IssueCreateArgs,
    assignee_id: Option<String>,
) -> Value {
    let mut fields = Map::new();
    fields.insert("project".into(), json!({ "key": project }));
    fields.insert("issuetype".into(), json!({ "name": issue_type }));
    fields.insert("summary".into(), json!(args.summary.trim()));

    if let Some(desc) = &args.description {
        fields.insert("description".into(), adf::from_text(desc));
    }
    if let Some(priority) = args.priority {
        fields.insert("priority".into(), json!({ "name": priority.label() }));
    }
    if !args.labels.is_empty() {
        fields.insert("labels".into(), json!(args.labels));
    }
    if let Some(id) = assignee_id {
        fields.insert("assignee".into(), json!({ "accountId": id }));
    }
    if let Some(parent) = &args.parent {
        fields.insert("parent".into(), json!({ "key": parent.as_str() }));
    }

    json!({ "fields": fields })
}

pub async fn create(client: &JiraClient, config: &Config, args: IssueCreateArgs) -> Result<()> {
    let project = match (&args.parent, config.resolve_project(args.project.as_deref())) {
        (_, Some(project)) => project,
        // Children live in their parent's project.
        (Some(parent), None) => parent.project().to_string(),
        (None, None) => return Err(JiraError::NoProject),
    };
    let issue_type = config.issue_type(args.issue_type.as_deref());

    let assignee_id = match args.assignee.as_deref() {
        Some(a) if a.eq_ignore_ascii_case("me") => Some(current_account_id(client).await?),
        Some(a) => Some(a.to_string()),
        None => None,
    };

    let payload = create_payload(&project, &issue_type, &args, assignee_id);
    let created: CreatedIssue = client.post("/issue", &payload).await?;

    if output::is_json_output() {
        output::print_item(&created, |_| {});
    } else {
        output::print_message(&format!(
            "Created {} - {}\n{}",
            created.key,
            args.summary.trim(),
            client.browse_url(&created.key)
        ));
    }

    Ok(())
}

/// Body for `PUT /issue/{key}`, or `None` when nothing would change.
pub fn update_payload(args: &IssueUpdateArgs) -> Option<Value> {
    let mut fields = Map::new();
    let mut update = Map::new();

    if let Some(summary) = &args.summary {
        fields.insert("summary".into(), json!(summary));
    }
    if let Some(desc) = &args.description {
        fields.insert("description".into(), adf::from_text(desc));
    }
    if let Some(priority) = args.priority {
        fields.insert("priority".into(), json!({ "name": priority.label() }));
    }

    let label_ops: Vec<Value> = args
        .add_labels
        .iter()
        .map(|l| json!({ "add": l }))
        .chain(args.remove_labels.iter().map(|l| json!({ "remove": l })))
        .collect();
    if !label_ops.is_empty() {
        update.insert("labels".into(), Value::Array(label_ops));
    }

    if fields.is_empty() && update.is_empty() {
        return None;
    }

    let mut body = Map::new();
    if !fields.is_empty() {
        body.insert("fields".into(), Value::Object(fields));
    }
    if !update.is_empty() {
        body.insert("update".into(), Value::Object(update));
    }
    Some(Value::Object(body))
}

pub async fn update(client: &JiraClient, args: IssueUpdateArgs) -> Result<()> {
    let Some(payload) = update_payload(&args) else {
        output::print_message("No updates specified");
        return Ok(());
    };

    client
        .put(&format!("/issue/{}", args.key), &payload)
        .await
        .map_err(not_found_as_issue(args.key.as_str()))?;

    output::print_message(&format!("Updated {}", args.key));

    Ok(())
}

pub async fn assign(client: &JiraClient, key: &IssueKey, assignee: &str) -> Result<()> {
    let account_id = match AssigneeFilter::parse(assignee) {
        AssigneeFilter::CurrentUser => Some(current_account_id(client).await?),
        AssigneeFilter::Unassigned => None,
        AssigneeFilter::Account(id) => Some(id),
    };

    client
        .put(
            &format!("/issue/{key}/assignee"),
            &json!({ "accountId": account_id }),
        )
        .await
        .map_err(not_found_as_issue(key.as_str()))?;

    match account_id {
        Some(_) => output::print_message(&format!("Assigned {key} to {assignee}")),
        None => output::print_message(&format!("Unassigned {key}")),
    }

    Ok(())
}

pub fn open(client: &JiraClient, key: &IssueKey) {
    let url = client.browse_url(key.as_str());
    if output::is_json_output() {
        output::print_item(&json!({ "key": key.as_str(), "url": url }), |_| {});
    } else {
        println!("{url}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn list_args() -> IssueListArgs {
        IssueListArgs {
            mine: false,
            assignee: None,
            project: None,
            status: None,
            issue_type: None,
            label: None,
            text: None,
            jql: None,
            limit: 25,
            all: false,
        }
    }

    fn issue_json(key: &str) -> Value {
        json!({
            "id": key.trim_start_matches("ENG-"),
            "key": key,
            "fields": { "summary": format!("Summary of {key}"), "status": null }
        })
    }

    fn key(s: &str) -> IssueKey {
        s.parse().unwrap()
    }

    #[test]
    fn query_uses_default_project_and_mine() {
        let config = Config {
            default_project: Some("eng".into()),
            ..Config::default()
        };
        let mut args = list_args();
        args.mine = true;
        args.status = Some("Done".into());

        assert_eq!(
            build_query(&config, &args).to_jql(),
            "project = \"ENG\" AND assignee = currentUser() AND status = \"Done\" ORDER BY updated DESC"
        );
    }

    #[test]
    fn create_payload_includes_optional_fields() {
        let args = IssueCreateArgs {
            summary: "  Fix login  ".into(),
            description: Some("Steps".into()),
            project: None,
            issue_type: None,
            priority: Some(Priority::High),
            labels: vec!["auth".into()],
            assignee: None,
            parent: Some(key("ENG-1")),
        };

        let payload = create_payload("ENG", "Bug", &args, Some("acc-1".into()));
        assert_eq!(
            payload,
            json!({
                "fields": {
                    "project": { "key": "ENG" },
                    "issuetype": { "name": "Bug" },
                    "summary": "Fix login",
                    "description": adf::from_text("Steps"),
                    "priority": { "name": "High" },
                    "labels": ["auth"],
                    "assignee": { "accountId": "acc-1" },
                    "parent": { "key": "ENG-1" }
                }
            })
        );
    }

    #[test]
    fn update_payload_skips_empty_updates() {
        let mut args = IssueUpdateArgs {
            key: key("ENG-5"),
            summary: None,
            description: None,
            priority: None,
            add_labels: vec![],
            remove_labels: vec![],
        };
        assert!(update_payload(&args).is_none());

        args.priority = Some(Priority::Low);
        args.add_labels = vec!["ui".into()];
        args.remove_labels = vec!["old".into()];
        assert_eq!(
            update_payload(&args).unwrap(),
            json!({
                "fields": { "priority": { "name": "Low" } },
                "update": { "labels": [{ "add": "ui" }, { "remove": "old" }] }
            })
        );
    }

    #[tokio::test]
    async fn search_follows_page_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .and(body_partial_json(json!({ "nextPageToken": "p2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [issue_json("ENG-3")],
                "isLast": true
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .and(body_partial_json(json!({ "jql": "project = \"ENG\"" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [issue_json("ENG-1"), issue_json("ENG-2")],
                "nextPageToken": "p2",
                "isLast": false
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let issues = search(&client, "project = \"ENG\"", None).await.unwrap();
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["ENG-1", "ENG-2", "ENG-3"]);
    }

    #[tokio::test]
    async fn search_stops_at_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .and(body_partial_json(json!({ "maxResults": 2 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [issue_json("ENG-1"), issue_json("ENG-2")],
                "nextPageToken": "more",
                "isLast": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let issues = search(&client, "project = ENG", Some(2)).await.unwrap();
        assert_eq!(issues.len(), 2);
    }

    #[tokio::test]
    async fn missing_issue_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/ENG-404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errorMessages": ["Issue does not exist or you do not have permission to see it."]
            })))
            .mount(&server)
            .await;

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let err = fetch_issue(&client, &key("ENG-404"), VIEW_FIELDS).await.unwrap_err();
        assert!(matches!(err, JiraError::IssueNotFound(k) if k == "ENG-404"));
    }
}
