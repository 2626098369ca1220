use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use crate::cli::LinkArgs;
use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::output::{self, truncate};
use crate::types::{IssueKey, IssueLink};

use super::issues::fetch_issue;

#[derive(Tabled, Clone, Serialize)]
struct LinkRow {
    #[tabled(rename = "Relation")]
    relation: String,
    #[tabled(rename = "Issue")]
    issue: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl LinkRow {
    fn from_link(link: &IssueLink) -> Option<Self> {
        let (relation, other) = link.other_side()?;
        let fields = other.fields.as_ref();
        Some(Self {
            relation: relation.to_string(),
            issue: other.key.clone(),
            summary: fields.map(|f| truncate(&f.summary, 50)).unwrap_or_default(),
            status: fields
                .and_then(|f| f.status.as_ref())
                .map(|s| s.name.clone())
                .unwrap_or_default(),
        })
    }
}

pub async fn fetch(client: &JiraClient, key: &IssueKey) -> Result<Vec<IssueLink>> {
    let issue = fetch_issue(client, key, "summary,issuelinks").await?;
    Ok(issue.fields.issue_links)
}

/// The link joining `key`'s issue to `target`, in either direction.
pub fn find_link<'a>(links: &'a [IssueLink], target: &IssueKey) -> Option<&'a IssueLink> {
    links.iter().find(|link| {
        link.other_side()
            .is_some_and(|(_, other)| other.key.eq_ignore_ascii_case(target.as_str()))
    })
}

pub async fn list(client: &JiraClient, key: &IssueKey) -> Result<()> {
    let links = fetch(client, key).await?;
    let rows: Vec<LinkRow> = links.iter().filter_map(LinkRow::from_link).collect();

    if rows.is_empty() {
        output::print_message(&format!("No links for {key}"));
        return Ok(());
    }

    output::print_table(
        &rows,
        LinkRow::clone,
        |row| format!("{}: {} - {}", row.relation, row.issue, row.summary),
    );

    Ok(())
}

pub async fn link(client: &JiraClient, args: LinkArgs) -> Result<()> {
    let body = json!({
        "type": { "name": args.kind.type_name() },
        "inwardIssue": { "key": args.source.as_str() },
        "outwardIssue": { "key": args.target.as_str() },
    });

    client.post_empty("/issueLink", &body).await?;

    output::print_message(&format!("{} {} {}", args.source, args.kind, args.target));

    Ok(())
}

pub async fn unlink(client: &JiraClient, source: &IssueKey, target: &IssueKey) -> Result<()> {
    let links = fetch(client, source).await?;

    let link = find_link(&links, target)
        .ok_or_else(|| JiraError::LinkNotFound(source.to_string(), target.to_string()))?;

    client.delete(&format!("/issueLink/{}", link.id)).await?;

    output::print_message(&format!("Removed link between {source} and {target}"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(s: &str) -> IssueKey {
        s.parse().unwrap()
    }

    async fn mount_issue_with_links(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/ENG-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1",
                "key": "ENG-1",
                "fields": {
                    "summary": "Source",
                    "issuelinks": [
                        {
                            "id": "9001",
                            "type": { "name": "Blocks", "inward": "is blocked by", "outward": "blocks" },
                            "outwardIssue": { "id": "2", "key": "ENG-2", "fields": { "summary": "Target" } }
                        },
                        {
                            "id": "9002",
                            "type": { "name": "Relates", "inward": "relates to", "outward": "relates to" },
                            "inwardIssue": { "id": "3", "key": "OPS-3", "fields": { "summary": "Ops" } }
                        }
                    ]
                }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn rows_use_direction_phrases() {
        let server = MockServer::start().await;
        mount_issue_with_links(&server).await;

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let links = fetch(&client, &key("ENG-1")).await.unwrap();
        let rows: Vec<LinkRow> = links.iter().filter_map(LinkRow::from_link).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].relation, "blocks");
        assert_eq!(rows[1].relation, "relates to");
        assert_eq!(rows[1].issue, "OPS-3");
    }

    #[tokio::test]
    async fn unlink_deletes_matching_link() {
        let server = MockServer::start().await;
        mount_issue_with_links(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/rest/api/3/issueLink/9002"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        unlink(&client, &key("ENG-1"), &key("ops-3")).await.unwrap();
    }

    #[tokio::test]
    async fn unlink_without_link_fails() {
        let server = MockServer::start().await;
        mount_issue_with_links(&server).await;

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let err = unlink(&client, &key("ENG-1"), &key("ENG-99")).await.unwrap_err();
        assert!(matches!(err, JiraError::LinkNotFound(_, _)));
    }

    #[tokio::test]
    async fn link_posts_issue_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issueLink"))
            .and(body_json(json!({
                "type": { "name": "Duplicate" },
                "inwardIssue": { "key": "ENG-1" },
                "outwardIssue": { "key": "ENG-2" }
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let args = LinkArgs {
            source: key("ENG-1"),
            kind: crate::types::LinkKind::Duplicates,
            target: key("ENG-2"),
        };
        link(&client, args).await.unwrap();
    }
}
