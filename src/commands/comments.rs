use serde_json::json;
use tabled::Tabled;

use crate::adf;
use crate::cli::CommentArgs;
use crate::client::{not_found_as_issue, JiraClient};
use crate::error::Result;
use crate::output::{self, format_relative, truncate};
use crate::types::{Comment, CommentPage, IssueKey};

#[derive(Tabled)]
struct CommentRow {
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Comment")]
    body: String,
    #[tabled(rename = "When")]
    created: String,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            author: author_name(comment).to_string(),
            body: truncate(&adf::to_text(&comment.body).replace('\n', " "), 60),
            created: format_relative(&comment.created),
        }
    }
}

fn author_name(comment: &Comment) -> &str {
    comment
        .author
        .as_ref()
        .map(|u| u.display_name.as_str())
        .unwrap_or("Unknown")
}

/// Full comment block used by `issue view --comments`.
pub fn print_comment(comment: &Comment) {
    println!();
    println!("{} ({})", author_name(comment), format_relative(&comment.created));
    for line in adf::to_text(&comment.body).lines() {
        println!("  {line}");
    }
}

pub async fn fetch(client: &JiraClient, key: &IssueKey) -> Result<Vec<Comment>> {
    let page: CommentPage = client
        .get(
            &format!("/issue/{key}/comment"),
            &[
                ("orderBy", "created".to_string()),
                ("maxResults", "100".to_string()),
            ],
        )
        .await
        .map_err(not_found_as_issue(key.as_str()))?;

    Ok(page.comments)
}

pub async fn list(client: &JiraClient, key: &IssueKey) -> Result<()> {
    let comments = fetch(client, key).await?;

    if comments.is_empty() {
        output::print_message(&format!("No comments on {key}"));
        return Ok(());
    }

    output::print_table(
        &comments,
        CommentRow::from,
        |c| {
            format!(
                "{}: {}",
                author_name(c),
                truncate(&adf::to_text(&c.body).replace('\n', " "), 80)
            )
        },
    );

    Ok(())
}

pub async fn add(client: &JiraClient, args: CommentArgs) -> Result<()> {
    let body = json!({ "body": adf::from_text(&args.body) });

    let created: Comment = client
        .post(&format!("/issue/{}/comment", args.key), &body)
        .await
        .map_err(not_found_as_issue(args.key.as_str()))?;

    tracing::debug!(comment = %created.id, "comment created");
    output::print_message(&format!("Added comment to {}", args.key));

    Ok(())
}
