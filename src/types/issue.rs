use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Attachment, CommentPage, IssueLink, User};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IssueFields {
    pub summary: String,
    /// Atlassian Document Format, or null when the issue has no description.
    #[serde(default)]
    pub description: Option<Value>,
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<PriorityRef>,
    #[serde(rename = "issuetype", default)]
    pub issue_type: Option<IssueType>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub reporter: Option<User>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub parent: Option<ParentRef>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "issuelinks", default)]
    pub issue_links: Vec<IssueLink>,
    #[serde(rename = "attachment", default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentPage>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Status {
    pub name: String,
    #[serde(rename = "statusCategory", default)]
    pub category: Option<StatusCategory>,
}

impl Status {
    pub fn category_key(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.key.as_str())
    }
}

/// One of Jira's three fixed status buckets: `new`, `indeterminate`, `done`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StatusCategory {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PriorityRef {
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IssueType {
    pub name: String,
    #[serde(default)]
    pub subtask: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ProjectRef {
    pub key: String,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ParentRef {
    pub key: String,
    #[serde(default)]
    pub fields: Option<ParentFields>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ParentFields {
    pub summary: String,
}

/// Minimal issue info returned after create.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
}
