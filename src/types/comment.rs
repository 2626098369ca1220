use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::User;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<User>,
    /// Comment body in Atlassian Document Format.
    #[serde(default)]
    pub body: Value,
    pub created: String,
    #[serde(default)]
    pub updated: Option<String>,
}

/// Paged comment list, as returned by `/issue/{key}/comment` and embedded in issue fields.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub total: u32,
}
