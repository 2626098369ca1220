use serde::{Deserialize, Serialize};

use super::User;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<User>,
    pub created: String,
}
