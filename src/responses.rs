//! Shared REST response envelopes used across commands.

use serde::Deserialize;

use crate::types::{Issue, Project};

/// Page from the enhanced JQL search endpoint (`/search/jql`), which pages by token.
#[derive(Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
    #[serde(rename = "isLast", default)]
    pub is_last: Option<bool>,
}

impl SearchPage {
    /// True when no further page can be requested.
    pub fn is_final(&self) -> bool {
        self.is_last.unwrap_or(false) || self.next_page_token.is_none()
    }
}

/// Offset-paginated page, as returned by `/project/search`.
#[derive(Deserialize)]
pub struct OffsetPage<T> {
    pub values: Vec<T>,
    #[serde(rename = "startAt", default)]
    pub start_at: u32,
    #[serde(rename = "isLast", default)]
    pub is_last: bool,
}

pub type ProjectPage = OffsetPage<Project>;
