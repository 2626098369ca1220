use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::Status;

/// Link types available on a stock Jira Cloud site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkKind {
    /// Source blocks the target
    Blocks,
    /// Source duplicates the target
    Duplicates,
    /// General relationship
    Relates,
    /// Source clones the target
    Clones,
}

impl LinkKind {
    /// Name of the link type as configured in Jira.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Blocks => "Blocks",
            Self::Duplicates => "Duplicate",
            Self::Relates => "Relates",
            Self::Clones => "Cloners",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocks => write!(f, "blocks"),
            Self::Duplicates => write!(f, "duplicates"),
            Self::Relates => write!(f, "relates to"),
            Self::Clones => write!(f, "clones"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IssueLinkType {
    pub name: String,
    pub inward: String,
    pub outward: String,
}

/// A link as seen from one of its two issues: exactly one side is set.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IssueLink {
    pub id: String,
    #[serde(rename = "type")]
    pub link_type: IssueLinkType,
    #[serde(rename = "inwardIssue", default, skip_serializing_if = "Option::is_none")]
    pub inward_issue: Option<LinkedIssue>,
    #[serde(rename = "outwardIssue", default, skip_serializing_if = "Option::is_none")]
    pub outward_issue: Option<LinkedIssue>,
}

impl IssueLink {
    /// The other issue together with the phrase describing it.
    pub fn other_side(&self) -> Option<(&str, &LinkedIssue)> {
        match (&self.outward_issue, &self.inward_issue) {
            (Some(issue), _) => Some((self.link_type.outward.as_str(), issue)),
            (None, Some(issue)) => Some((self.link_type.inward.as_str(), issue)),
            (None, None) => None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LinkedIssue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: Option<LinkedIssueFields>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LinkedIssueFields {
    pub summary: String,
    #[serde(default)]
    pub status: Option<Status>,
}
