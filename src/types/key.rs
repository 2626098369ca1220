use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::JiraError;

/// A validated, upper-cased issue key such as `ENG-123`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueKey(String);

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]+-[1-9][0-9]*$").expect("valid regex"))
}

impl IssueKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project part of the key (`ENG` for `ENG-123`).
    pub fn project(&self) -> &str {
        self.0.rsplit_once('-').map(|(p, _)| p).unwrap_or(&self.0)
    }
}

impl FromStr for IssueKey {
    type Err = JiraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        if key_pattern().is_match(&upper) {
            Ok(Self(upper))
        } else {
            Err(JiraError::InvalidIssueKey(s.to_string()))
        }
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_uppercases_keys() {
        let key: IssueKey = "eng-42".parse().unwrap();
        assert_eq!(key.as_str(), "ENG-42");
        assert_eq!(key.project(), "ENG");

        let key: IssueKey = "DATA_2-7".parse().unwrap();
        assert_eq!(key.project(), "DATA_2");
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["ENG", "ENG-", "ENG-0", "1ENG-3", "E-1", "ENG 12", "ENG-12a"] {
            assert!(bad.parse::<IssueKey>().is_err(), "{bad} should be rejected");
        }
    }
}
