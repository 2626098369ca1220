use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{JiraError, Result};

const DEFAULT_ISSUE_TYPE: &str = "Task";

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_issue_type: Option<String>,
}

impl Config {
    /// Load the config file and apply `JIRA_*` environment overrides.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        Ok(config.with_env(|name| std::env::var(name).ok()))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| JiraError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| JiraError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "jira")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(JiraError::NoConfigDir)
    }

    /// Environment variables take precedence over values from the file.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("JIRA_URL") {
            self.url = Some(url);
        }
        if let Some(email) = non_empty("JIRA_EMAIL") {
            self.email = Some(email);
        }
        if let Some(token) = non_empty("JIRA_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(project) = non_empty("JIRA_PROJECT") {
            self.default_project = Some(project);
        }
        self
    }

    /// Site base URL without a trailing slash.
    pub fn site_url(&self) -> Result<String> {
        let raw = self.url.as_deref().ok_or(JiraError::MissingUrl)?;
        normalize_site_url(raw)
    }

    pub fn email(&self) -> Result<String> {
        self.email.clone().ok_or(JiraError::MissingEmail)
    }

    pub fn api_token(&self) -> Result<String> {
        self.api_token.clone().ok_or(JiraError::MissingApiToken)
    }

    /// Get project, preferring explicit argument over default
    pub fn resolve_project(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(String::from)
            .or_else(|| self.default_project.clone())
            .map(|key| key.to_uppercase())
    }

    pub fn issue_type(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.default_issue_type.as_deref())
            .unwrap_or(DEFAULT_ISSUE_TYPE)
            .to_string()
    }
}

/// Validate a site URL and strip any trailing slash.
pub fn normalize_site_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim()).map_err(|_| JiraError::InvalidUrl(raw.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(JiraError::InvalidUrl(raw.to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_file_yields_empty_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_all_keys_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
url = "https://acme.atlassian.net/"
email = "dev@acme.io"
api_token = "secret"
default_project = "eng"
default_issue_type = "Bug"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.site_url().unwrap(), "https://acme.atlassian.net");
        assert_eq!(config.email().unwrap(), "dev@acme.io");
        assert_eq!(config.api_token().unwrap(), "secret");
        assert_eq!(config.resolve_project(None).as_deref(), Some("ENG"));
        assert_eq!(config.issue_type(None), "Bug");
    }

    #[test]
    fn parse_error_mentions_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, JiraError::ConfigParse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn env_overrides_file_values() {
        let config = Config {
            url: Some("https://file.atlassian.net".into()),
            email: Some("file@acme.io".into()),
            api_token: Some("file-token".into()),
            default_project: Some("FILE".into()),
            default_issue_type: None,
        }
        .with_env(env(&[
            ("JIRA_URL", "https://env.atlassian.net"),
            ("JIRA_API_TOKEN", "env-token"),
            ("JIRA_EMAIL", "  "),
        ]));

        assert_eq!(config.site_url().unwrap(), "https://env.atlassian.net");
        assert_eq!(config.api_token().unwrap(), "env-token");
        // blank env values are ignored
        assert_eq!(config.email().unwrap(), "file@acme.io");
        assert_eq!(config.resolve_project(None).as_deref(), Some("FILE"));
    }

    #[test]
    fn missing_credentials_are_reported() {
        let config = Config::default();
        assert!(matches!(config.site_url(), Err(JiraError::MissingUrl)));
        assert!(matches!(config.email(), Err(JiraError::MissingEmail)));
        assert!(matches!(config.api_token(), Err(JiraError::MissingApiToken)));
    }

    #[test]
    fn explicit_project_wins_over_default() {
        let config = Config {
            default_project: Some("OPS".into()),
            ..Config::default()
        };
        assert_eq!(config.resolve_project(Some("eng")).as_deref(), Some("ENG"));
        assert_eq!(config.issue_type(Some("Story")), "Story");
        assert_eq!(config.issue_type(None), "Task");
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(normalize_site_url("ftp://acme.atlassian.net").is_err());
        assert!(normalize_site_url("acme.atlassian.net").is_err());
        assert_eq!(
            normalize_site_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080"
        );
    }
}
