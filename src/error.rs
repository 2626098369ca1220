use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JiraError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Failed to save config file at {path}: {source}")]
    ConfigSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("No Jira site URL found. Set JIRA_URL env var or add url to ~/.config/jira/config.toml")]
    MissingUrl,

    #[error("No Jira account email found. Set JIRA_EMAIL env var or add email to ~/.config/jira/config.toml")]
    MissingEmail,

    #[error(
        "No API token found. Set JIRA_API_TOKEN env var or add api_token to ~/.config/jira/config.toml"
    )]
    MissingApiToken,

    #[error("Project not specified and no default_project in config")]
    NoProject,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid issue key: {0} (expected something like ENG-123)")]
    InvalidIssueKey(String),

    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error("No transition of {key} matches \"{wanted}\" (available: {available})")]
    TransitionNotFound {
        key: String,
        wanted: String,
        available: String,
    },

    #[error("No link between {0} and {1}")]
    LinkNotFound(String, String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File upload failed (status {status}): {message}")]
    UploadFailed { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, JiraError>;
