use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::types::{IssueKey, LinkKind, Priority};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "jira")]
#[command(about = "CLI for Jira Cloud issue tracking", version)]
#[command(after_help = "EXAMPLES:
    jira issues --mine                    List your open issues
    jira issue view ENG-123               View issue details
    jira issue create -s \"Title\"          Create a new issue
    jira issue move ENG-123 \"In Progress\" Transition an issue
    jira issue comment ENG-123 \"Note\"     Add a comment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show detailed error information and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage issues
    #[command(
        alias = "i",
        after_help = "EXAMPLES:
    jira issue list --mine --limit 10
    jira issue view ENG-123
    jira issue create -s \"Bug fix\" -d \"Description\" --priority high
    jira issue move ENG-123 \"In Progress\"
    jira issue close ENG-123"
    )]
    Issue {
        #[command(subcommand)]
        action: IssueCommands,
    },
    /// List issues (alias for 'issue list')
    #[command(
        alias = "is",
        after_help = "EXAMPLES:
    jira issues --mine
    jira issues --project ENG --status \"In Progress\"
    jira issues --jql \"sprint in openSprints()\" --limit 50"
    )]
    Issues(IssueListArgs),
    /// List projects
    #[command(
        alias = "p",
        after_help = "EXAMPLES:
    jira projects
    jira projects --format json"
    )]
    Projects,
    /// Show the authenticated user
    #[command(alias = "whoami")]
    Me,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    jira completions bash > ~/.bash_completion.d/jira
    jira completions zsh > ~/.zfunc/_jira
    jira completions fish > ~/.config/fish/completions/jira.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    jira init")]
    Init,
}

#[derive(Subcommand)]
pub enum IssueCommands {
    /// List issues
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    jira issue list --mine
    jira issue list --project ENG --status \"In Progress\""
    )]
    List(IssueListArgs),
    /// View issue details
    #[command(
        alias = "v",
        after_help = "EXAMPLES:
    jira issue view ENG-123
    jira issue view ENG-123 --comments"
    )]
    View(IssueViewArgs),
    /// Create a new issue
    #[command(
        alias = "c",
        after_help = "EXAMPLES:
    jira issue create -s \"Fix login bug\"
    jira issue create -s \"New feature\" -d \"Description\" --type Story --priority high"
    )]
    Create(IssueCreateArgs),
    /// Update an existing issue
    #[command(
        alias = "u",
        after_help = "EXAMPLES:
    jira issue update ENG-123 --summary \"Better title\"
    jira issue update ENG-123 --priority low --add-label backend"
    )]
    Update(IssueUpdateArgs),
    /// Assign an issue ("me", "none", or an account id)
    #[command(after_help = "EXAMPLES:
    jira issue assign ENG-123 me
    jira issue assign ENG-123 none")]
    Assign {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
        /// "me", "none", or an Atlassian account id
        assignee: String,
    },
    /// List the workflow transitions available for an issue
    #[command(after_help = "EXAMPLES:
    jira issue transitions ENG-123")]
    Transitions {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
    },
    /// Move an issue to another status
    #[command(after_help = "EXAMPLES:
    jira issue move ENG-123 \"In Progress\"
    jira issue move ENG-123 review")]
    Move {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
        /// Target status or transition name
        status: String,
    },
    /// Close an issue (apply the first transition into a done status)
    #[command(after_help = "EXAMPLES:
    jira issue close ENG-123")]
    Close {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
    },
    /// List comments on an issue
    #[command(after_help = "EXAMPLES:
    jira issue comments ENG-123")]
    Comments {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
    },
    /// Add a comment to an issue
    #[command(after_help = "EXAMPLES:
    jira issue comment ENG-123 \"This is a comment\"")]
    Comment(CommentArgs),
    /// List links to other issues
    #[command(after_help = "EXAMPLES:
    jira issue links ENG-123")]
    Links {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
    },
    /// Link two issues
    #[command(after_help = "EXAMPLES:
    jira issue link ENG-123 blocks ENG-456
    jira issue link ENG-123 duplicates ENG-456")]
    Link(LinkArgs),
    /// Remove the link between two issues
    #[command(after_help = "EXAMPLES:
    jira issue unlink ENG-123 ENG-456")]
    Unlink {
        /// Source issue key
        source: IssueKey,
        /// Target issue key
        target: IssueKey,
    },
    /// List attachments on an issue
    #[command(after_help = "EXAMPLES:
    jira issue attachments ENG-123")]
    Attachments {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
    },
    /// Upload a file and attach it to an issue
    #[command(after_help = "EXAMPLES:
    jira issue upload ENG-123 ./screenshot.png")]
    Upload(UploadFileArgs),
    /// Print the web URL of an issue
    #[command(after_help = "EXAMPLES:
    jira issue open ENG-123")]
    Open {
        /// Issue key (e.g., ENG-123)
        key: IssueKey,
    },
}

#[derive(Args, Clone, Debug)]
pub struct IssueListArgs {
    /// Show only issues assigned to me
    #[arg(long, conflicts_with = "assignee")]
    pub mine: bool,

    /// Filter by assignee ("me", "none", or an account id)
    #[arg(long)]
    pub assignee: Option<String>,

    /// Filter by project key (uses default if not specified)
    #[arg(long)]
    pub project: Option<String>,

    /// Filter by status name
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by issue type (e.g., Bug)
    #[arg(long = "type")]
    pub issue_type: Option<String>,

    /// Filter by label
    #[arg(long)]
    pub label: Option<String>,

    /// Full-text search
    #[arg(long)]
    pub text: Option<String>,

    /// Extra JQL, ANDed with the other filters
    #[arg(long)]
    pub jql: Option<String>,

    /// Maximum number of issues to show
    #[arg(long, short, default_value = "25")]
    pub limit: u32,

    /// Fetch all results (may be slow for large result sets)
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct IssueViewArgs {
    /// Issue key (e.g., ENG-123)
    pub key: IssueKey,

    /// Include comments
    #[arg(long)]
    pub comments: bool,
}

#[derive(Args, Debug)]
pub struct IssueCreateArgs {
    /// Issue summary (title)
    #[arg(long, short)]
    pub summary: String,

    /// Issue description
    #[arg(long, short)]
    pub description: Option<String>,

    /// Project key (uses default if not specified)
    #[arg(long)]
    pub project: Option<String>,

    /// Issue type name (defaults to default_issue_type, then Task)
    #[arg(long = "type")]
    pub issue_type: Option<String>,

    /// Priority level
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Label to add (repeatable)
    #[arg(long = "label")]
    pub labels: Vec<String>,

    /// Assign to "me" or an account id
    #[arg(long)]
    pub assignee: Option<String>,

    /// Parent issue key (creates a sub-task or child issue)
    #[arg(long)]
    pub parent: Option<IssueKey>,
}

#[derive(Args, Debug)]
pub struct IssueUpdateArgs {
    /// Issue key (e.g., ENG-123)
    pub key: IssueKey,

    /// New summary
    #[arg(long)]
    pub summary: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New priority level
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Label to add (repeatable)
    #[arg(long = "add-label")]
    pub add_labels: Vec<String>,

    /// Label to remove (repeatable)
    #[arg(long = "remove-label")]
    pub remove_labels: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Issue key (e.g., ENG-123)
    pub key: IssueKey,

    /// Comment body (blank lines separate paragraphs)
    pub body: String,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Source issue key (e.g., ENG-123)
    pub source: IssueKey,

    /// Link type
    #[arg(value_enum)]
    pub kind: LinkKind,

    /// Target issue key (e.g., ENG-456)
    pub target: IssueKey,
}

#[derive(Args, Debug)]
pub struct UploadFileArgs {
    /// Issue key (e.g., ENG-123)
    pub key: IssueKey,

    /// Path to file to upload
    pub file: PathBuf,
}
