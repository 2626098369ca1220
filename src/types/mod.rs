mod attachment;
mod comment;
mod issue;
mod key;
mod link;
mod priority;
mod project;
mod transition;
mod user;

pub use attachment::Attachment;
pub use comment::{Comment, CommentPage};
pub use issue::{CreatedIssue, Issue, Status};
pub use key::IssueKey;
pub use link::{IssueLink, LinkKind};
pub use priority::{colored_priority, Priority};
pub use project::Project;
pub use transition::{Transition, TransitionsResponse};
pub use user::User;
