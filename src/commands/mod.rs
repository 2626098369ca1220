pub mod attachments;
pub mod comments;
pub mod init;
pub mod issues;
pub mod links;
pub mod me;
pub mod projects;
pub mod transitions;
