use std::path::Path;

use tabled::Tabled;

use crate::cli::UploadFileArgs;
use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::output::{self, format_date, format_size, truncate};
use crate::types::{Attachment, IssueKey};

use super::issues::fetch_issue;

#[derive(Tabled)]
struct AttachmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Attachment> for AttachmentRow {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.clone(),
            filename: truncate(&attachment.filename, 40),
            size: format_size(attachment.size),
            author: attachment
                .author
                .as_ref()
                .map(|u| u.display_name.clone())
                .unwrap_or_default(),
            created: format_date(&attachment.created),
        }
    }
}

pub async fn list(client: &JiraClient, key: &IssueKey) -> Result<()> {
    let issue = fetch_issue(client, key, "summary,attachment").await?;
    let attachments = issue.fields.attachments;

    if attachments.is_empty() {
        output::print_message(&format!("No attachments found for {key}"));
        return Ok(());
    }

    output::print_table(
        &attachments,
        AttachmentRow::from,
        |attachment| {
            format!(
                "{} | {}",
                truncate(&attachment.filename, 40),
                attachment.content.as_deref().unwrap_or("-")
            )
        },
    );

    Ok(())
}

pub async fn upload_file(client: &JiraClient, args: UploadFileArgs) -> Result<()> {
    let path = args.file.as_path();

    if !path.is_file() {
        return Err(JiraError::FileNotFound(path.display().to_string()));
    }

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    let file_data = std::fs::read(path).map_err(|e| JiraError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    let content_type = guess_content_type(path);
    tracing::debug!(%filename, content_type, bytes = file_data.len(), "uploading attachment");

    let uploaded: Vec<Attachment> = client
        .upload(
            &format!("/issue/{}/attachments", args.key),
            filename.clone(),
            content_type,
            file_data,
        )
        .await
        .map_err(|err| match err {
            JiraError::UploadFailed { status: 404, .. } => {
                JiraError::IssueNotFound(args.key.to_string())
            }
            other => other,
        })?;

    if output::is_json_output() {
        output::print_item(&uploaded, |_| {});
    } else {
        output::print_message(&format!("Uploaded \"{}\" to {}", filename, args.key));
    }

    Ok(())
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn guesses_common_types() {
        assert_eq!(guess_content_type(Path::new("shot.PNG")), "image/png");
        assert_eq!(guess_content_type(Path::new("build.log")), "text/plain");
        assert_eq!(guess_content_type(Path::new("Makefile")), "application/octet-stream");
    }

    #[tokio::test]
    async fn missing_file_is_reported_before_any_request() {
        let server = MockServer::start().await;
        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let args = UploadFileArgs {
            key: "ENG-1".parse().unwrap(),
            file: PathBuf::from("/definitely/not/here.txt"),
        };

        let err = upload_file(&client, args).await.unwrap_err();
        assert!(matches!(err, JiraError::FileNotFound(_)));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn uploads_to_issue() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/ENG-1/attachments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "500",
                "filename": "notes.txt",
                "size": 5,
                "created": "2024-01-31T09:15:00.000+0000"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let client = JiraClient::new(server.uri(), "a@b.c", "t");
        let args = UploadFileArgs {
            key: "ENG-1".parse().unwrap(),
            file,
        };
        upload_file(&client, args).await.unwrap();
    }
}
