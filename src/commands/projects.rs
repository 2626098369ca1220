use tabled::Tabled;

use crate::client::JiraClient;
use crate::error::Result;
use crate::output;
use crate::responses::ProjectPage;
use crate::types::Project;

const PAGE_SIZE: usize = 50;

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    project_type: String,
    #[tabled(rename = "Lead")]
    lead: String,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            key: project.key.clone(),
            name: project.name.clone(),
            project_type: project.project_type.clone().unwrap_or_default(),
            lead: project
                .lead
                .as_ref()
                .map(|l| l.display_name.clone())
                .unwrap_or_default(),
        }
    }
}

/// Every project visible to the user, following offset pagination.
pub async fn fetch_all(client: &JiraClient) -> Result<Vec<Project>> {
    let mut projects = Vec::new();

    loop {
        let page: ProjectPage = client
            .get(
                "/project/search",
                &[
                    ("startAt", projects.len().to_string()),
                    ("maxResults", PAGE_SIZE.to_string()),
                    ("orderBy", "key".to_string()),
                    ("expand", "lead".to_string()),
                ],
            )
            .await?;

        tracing::debug!(start_at = page.start_at, count = page.values.len(), "fetched project page");
        let fetched = page.values.len();
        projects.extend(page.values);

        if page.is_last || fetched == 0 {
            break;
        }
    }

    Ok(projects)
}

pub async fn list(client: &JiraClient) -> Result<()> {
    let projects = fetch_all(client).await?;

    if projects.is_empty() {
        output::print_message("No projects found");
        return Ok(());
    }

    output::print_table(
        &projects,
        ProjectRow::from,
        |p| format!("{} {}", p.key, p.name),
    );

    Ok(())
}
