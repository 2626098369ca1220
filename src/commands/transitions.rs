use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use crate::client::{not_found_as_issue, JiraClient};
use crate::error::{JiraError, Result};
use crate::output::{self, status_colored};
use crate::types::{IssueKey, Transition, TransitionsResponse};

#[derive(Tabled, Serialize, Clone)]
struct TransitionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Transition")]
    name: String,
    #[tabled(rename = "To Status")]
    to: String,
}

pub async fn fetch(client: &JiraClient, key: &IssueKey) -> Result<Vec<Transition>> {
    let response: TransitionsResponse = client
        .get(&format!("/issue/{key}/transitions"), &[])
        .await
        .map_err(not_found_as_issue(key.as_str()))?;
    Ok(response.transitions)
}

/// Find the transition matching `wanted` by transition name or target status.
///
/// Exact (case-insensitive) matches win over substring matches. A blank
/// target matches nothing.
pub fn select<'a>(transitions: &'a [Transition], wanted: &str) -> Option<&'a Transition> {
    let wanted = wanted.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let names = |t: &Transition| [t.name.to_lowercase(), t.to.name.to_lowercase()];

    transitions
        .iter()
        .find(|&t| names(t).iter().any(|n| *n == wanted))
        .or_else(|| {
            transitions
                .iter()
                .find(|&t| names(t).iter().any(|n| n.contains(&wanted)))
        })
}

/// First transition landing in a status of the `done` category.
pub fn select_done(transitions: &[Transition]) -> Option<&Transition> {
    transitions
        .iter()
        .find(|t| t.to.category_key() == Some("done"))
}

fn available(transitions: &[Transition]) -> String {
    if transitions.is_empty() {
        return "none".to_string();
    }
    transitions
        .iter()
        .map(|t| t.to.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn apply(client: &JiraClient, key: &IssueKey, transition: &Transition) -> Result<()> {
    client
        .post_empty(
            &format!("/issue/{key}/transitions"),
            &json!({ "transition": { "id": transition.id } }),
        )
        .await?;

    output::print_message(&format!(
        "Moved {} to {}",
        key,
        status_colored(&transition.to.name, transition.to.category_key())
    ));
    Ok(())
}

pub async fn list(client: &JiraClient, key: &IssueKey) -> Result<()> {
    let transitions = fetch(client, key).await?;

    if transitions.is_empty() {
        output::print_message(&format!("No transitions available for {key}"));
        return Ok(());
    }

    let rows: Vec<TransitionRow> = transitions
        .iter()
        .map(|t| TransitionRow {
            id: t.id.clone(),
            name: t.name.clone(),
            to: status_colored(&t.to.name, t.to.category_key()),
        })
        .collect();

    output::print_table(
        &rows,
        TransitionRow::clone,
        |row| format!("{} -> {}", row.name, row.to),
    );

    Ok(())
}

pub async fn move_to(client: &JiraClient, key: &IssueKey, status: &str) -> Result<()> {
    let transitions = fetch(client, key).await?;

    let transition = select(&transitions, status).ok_or_else(|| JiraError::TransitionNotFound {
        key: key.to_string(),
        wanted: status.to_string(),
        available: available(&transitions),
    })?;

    apply(client, key, transition).await
}

pub async fn close(client: &JiraClient, key: &IssueKey) -> Result<()> {
    let transitions = fetch(client, key).await?;

    let transition = select_done(&transitions).ok_or_else(|| JiraError::TransitionNotFound {
        key: key.to_string(),
        wanted: "done".to_string(),
        available: available(&transitions),
    })?;

    apply(client, key, transition).await
}
