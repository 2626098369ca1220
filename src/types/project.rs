use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "projectTypeKey", default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub lead: Option<ProjectLead>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ProjectLead {
    #[serde(rename = "displayName")]
    pub display_name: String,
}
