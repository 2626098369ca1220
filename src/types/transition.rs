use serde::{Deserialize, Serialize};

use super::Status;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Transition {
    pub id: String,
    pub name: String,
    /// Status the issue lands in after the transition.
    pub to: Status,
}

#[derive(Deserialize)]
pub struct TransitionsResponse {
    pub transitions: Vec<Transition>,
}
