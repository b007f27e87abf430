use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared_api::Resource;

/// Snapshot of a staff task as served by the API. `created_at` is
/// server-assigned on creation.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub complete: bool,
    pub patient_id: i64,
    pub expertise: Option<String>,
    pub title: String,
    pub description: String,
}

impl Resource for Task {
    const KIND: &'static str = "tasks";
}

impl Task {
    /// Whole-resource PUT body; `created_at` stays with the server.
    pub fn to_payload(&self) -> Value {
        json!({
            "complete": self.complete,
            "patient_id": self.patient_id,
            "expertise": self.expertise,
            "title": self.title,
            "description": self.description,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub patient_id: i64,
    pub expertise: Option<String>,
    pub title: String,
    pub description: String,
}

impl CreateTaskRequest {
    pub fn to_payload(&self) -> Value {
        json!({
            "complete": false,
            "patient_id": self.patient_id,
            "expertise": self.expertise,
            "title": self.title,
            "description": self.description,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub patient_id: Option<i64>,
    pub search: Option<String>,
}

impl TaskQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(patient_id) = self.patient_id {
            params.push(("patient", patient_id.to_string()));
        }
        if let Some(search) = &self.search {
            if !search.is_empty() {
                params.push(("search", search.clone()));
            }
        }

        params
    }
}
