use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared_api::Resource;
use shared_utils::normalize_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Unspecified,
    Male,
    Female,
}

/// Snapshot of a doctor as served by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub active: bool,
    pub name: String,
    pub gender: Gender,
    pub phone_number: String,
    pub specialities: Vec<String>,
    pub special_note: Option<String>,
}

impl Resource for Doctor {
    // Singular on the wire; server quirk.
    const KIND: &'static str = "doctor";
}

impl Doctor {
    pub fn to_payload(&self) -> Value {
        json!({
            "active": self.active,
            "name": self.name,
            "gender": self.gender,
            "phone_number": normalize_phone(&self.phone_number),
            "specialities": self.specialities,
            "special_note": self.special_note,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub gender: Gender,
    pub phone_number: String,
    pub specialities: Vec<String>,
    pub special_note: Option<String>,
}

impl CreateDoctorRequest {
    pub fn to_payload(&self) -> Value {
        json!({
            "active": true,
            "name": self.name,
            "gender": self.gender,
            "phone_number": normalize_phone(&self.phone_number),
            "specialities": self.specialities,
            "special_note": self.special_note,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoctorQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl DoctorQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(search) = &self.search {
            if !search.is_empty() {
                params.push(("search", search.clone()));
            }
        }

        params
    }
}
