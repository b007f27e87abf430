use chrono::NaiveDate;
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalId {
    pub id: String,
    #[serde(rename = "type")]
    pub id_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub closeness: String,
    pub phone: String,
}

impl EmergencyContact {
    fn to_payload(&self) -> Value {
        json!({
            "name": self.name,
            "closeness": self.closeness,
            "phone": normalize_phone(&self.phone),
        })
    }
}

/// Snapshot of a patient as served by the API. `id` is the only stable
/// identity; `age` is server-computed from `birth_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub active: bool,
    pub name: String,
    pub personal_id: PersonalId,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub languages: Vec<String>,
    pub age: i64,
    pub birth_date: NaiveDate,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub referred_by: Option<String>,
    pub special_note: Option<String>,
}

impl Resource for Patient {
    const KIND: &'static str = "patients";
}

impl Patient {
    /// Whole-resource PUT body: the current snapshot with outbound
    /// formatting applied (E.164 phone numbers, date-only birth date).
    pub fn to_payload(&self) -> Value {
        json!({
            "active": self.active,
            "name": self.name,
            "personal_id": self.personal_id,
            "gender": self.gender,
            "phone_number": self.phone_number.as_deref().map(normalize_phone),
            "languages": self.languages,
            "birth_date": self.birth_date.format("%Y-%m-%d").to_string(),
            "emergency_contacts": self.emergency_contacts
                .iter()
                .map(EmergencyContact::to_payload)
                .collect::<Vec<_>>(),
            "referred_by": self.referred_by,
            "special_note": self.special_note,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub personal_id: PersonalId,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub languages: Vec<String>,
    pub birth_date: NaiveDate,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub referred_by: Option<String>,
    pub special_note: Option<String>,
}

impl CreatePatientRequest {
    pub fn to_payload(&self) -> Value {
        json!({
            "active": true,
            "name": self.name,
            "personal_id": self.personal_id,
            "gender": self.gender,
            "phone_number": self.phone_number.as_deref().map(normalize_phone),
            "languages": self.languages,
            "birth_date": self.birth_date.format("%Y-%m-%d").to_string(),
            "emergency_contacts": self.emergency_contacts
                .iter()
                .map(EmergencyContact::to_payload)
                .collect::<Vec<_>>(),
            "referred_by": self.referred_by,
            "special_note": self.special_note,
        })
    }
}

/// List filters. Absent filters are omitted from the query string
/// entirely, never sent as empty strings.
#[derive(Debug, Clone, Default)]
pub struct PatientQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl PatientQuery {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_produces_no_params() {
        assert!(PatientQuery::default().to_params().is_empty());
    }

    #[test]
    fn empty_search_is_omitted() {
        let query = PatientQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(query.to_params().is_empty());
    }

    #[test]
    fn pagination_params_format_as_decimal_strings() {
        let query = PatientQuery {
            skip: Some(20),
            limit: Some(10),
            search: None,
        };
        assert_eq!(
            query.to_params(),
            vec![("skip", "20".to_string()), ("limit", "10".to_string())]
        );
    }

    #[test]
    fn create_payload_normalizes_phone_and_formats_date() {
        let request = CreatePatientRequest {
            name: "Noa Levi".to_string(),
            personal_id: PersonalId {
                id: "301234567".to_string(),
                id_type: "ID".to_string(),
            },
            gender: Gender::Female,
            phone_number: Some("0501234567".to_string()),
            languages: vec!["hebrew".to_string()],
            birth_date: NaiveDate::from_ymd_opt(1991, 4, 2).unwrap(),
            emergency_contacts: vec![EmergencyContact {
                name: "Dana".to_string(),
                closeness: "sister".to_string(),
                phone: "052-123-4567".to_string(),
            }],
            referred_by: None,
            special_note: None,
        };

        let payload = request.to_payload();
        assert_eq!(payload["phone_number"], "+972501234567");
        assert_eq!(payload["birth_date"], "1991-04-02");
        assert_eq!(payload["emergency_contacts"][0]["phone"], "+972521234567");
        assert_eq!(payload["personal_id"]["type"], "ID");
    }
}
