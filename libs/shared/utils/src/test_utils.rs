use serde_json::{json, Map, Value};

use shared_models::Session;

pub struct TestSession;

impl TestSession {
    pub fn reception() -> Session {
        Session::new("test-access-token", "reception")
    }

    pub fn named(username: &str) -> Session {
        Session::new("test-access-token", username)
    }
}

/// Canned wire-scheme bodies for wiremock suites, one builder per resource
/// kind plus the envelope and mutation payloads.
pub struct MockApiResponses;

impl MockApiResponses {
    pub fn patient(id: i64) -> Value {
        json!({
            "id": id,
            "active": true,
            "name": format!("Patient {}", id),
            "personal_id": { "id": format!("30{:07}", id), "type": "ID" },
            "gender": "female",
            "phone_number": "+972501234567",
            "languages": ["hebrew", "english"],
            "age": 34,
            "birth_date": "1991-04-02",
            "emergency_contacts": [
                { "name": "Dana", "closeness": "sister", "phone": "+972521234567" }
            ],
            "referred_by": null,
            "special_note": null
        })
    }

    pub fn doctor(id: i64) -> Value {
        json!({
            "id": id,
            "active": true,
            "name": format!("Doctor {}", id),
            "gender": "male",
            "phone_number": "+972541234567",
            "specialities": ["cardiology"],
            "special_note": null
        })
    }

    pub fn appointment(id: i64, doctor_id: i64, patient_id: Option<i64>) -> Value {
        let mut body = Map::new();
        body.insert("id".into(), json!(id));
        body.insert("doctor_id".into(), json!(doctor_id));
        if let Some(patient_id) = patient_id {
            body.insert("patient_id".into(), json!(patient_id));
        }
        body.insert("start_time".into(), json!("2024-01-15T09:00:00Z"));
        body.insert("end_time".into(), json!("2024-01-15T09:30:00Z"));
        body.insert("approved_by_patient".into(), json!(false));
        body.insert("visited".into(), json!(false));
        Value::Object(body)
    }

    pub fn task(id: i64, patient_id: i64) -> Value {
        json!({
            "id": id,
            "created_at": "2024-01-10T12:00:00Z",
            "complete": false,
            "patient_id": patient_id,
            "expertise": null,
            "title": format!("Task {}", id),
            "description": "call back about test results"
        })
    }

    /// Paginated envelope whose references point back at `base_url`.
    pub fn page(base_url: &str, kind: &str, ids: &[i64], count: i64) -> Value {
        let results: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "name": format!("{} {}", kind, id),
                    "url": format!("{}/{}/{}", base_url, kind, id)
                })
            })
            .collect();
        json!({
            "count": count,
            "next": null,
            "previous": null,
            "results": results
        })
    }

    pub fn created(id: i64) -> Value {
        json!({ "id": id })
    }

    /// Field-scoped mutation response, e.g. `{"patient_id": 7}`.
    pub fn linked(field: &str, id: i64) -> Value {
        let mut body = Map::new();
        body.insert(format!("{}_id", field), json!(id));
        Value::Object(body)
    }
}
