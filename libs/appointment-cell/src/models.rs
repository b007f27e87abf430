use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_api::Resource;

/// Snapshot of an appointment as served by the API. `doctor_id` is always
/// present; `patient_id` is present iff the slot is assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    pub doctor_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub approved_by_patient: bool,
    pub visited: bool,
}

impl Resource for Appointment {
    const KIND: &'static str = "appointments";
}

impl Appointment {
    pub fn is_assigned(&self) -> bool {
        self.patient_id.is_some()
    }

    /// Whole-resource PUT body. `patient_id` is omitted, not null, when
    /// the slot is unassigned.
    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        if let Some(patient_id) = self.patient_id {
            body.insert("patient_id".into(), json!(patient_id));
        }
        body.insert("doctor_id".into(), json!(self.doctor_id));
        body.insert("start_time".into(), json!(self.start_time.to_rfc3339()));
        body.insert("end_time".into(), json!(self.end_time.to_rfc3339()));
        body.insert(
            "approved_by_patient".into(),
            json!(self.approved_by_patient),
        );
        body.insert("visited".into(), json!(self.visited));
        Value::Object(body)
    }
}

/// Load state of a lazily resolved cross-entity reference. Rendering code
/// gets the partial-load states explicitly instead of a nullable field.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkState<T> {
    Unloaded,
    Loading,
    Loaded(T),
    Failed,
}

impl<T> LinkState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LinkState::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LinkState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// An appointment plus the load state of its doctor and patient links, for
/// calendar rows that render before the links resolve.
#[derive(Debug, Clone)]
pub struct ScheduledAppointment {
    pub appointment: Appointment,
    pub(crate) doctor: LinkState<Doctor>,
    pub(crate) patient: LinkState<Patient>,
}

impl ScheduledAppointment {
    pub fn new(appointment: Appointment) -> Self {
        Self {
            appointment,
            doctor: LinkState::Unloaded,
            patient: LinkState::Unloaded,
        }
    }

    pub fn doctor(&self) -> &LinkState<Doctor> {
        &self.doctor
    }

    pub fn patient(&self) -> &LinkState<Patient> {
        &self.patient
    }

    fn doctor_label(&self) -> String {
        match self.doctor.loaded() {
            Some(doctor) => doctor.name.clone(),
            None => self.appointment.doctor_id.to_string(),
        }
    }

    fn patient_label(&self) -> Option<String> {
        let patient_id = self.appointment.patient_id?;
        Some(match self.patient.loaded() {
            Some(patient) => patient.name.clone(),
            None => patient_id.to_string(),
        })
    }

    /// Display line for calendar cells. Falls back to raw ids until the
    /// lazy links finish loading.
    pub fn subject(&self) -> String {
        match self.patient_label() {
            Some(patient) => format!("{} visits Dr. {}", patient, self.doctor_label()),
            None => format!("Dr. {} available", self.doctor_label()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAppointmentRequest {
    pub doctor_id: i64,
    pub patient_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CreateAppointmentRequest {
    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        if let Some(patient_id) = self.patient_id {
            body.insert("patient_id".into(), json!(patient_id));
        }
        body.insert("doctor_id".into(), json!(self.doctor_id));
        body.insert("start_time".into(), json!(self.start_time.to_rfc3339()));
        body.insert("end_time".into(), json!(self.end_time.to_rfc3339()));
        body.insert("approved_by_patient".into(), json!(false));
        body.insert("visited".into(), json!(false));
        Value::Object(body)
    }
}

/// Calendar filters. `doctor_id`/`patient_id` go on the wire under the
/// keys `doctor`/`patient`; absent filters are omitted entirely.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
}

impl AppointmentQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(date) = self.date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(doctor_id) = self.doctor_id {
            params.push(("doctor", doctor_id.to_string()));
        }
        if let Some(patient_id) = self.patient_id {
            params.push(("patient", patient_id.to_string()));
        }

        params
    }
}
