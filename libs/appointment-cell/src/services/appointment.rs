use serde_json::json;
use tracing::debug;

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_api::{Resource, ResourceClient};
use shared_config::ApiConfig;
use shared_models::{ApiError, ResolvedPage, Session};

use crate::models::{
    Appointment, AppointmentQuery, CreateAppointmentRequest, LinkState, ScheduledAppointment,
};

pub struct AppointmentService {
    resources: ResourceClient,
}

impl AppointmentService {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            resources: ResourceClient::new(config),
        }
    }

    pub fn with_resources(resources: ResourceClient) -> Self {
        Self { resources }
    }

    pub async fn get_by_id(&self, id: i64, session: &Session) -> Result<Appointment, ApiError> {
        self.resources.get_one(id, session).await
    }

    pub async fn get(
        &self,
        query: &AppointmentQuery,
        session: &Session,
    ) -> Result<ResolvedPage<Appointment>, ApiError> {
        debug!("Fetching appointments page with query: {:?}", query);
        self.resources.get_page(&query.to_params(), session).await
    }

    pub async fn create(
        &self,
        request: &CreateAppointmentRequest,
        session: &Session,
    ) -> Result<i64, ApiError> {
        debug!("Creating appointment for doctor: {}", request.doctor_id);
        self.resources
            .create_one(Appointment::KIND, &request.to_payload(), session)
            .await
    }

    pub async fn update(
        &self,
        appointment: &Appointment,
        session: &Session,
    ) -> Result<i64, ApiError> {
        debug!("Updating appointment: {}", appointment.id);
        self.resources
            .replace_one(
                Appointment::KIND,
                appointment.id,
                &appointment.to_payload(),
                session,
            )
            .await
    }

    pub async fn delete(&self, id: i64, session: &Session) -> Result<(), ApiError> {
        debug!("Deleting appointment: {}", id);
        self.resources
            .delete_one(Appointment::KIND, id, session)
            .await
    }

    /// Assign a patient to the appointment's slot via the field-scoped
    /// mutation. Returns the newly linked patient id; the appointment's
    /// cache entry is invalidated so the next read sees the assignment.
    pub async fn assign_patient(
        &self,
        appointment_id: i64,
        patient_id: i64,
        session: &Session,
    ) -> Result<i64, ApiError> {
        debug!(
            "Assigning patient {} to appointment {}",
            patient_id, appointment_id
        );
        self.resources
            .set_field(
                Appointment::KIND,
                appointment_id,
                "patient",
                &json!({ "patient_id": patient_id }),
                session,
            )
            .await
    }

    /// Unassign the appointment's patient. Returns the previously linked
    /// patient id so callers can reconcile UI state without a refetch.
    pub async fn clear_patient(
        &self,
        appointment_id: i64,
        session: &Session,
    ) -> Result<i64, ApiError> {
        debug!("Clearing patient from appointment {}", appointment_id);
        self.resources
            .clear_field(Appointment::KIND, appointment_id, "patient", session)
            .await
    }

    /// Resolve the appointment's doctor link. Idempotent: a no-op once
    /// loaded, never re-fetched until the outer cache turns over.
    pub async fn load_doctor(
        &self,
        scheduled: &mut ScheduledAppointment,
        session: &Session,
    ) -> Result<(), ApiError> {
        if scheduled.doctor.is_loaded() {
            return Ok(());
        }

        scheduled.doctor = LinkState::Loading;
        match self
            .resources
            .get_one::<Doctor>(scheduled.appointment.doctor_id, session)
            .await
        {
            Ok(doctor) => {
                scheduled.doctor = LinkState::Loaded(doctor);
                Ok(())
            }
            Err(err) => {
                scheduled.doctor = LinkState::Failed;
                Err(err)
            }
        }
    }

    /// Resolve the appointment's patient link. A no-op when already loaded
    /// or when the slot is unassigned.
    pub async fn load_patient(
        &self,
        scheduled: &mut ScheduledAppointment,
        session: &Session,
    ) -> Result<(), ApiError> {
        let Some(patient_id) = scheduled.appointment.patient_id else {
            return Ok(());
        };
        if scheduled.patient.is_loaded() {
            return Ok(());
        }

        scheduled.patient = LinkState::Loading;
        match self.resources.get_one::<Patient>(patient_id, session).await {
            Ok(patient) => {
                scheduled.patient = LinkState::Loaded(patient);
                Ok(())
            }
            Err(err) => {
                scheduled.patient = LinkState::Failed;
                Err(err)
            }
        }
    }
}
