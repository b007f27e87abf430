use tracing::debug;

use shared_api::{Resource, ResourceClient};
use shared_config::ApiConfig;
use shared_models::{ApiError, ResolvedPage, Session};

use crate::models::{CreatePatientRequest, Patient, PatientQuery};

pub struct PatientService {
    resources: ResourceClient,
}

impl PatientService {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            resources: ResourceClient::new(config),
        }
    }

    pub fn with_resources(resources: ResourceClient) -> Self {
        Self { resources }
    }

    pub async fn get_by_id(&self, id: i64, session: &Session) -> Result<Patient, ApiError> {
        self.resources.get_one(id, session).await
    }

    pub async fn get(
        &self,
        query: &PatientQuery,
        session: &Session,
    ) -> Result<ResolvedPage<Patient>, ApiError> {
        debug!("Fetching patients page with query: {:?}", query);
        self.resources.get_page(&query.to_params(), session).await
    }

    pub async fn create(
        &self,
        request: &CreatePatientRequest,
        session: &Session,
    ) -> Result<i64, ApiError> {
        debug!("Creating patient record for: {}", request.name);
        self.resources
            .create_one(Patient::KIND, &request.to_payload(), session)
            .await
    }

    /// Push the entire current snapshot (whole-resource PUT). The cache
    /// entry is intentionally left alone; see `ResourceClient::replace_one`.
    pub async fn update(&self, patient: &Patient, session: &Session) -> Result<i64, ApiError> {
        debug!("Updating patient record: {}", patient.id);
        self.resources
            .replace_one(Patient::KIND, patient.id, &patient.to_payload(), session)
            .await
    }

    pub async fn delete(&self, id: i64, session: &Session) -> Result<(), ApiError> {
        debug!("Deleting patient record: {}", id);
        self.resources.delete_one(Patient::KIND, id, session).await
    }
}
