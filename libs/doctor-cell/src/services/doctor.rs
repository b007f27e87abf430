use tracing::debug;

use shared_api::{Resource, ResourceClient};
use shared_config::ApiConfig;
use shared_models::{ApiError, ResolvedPage, Session};

use crate::models::{CreateDoctorRequest, Doctor, DoctorQuery};

pub struct DoctorService {
    resources: ResourceClient,
}

impl DoctorService {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            resources: ResourceClient::new(config),
        }
    }

    pub fn with_resources(resources: ResourceClient) -> Self {
        Self { resources }
    }

    pub async fn get_by_id(&self, id: i64, session: &Session) -> Result<Doctor, ApiError> {
        self.resources.get_one(id, session).await
    }

    pub async fn get(
        &self,
        query: &DoctorQuery,
        session: &Session,
    ) -> Result<ResolvedPage<Doctor>, ApiError> {
        debug!("Fetching doctors page with query: {:?}", query);
        self.resources.get_page(&query.to_params(), session).await
    }

    pub async fn create(
        &self,
        request: &CreateDoctorRequest,
        session: &Session,
    ) -> Result<i64, ApiError> {
        debug!("Creating doctor record for: {}", request.name);
        self.resources
            .create_one(Doctor::KIND, &request.to_payload(), session)
            .await
    }

    pub async fn update(&self, doctor: &Doctor, session: &Session) -> Result<i64, ApiError> {
        debug!("Updating doctor record: {}", doctor.id);
        self.resources
            .replace_one(Doctor::KIND, doctor.id, &doctor.to_payload(), session)
            .await
    }

    pub async fn delete(&self, id: i64, session: &Session) -> Result<(), ApiError> {
        debug!("Deleting doctor record: {}", id);
        self.resources.delete_one(Doctor::KIND, id, session).await
    }
}
