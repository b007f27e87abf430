use tracing::debug;

use shared_api::{Resource, ResourceClient};
use shared_config::ApiConfig;
use shared_models::{ApiError, ResolvedPage, Session};

use crate::models::{CreateTaskRequest, Task, TaskQuery};

pub struct TaskService {
    resources: ResourceClient,
}

impl TaskService {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            resources: ResourceClient::new(config),
        }
    }

    pub fn with_resources(resources: ResourceClient) -> Self {
        Self { resources }
    }

    pub async fn get_by_id(&self, id: i64, session: &Session) -> Result<Task, ApiError> {
        self.resources.get_one(id, session).await
    }

    pub async fn get(
        &self,
        query: &TaskQuery,
        session: &Session,
    ) -> Result<ResolvedPage<Task>, ApiError> {
        debug!("Fetching tasks page with query: {:?}", query);
        self.resources.get_page(&query.to_params(), session).await
    }

    pub async fn create(
        &self,
        request: &CreateTaskRequest,
        session: &Session,
    ) -> Result<i64, ApiError> {
        debug!("Creating task: {}", request.title);
        self.resources
            .create_one(Task::KIND, &request.to_payload(), session)
            .await
    }

    pub async fn update(&self, task: &Task, session: &Session) -> Result<i64, ApiError> {
        debug!("Updating task: {}", task.id);
        self.resources
            .replace_one(Task::KIND, task.id, &task.to_payload(), session)
            .await
    }

    /// Flip the task's completion flag via a whole-snapshot update, the
    /// way the task list toggles rows.
    pub async fn set_complete(
        &self,
        task: &Task,
        complete: bool,
        session: &Session,
    ) -> Result<i64, ApiError> {
        let mut payload = task.to_payload();
        payload["complete"] = serde_json::json!(complete);
        self.resources
            .replace_one(Task::KIND, task.id, &payload, session)
            .await
    }

    pub async fn delete(&self, id: i64, session: &Session) -> Result<(), ApiError> {
        debug!("Deleting task: {}", id);
        self.resources.delete_one(Task::KIND, id, session).await
    }
}
