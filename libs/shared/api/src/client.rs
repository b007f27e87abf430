use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::ApiConfig;
use shared_models::{ApiError, Session};

/// Verb-scoped access to the clinic API. Each call attaches the session's
/// bearer token, performs exactly one round trip and classifies failures;
/// retries are a caller concern.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for an API path such as `/patients/12`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self, session: &Session) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&session.bearer()).unwrap(),
        );

        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        url: &str,
        session: &Session,
        body: Option<Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        debug!("{} {}", method, url);

        let mut req = self.client.request(method, url).headers(self.headers(session));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(ApiError::from_status(status, error_text));
        }

        let text = response.text().await.map_err(ApiError::from_transport)?;
        if text.is_empty() {
            // DELETE endpoints may answer with no body at all.
            serde_json::from_value(Value::Null).map_err(|e| ApiError::decode("response body", e))
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::decode("response body", e))
        }
    }

    pub async fn read<T>(&self, url: &str, session: &Session) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, url, session, None).await
    }

    pub async fn create<T, V>(&self, url: &str, session: &Session, body: &V) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        self.request(Method::POST, url, session, Some(to_body(body)?)).await
    }

    /// Whole-resource update.
    pub async fn replace<T, V>(&self, url: &str, session: &Session, body: &V) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        self.request(Method::PUT, url, session, Some(to_body(body)?)).await
    }

    pub async fn remove<T>(&self, url: &str, session: &Session) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::DELETE, url, session, None).await
    }
}

fn to_body<V: Serialize>(body: &V) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::decode("request body", e))
}
