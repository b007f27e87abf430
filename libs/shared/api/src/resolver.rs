use std::sync::Arc;

use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use shared_config::ApiConfig;
use shared_models::{ApiError, CreatedId, Page, ResolvedPage, ResourceRef, Session};

use crate::cache::{process_cache, EntityCache, FetchFuture};
use crate::client::ApiClient;

/// Resource descriptor: ties a wire-scheme type to its collection name so
/// URLs and cache keys derive from the type instead of runtime metadata.
pub trait Resource: DeserializeOwned + Send {
    /// Path segment of the collection, e.g. `patients`. Note the doctor
    /// collection is singular on the wire.
    const KIND: &'static str;
}

/// Cache-coherent list/detail access over the fetch primitives. One
/// instance per service; all instances built with `new` share the
/// process-wide cache.
#[derive(Clone)]
pub struct ResourceClient {
    client: ApiClient,
    cache: Arc<dyn EntityCache>,
}

impl ResourceClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: ApiClient::new(config),
            cache: process_cache(),
        }
    }

    /// Same client with the cache swapped out, for suites that need a
    /// deterministic or disabled cache.
    pub fn with_cache(config: &ApiConfig, cache: Arc<dyn EntityCache>) -> Self {
        Self {
            client: ApiClient::new(config),
            cache,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Cache-checked single fetch of `GET /{kind}/{id}`.
    pub async fn get_one<T: Resource>(&self, id: i64, session: &Session) -> Result<T, ApiError> {
        let url = self.client.url_for(&format!("/{}/{}", T::KIND, id));
        let value = self
            .cache
            .get_or_fetch((T::KIND, id), self.fetch_value(url, session))
            .await?;
        serde_json::from_value(value).map_err(|e| ApiError::decode(T::KIND, e))
    }

    /// Fetch one paginated envelope and resolve every reference to a full
    /// entity, concurrently and in envelope order. All-or-nothing: a
    /// single failed resolution fails the whole page.
    pub async fn get_page<T: Resource>(
        &self,
        params: &[(&str, String)],
        session: &Session,
    ) -> Result<ResolvedPage<T>, ApiError> {
        let url = self
            .client
            .url_for(&format!("/{}{}", T::KIND, query_string(params)));
        let page: Page = self.client.read(&url, session).await?;

        debug!(
            "Resolving {} of {} {} references",
            page.results.len(),
            page.count,
            T::KIND
        );

        let items = try_join_all(
            page.results
                .iter()
                .map(|reference| self.resolve_ref::<T>(reference, session)),
        )
        .await?;

        Ok(ResolvedPage {
            items,
            count: page.count,
        })
    }

    /// References normally carry a trailing numeric id and route through
    /// the cache; malformed ones fall back to an uncached direct fetch of
    /// the reference URL.
    async fn resolve_ref<T: Resource>(
        &self,
        reference: &ResourceRef,
        session: &Session,
    ) -> Result<T, ApiError> {
        match trailing_id(&reference.url) {
            Some(id) => self.get_one::<T>(id, session).await,
            None => {
                debug!(
                    "Reference {:?} has no numeric tail, fetching directly",
                    reference.url
                );
                self.client.read(&reference.url, session).await
            }
        }
    }

    pub async fn create_one<V: Serialize>(
        &self,
        kind: &'static str,
        body: &V,
        session: &Session,
    ) -> Result<i64, ApiError> {
        let url = self.client.url_for(&format!("/{}", kind));
        let created: CreatedId = self.client.create(&url, session, body).await?;
        Ok(created.id)
    }

    pub async fn delete_one(
        &self,
        kind: &'static str,
        id: i64,
        session: &Session,
    ) -> Result<(), ApiError> {
        let url = self.client.url_for(&format!("/{}/{}", kind, id));
        let _: Value = self.client.remove(&url, session).await?;
        self.cache.invalidate((kind, id));
        Ok(())
    }

    /// Whole-resource PUT. Contract: does NOT invalidate the cache entry.
    /// After a replace the caller's in-memory snapshot is the source of
    /// truth, so a cached read may still return the pre-update snapshot
    /// until the entry goes stale or a delete/field mutation drops it.
    pub async fn replace_one<V: Serialize>(
        &self,
        kind: &'static str,
        id: i64,
        body: &V,
        session: &Session,
    ) -> Result<i64, ApiError> {
        let url = self.client.url_for(&format!("/{}/{}", kind, id));
        let updated: CreatedId = self.client.replace(&url, session, body).await?;
        Ok(updated.id)
    }

    /// `PUT /{kind}/{id}/{field}` with `{ "<field>_id": n }`. Returns the
    /// newly linked id and forces the next read of the entity fresh.
    pub async fn set_field<V: Serialize>(
        &self,
        kind: &'static str,
        id: i64,
        field: &str,
        body: &V,
        session: &Session,
    ) -> Result<i64, ApiError> {
        let url = self.client.url_for(&format!("/{}/{}/{}", kind, id, field));
        let linked: Value = self.client.replace(&url, session, body).await?;
        self.cache.invalidate((kind, id));
        linked_id(field, &linked)
    }

    /// `DELETE /{kind}/{id}/{field}`. Returns the previously linked id and
    /// forces the next read of the entity fresh.
    pub async fn clear_field(
        &self,
        kind: &'static str,
        id: i64,
        field: &str,
        session: &Session,
    ) -> Result<i64, ApiError> {
        let url = self.client.url_for(&format!("/{}/{}/{}", kind, id, field));
        let linked: Value = self.client.remove(&url, session).await?;
        self.cache.invalidate((kind, id));
        linked_id(field, &linked)
    }

    fn fetch_value(&self, url: String, session: &Session) -> FetchFuture {
        let client = self.client.clone();
        let session = session.clone();
        Box::pin(async move { client.read::<Value>(&url, &session).await })
    }
}

fn linked_id(field: &str, body: &Value) -> Result<i64, ApiError> {
    let key = format!("{}_id", field);
    body.get(&key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::decode(&key, "missing or non-numeric linked id"))
}

fn trailing_id(url: &str) -> Option<i64> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Build a query string from already-formatted pairs. Empty params give an
/// empty string so the server sees an unfiltered query.
pub fn query_string(params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    format!("?{}", parts.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trailing_id_parses_numeric_tails() {
        assert_eq!(trailing_id("http://api/patients/42"), Some(42));
        assert_eq!(trailing_id("http://api/patients/42/"), Some(42));
        assert_eq!(trailing_id("http://api/patients/latest"), None);
        assert_eq!(trailing_id(""), None);
    }

    #[test]
    fn query_string_omits_nothing_and_encodes_values() {
        assert_eq!(query_string(&[]), "");
        assert_eq!(
            query_string(&[("skip", "20".to_string()), ("limit", "10".to_string())]),
            "?skip=20&limit=10"
        );
        assert_eq!(
            query_string(&[("search", "cohen levi".to_string())]),
            "?search=cohen%20levi"
        );
    }

    #[test]
    fn linked_id_reads_the_field_key() {
        assert_eq!(linked_id("patient", &json!({"patient_id": 7})).unwrap(), 7);
        assert!(linked_id("patient", &json!({"doctor_id": 7})).is_err());
        assert!(linked_id("patient", &json!({"patient_id": "7"})).is_err());
    }
}
