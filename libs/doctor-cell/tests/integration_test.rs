use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{CreateDoctorRequest, DoctorQuery, Gender};
use doctor_cell::services::DoctorService;
use shared_api::{ResourceClient, SharedCache, STALE_AFTER};
use shared_config::ApiConfig;
use shared_utils::test_utils::{MockApiResponses, TestSession};

fn test_service(base_url: &str) -> DoctorService {
    let config = ApiConfig {
        api_base_url: base_url.to_string(),
        auth_domain: "auth.example.com".to_string(),
        auth_client_id: "test-client".to_string(),
    };
    DoctorService::with_resources(ResourceClient::with_cache(
        &config,
        Arc::new(SharedCache::new(STALE_AFTER)),
    ))
}

#[tokio::test]
async fn listing_uses_the_singular_collection_path() {
    let mock_server = MockServer::start().await;
    let session = TestSession::reception();
    let service = test_service(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/doctor"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::page(
            &mock_server.uri(),
            "doctor",
            &[5],
            1,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doctor/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::doctor(5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = DoctorQuery {
        limit: Some(5),
        ..Default::default()
    };
    let page = service.get(&query, &session).await.unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].id, 5);
    assert_eq!(page.items[0].specialities, vec!["cardiology".to_string()]);
}

#[tokio::test]
async fn create_normalizes_the_phone_number() {
    let mock_server = MockServer::start().await;
    let session = TestSession::reception();
    let service = test_service(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/doctor"))
        .and(body_partial_json(json!({"phone_number": "+972541234567"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::created(6)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = CreateDoctorRequest {
        name: "Amit Shapiro".to_string(),
        gender: Gender::Male,
        phone_number: "054-123-4567".to_string(),
        specialities: vec!["dermatology".to_string()],
        special_note: None,
    };
    let id = service.create(&request, &session).await.unwrap();
    assert_eq!(id, 6);
}
