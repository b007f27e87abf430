use std::sync::Arc;

use assert_matches::assert_matches;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{AppointmentQuery, LinkState, ScheduledAppointment};
use appointment_cell::services::AppointmentService;
use serde_json::json;
use shared_api::{NoopCache, ResourceClient, SharedCache, STALE_AFTER};
use shared_config::ApiConfig;
use shared_utils::test_utils::{MockApiResponses, TestSession};

fn test_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        api_base_url: base_url.to_string(),
        auth_domain: "auth.example.com".to_string(),
        auth_client_id: "test-client".to_string(),
    }
}

fn test_service(base_url: &str) -> AppointmentService {
    AppointmentService::with_resources(ResourceClient::with_cache(
        &test_config(base_url),
        Arc::new(SharedCache::new(STALE_AFTER)),
    ))
}

/// Service with caching disabled, to observe every upstream call.
fn uncached_service(base_url: &str) -> AppointmentService {
    AppointmentService::with_resources(ResourceClient::with_cache(
        &test_config(base_url),
        Arc::new(NoopCache),
    ))
}

#[tokio::test]
async fn date_filter_formats_as_date_only_and_omits_absent_filters() {
    let mock_server = MockServer::start().await;
    let session = TestSession::reception();
    let service = test_service(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("date", "2024-01-15"))
        .and(query_param_is_missing("doctor"))
        .and(query_param_is_missing("patient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::page(
            &mock_server.uri(),
            "appointments",
            &[],
            0,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = AppointmentQuery {
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15),
        ..Default::default()
    };
    let page = service.get(&query, &session).await.unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn assigning_a_patient_links_and_invalidates() {
    let mock_server = MockServer::start().await;
    let session = TestSession::reception();
    let service = test_service(&mock_server.uri());

    // Unassigned before the mutation, assigned after; the second GET only
    // happens because set_field invalidated the cache entry.
    Mock::given(method("GET"))
        .and(path("/appointments/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment(3, 5, None)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/appointments/3/patient"))
        .and(body_json(json!({"patient_id": 7})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::linked("patient", 7)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = service.get_by_id(3, &session).await.unwrap();
    assert!(!appointment.is_assigned());

    let linked = service.assign_patient(3, 7, &session).await.unwrap();
    assert_eq!(linked, 7);

    Mock::given(method("GET"))
        .and(path("/appointments/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment(3, 5, Some(7))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = service.get_by_id(3, &session).await.unwrap();
    assert_eq!(appointment.patient_id, Some(7));
}

#[tokio::test]
async fn clearing_a_patient_returns_the_previously_linked_id() {
    let mock_server = MockServer::start().await;
    let session = TestSession::reception();
    let service = test_service(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/appointments/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment(3, 5, Some(7))),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/appointments/3/patient"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::linked("patient", 7)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = service.get_by_id(3, &session).await.unwrap();
    assert!(appointment.is_assigned());

    let previous = service.clear_patient(3, &session).await.unwrap();
    assert_eq!(previous, 7);

    Mock::given(method("GET"))
        .and(path("/appointments/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment(3, 5, None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = service.get_by_id(3, &session).await.unwrap();
    assert_eq!(appointment.patient_id, None);
}

#[tokio::test]
async fn link_loading_is_idempotent_and_feeds_the_subject_line() {
    let mock_server = MockServer::start().await;
    let session = TestSession::reception();
    let service = uncached_service(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/appointments/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment(3, 5, Some(7))),
        )
        .mount(&mock_server)
        .await;
    // One call each even though load_* runs twice: the LinkState guard
    // stops the second round trip before the (disabled) cache could.
    Mock::given(method("GET"))
        .and(path("/doctor/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::doctor(5)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::patient(7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = service.get_by_id(3, &session).await.unwrap();
    let mut scheduled = ScheduledAppointment::new(appointment);
    assert_eq!(scheduled.subject(), "7 visits Dr. 5");

    for _ in 0..2 {
        service.load_doctor(&mut scheduled, &session).await.unwrap();
        service.load_patient(&mut scheduled, &session).await.unwrap();
    }

    assert!(scheduled.doctor().is_loaded());
    assert!(scheduled.patient().is_loaded());
    assert_eq!(scheduled.subject(), "Patient 7 visits Dr. Doctor 5");
}

#[tokio::test]
async fn failed_link_load_is_surfaced_as_failed_state() {
    let mock_server = MockServer::start().await;
    let session = TestSession::reception();
    let service = uncached_service(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/appointments/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment(3, 5, None)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doctor/5"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&mock_server)
        .await;

    let appointment = service.get_by_id(3, &session).await.unwrap();
    let mut scheduled = ScheduledAppointment::new(appointment);

    let result = service.load_doctor(&mut scheduled, &session).await;
    assert!(result.is_err());
    assert_matches!(scheduled.doctor(), LinkState::Failed);

    // Unassigned slot: loading the patient is a no-op, not an error.
    service.load_patient(&mut scheduled, &session).await.unwrap();
    assert_matches!(scheduled.patient(), LinkState::Unloaded);
}
