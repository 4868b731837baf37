//! Mock API tests for the HTTP record store.
//!
//! These tests use wiremock to simulate the record API and check request
//! shapes and the mapping of responses onto the error taxonomy.

use std::time::Duration;

use recsync_core::{
    ApiUrl, CallOptions, Error, ErrorKind, ListFilter, PendingEdit, RecordId, RecordSyncClient,
    ScopeKey, TransportError,
};
use recsync_http::{HttpRecordStore, HttpStoreConfig};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create an API URL from a mock server.
fn mock_api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(format!("http://127.0.0.1:{}/api", server.address().port())).unwrap()
}

fn client(server: &MockServer) -> RecordSyncClient<HttpRecordStore> {
    RecordSyncClient::new(HttpRecordStore::with_base(mock_api_url(server)).unwrap())
}

fn opts() -> CallOptions {
    CallOptions::new()
}

fn record_json(id: &str, title: &str, creator: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "time_start": null,
        "time_end": null,
        "active": true,
        "creator_id": creator,
        "meta": {},
        "created_at": "2024-01-01T10:00:00Z"
    })
}

// ============================================================================
// Create / update
// ============================================================================

#[tokio::test]
async fn test_create_new_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/new-id"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "R100"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/records"))
        .and(body_json(json!({
            "id": "R100",
            "title": "Test",
            "time_start": null,
            "time_end": null,
            "active": true,
            "creator_id": "u1",
            "meta": {}
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(record_json("R100", "Test", "u1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let draft = client
        .new_pending_edit(&ScopeKey::new("u1"), &opts())
        .await
        .unwrap()
        .with_title("Test");
    let saved = client.submit(&draft, &opts()).await.unwrap();

    assert_eq!(saved.id.as_str(), "R100");
    assert_eq!(saved.creator_id.as_str(), "u1");
    assert!(saved.created_at.is_some());
}

#[tokio::test]
async fn test_update_existing_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/R7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(record_json("R7", "Old", "u1")),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/records/R7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(record_json("R7", "New", "u1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let record = client
        .fetch_one(&RecordId::new("R7").unwrap(), &opts())
        .await
        .unwrap();
    let draft = PendingEdit::from_record(&record).with_title("New");
    let saved = client.submit(&draft, &opts()).await.unwrap();

    assert_eq!(saved.title, "New");
}

#[tokio::test]
async fn test_update_forbidden_passes_message_through() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/records/R7"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"error": "Unauthorized"})),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let record: recsync_core::Record =
        serde_json::from_value(record_json("R7", "Old", "u2")).unwrap();
    let err = client
        .submit(&PendingEdit::from_record(&record), &opts())
        .await
        .unwrap_err();

    match err {
        Error::Domain(e) => {
            assert_eq!(e.status, 403);
            assert_eq!(e.message, "Unauthorized");
        }
        other => panic!("expected domain error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_returning_other_id_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/records/R7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(record_json("R8", "Old", "u1")),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let record: recsync_core::Record =
        serde_json::from_value(record_json("R7", "Old", "u1")).unwrap();
    let err = client
        .submit(&PendingEdit::from_record(&record), &opts())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(TransportError::Decode { .. })));
}

// ============================================================================
// List and search
// ============================================================================

#[tokio::test]
async fn test_list_sends_scope_and_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records"))
        .and(query_param("page", "2"))
        .and(query_param("scope", "u1"))
        .and(query_param_is_missing("includeAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [record_json("R3", "Third", "u1")],
            "total": 11,
            "pages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .list(2, &ListFilter::own("u1"), &opts())
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_previous());
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_list_without_scope_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"records": []})),
        )
        .expect(0)
        .mount(&server)
        .await;

    let page = client(&server)
        .list(1, &ListFilter::all(ScopeKey::none()), &opts())
        .await
        .unwrap();

    assert!(page.is_empty());
}

#[tokio::test]
async fn test_list_without_page_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [record_json("R1", "One", "u1")]
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .list(1, &ListFilter::own("u1"), &opts())
        .await
        .unwrap();

    assert_eq!(page.total_pages, 1);
    assert_eq!(page.records.len(), 1);
}

#[tokio::test]
async fn test_search_all_sends_wildcard() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/search"))
        .and(query_param("q", "*"))
        .and(query_param("scope", "u1"))
        .and(query_param("includeAll", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record_json("R1", "One", "u1"),
            record_json("R2", "Two", "u2")
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let filter = ListFilter::all("u1");
    let star = client.search("*", &filter, &opts()).await.unwrap();
    let blank = client.search("", &filter, &opts()).await.unwrap();

    assert_eq!(star.len(), 2);
    assert_eq!(star, blank);
}

// ============================================================================
// Fetch / delete / meta fields
// ============================================================================

#[tokio::test]
async fn test_fetch_missing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Record not found"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_one(&RecordId::new("nope").unwrap(), &opts())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { ref id } if id == "nope"));
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/records/R1"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/records/R1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    let id = RecordId::new("R1").unwrap();
    client.delete_one(&id, &opts()).await.unwrap();
    let err = client.delete_one(&id, &opts()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_meta_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/meta-fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "work_type": {
                "name": "Work Type",
                "options": ["Support", "Project"],
                "multiple": false,
                "order": 0
            },
            "apps": {"name": "Apps", "options": ["Excel"], "multiple": true, "order": 1}
        })))
        .mount(&server)
        .await;

    let schema = client(&server).meta_schema(&opts()).await.unwrap();

    assert_eq!(schema.len(), 2);
    assert!(schema.get("apps").unwrap().multiple);
    let ids: Vec<_> = schema.ordered().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["work_type", "apps"]);
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_bad_request_without_body_is_generic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/records"))
        .respond_with(ResponseTemplate::new(400).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client(&server);
    let draft = PendingEdit::allocated(RecordId::new("R1").unwrap(), ScopeKey::new("u1"))
        .with_title("Test");
    let err = client.submit(&draft, &opts()).await.unwrap_err();

    match err {
        Error::Domain(e) => assert_eq!(e.message, "request failed with status 400"),
        other => panic!("expected domain error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/new-id"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"error": "maintenance"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).allocate_id(&opts()).await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(
        err,
        Error::Network(TransportError::Server { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_undecodable_body_is_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/R1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_one(&RecordId::new("R1").unwrap(), &opts())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(TransportError::Decode { .. })));
}

#[tokio::test]
async fn test_connection_refused_is_network() {
    // Reserve a port, then free it so nothing is listening there.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = ApiUrl::new(format!("http://127.0.0.1:{}/api", port)).unwrap();

    let client = RecordSyncClient::new(HttpRecordStore::with_base(base).unwrap());
    let err = client.allocate_id(&opts()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/R1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(record_json("R1", "Slow", "u1"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let store = HttpRecordStore::new(
        HttpStoreConfig::new(mock_api_url(&server)).timeout(Duration::from_millis(200)),
    )
    .unwrap();
    let err = RecordSyncClient::new(store)
        .fetch_one(&RecordId::new("R1").unwrap(), &opts())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { duration_ms: 200 }));
}

#[tokio::test]
async fn test_call_timeout_bounds_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .search(
            "report",
            &ListFilter::own("u1"),
            &CallOptions::new().timeout(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
}
