//! Integration tests for [`MasterApi`] against an in-process stub of the
//! collaborator endpoints.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};

use carecms_client::{ClientConfig, ClientError, MasterApi, MasterGateway};
use carecms_core::mutation::MutationCommand;
use carecms_core::query::{Pagination, QueryDescriptor};
use carecms_core::types::RecordId;

// ---------------------------------------------------------------------------
// Stub collaborator
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
    responses: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
}

impl Stub {
    fn respond(&self, endpoint: &str, status: StatusCode, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), (status, body.to_string()));
    }

    fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(State(stub): State<Stub>, uri: Uri, body: String) -> (StatusCode, String) {
    let endpoint = uri.path().trim_start_matches("/api/").to_string();
    let json = serde_json::from_str(&body).unwrap_or(Value::Null);
    stub.requests.lock().unwrap().push((endpoint.clone(), json));
    stub.responses
        .lock()
        .unwrap()
        .get(&endpoint)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()))
}

async fn spawn(stub: Stub) -> MasterApi {
    let app = Router::new().fallback(handle).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let config = ClientConfig::default().with_base_url(format!("http://{addr}/api"));
    MasterApi::new(&config).unwrap()
}

fn language_query() -> QueryDescriptor {
    QueryDescriptor::new("language_masters")
        .with_pagination(Pagination::new(1, 10).unwrap())
        .with_search(["language_name"], "spa")
}

// ---------------------------------------------------------------------------
// List Query Executor
// ---------------------------------------------------------------------------

/// The descriptor is posted verbatim and the page comes back with the
/// server-computed total.
#[tokio::test]
async fn list_posts_descriptor_and_returns_rows_with_count() {
    let stub = Stub::default();
    stub.respond(
        "masters/getMasterList",
        StatusCode::OK,
        json!({"status": 200, "data": [{"id": 7, "language_name": "Spanish"}], "count": 31}),
    );
    let api = spawn(stub.clone()).await;

    let result = api.list(&language_query()).await.unwrap();

    assert_eq!(result.count, 31);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0]["language_name"], "Spanish");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "masters/getMasterList");
    assert_eq!(
        requests[0].1,
        json!({
            "modelName": "language_masters",
            "search": {"field_name": ["language_name"], "searchKeyword": "spa"},
            "pagination": {"page": 1, "pageSize": 10}
        })
    );
}

/// Rows beyond the requested page size are dropped.
#[tokio::test]
async fn list_truncates_oversized_pages() {
    let stub = Stub::default();
    let rows: Vec<Value> = (1..=4).map(|id| json!({"id": id})).collect();
    stub.respond(
        "masters/getMasterList",
        StatusCode::OK,
        json!({"data": rows, "count": 4}),
    );
    let api = spawn(stub).await;

    let query = QueryDescriptor::new("faqs").with_pagination(Pagination::new(1, 2).unwrap());
    let result = api.list(&query).await.unwrap();

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.count, 4);
}

/// A non-2xx answer is a server error and nothing is retried.
#[tokio::test]
async fn list_http_failure_is_server_error_without_retry() {
    let stub = Stub::default();
    stub.respond(
        "masters/getMasterList",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"message": "boom"}),
    );
    let api = spawn(stub.clone()).await;

    let err = api.list(&language_query()).await.unwrap_err();

    assert_matches!(
        err,
        ClientError::Server { status: Some(500), message: Some(ref m) } if m == "boom"
    );
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn list_malformed_body() {
    let stub = Stub::default();
    stub.respond("masters/getMasterList", StatusCode::OK, json!({"data": "nope"}));
    let api = spawn(stub).await;

    let err = api.list(&language_query()).await.unwrap_err();
    assert_matches!(err, ClientError::MalformedResponse { .. });
}

/// Nothing listening on the port: the request never reaches a server.
#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ClientConfig::default().with_base_url(format!("http://{addr}/api/"));
    config.request_timeout = Duration::from_secs(2);
    let api = MasterApi::new(&config).unwrap();

    let err = api.list(&language_query()).await.unwrap_err();
    assert!(err.is_transport());
}

// ---------------------------------------------------------------------------
// Mutation Executor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upsert_returns_persisted_record() {
    let stub = Stub::default();
    stub.respond(
        "masters/createAndUpdateMaster",
        StatusCode::OK,
        json!({"code": 1, "data": {"id": 42, "language_name": "Spanish", "is_active": 1}}),
    );
    let api = spawn(stub.clone()).await;

    let command = MutationCommand::create("language_masters")
        .set("language_name", "Spanish")
        .set_flag("is_active", true);
    let record = api.upsert(&command).await.unwrap();

    assert_eq!(record["id"], 42);
    assert_eq!(
        stub.requests()[0].1,
        json!({
            "modelName": "language_masters",
            "inputData": {"language_name": "Spanish", "is_active": 1}
        })
    );
}

/// `code` other than 1 is a failure even on HTTP 200.
#[tokio::test]
async fn upsert_failing_code_surfaces_message() {
    let stub = Stub::default();
    stub.respond(
        "masters/createAndUpdateMaster",
        StatusCode::OK,
        json!({"code": 0, "message": "Record is locked"}),
    );
    let api = spawn(stub).await;

    let err = api
        .upsert(&MutationCommand::toggle("faqs", RecordId::Int(3), false))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Record is locked");
}

// ---------------------------------------------------------------------------
// Sign-up
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_up_uses_auth_endpoint() {
    let stub = Stub::default();
    stub.respond("auth/signUp", StatusCode::OK, json!({"code": 1}));
    let api = spawn(stub.clone()).await;

    let command = MutationCommand::create("cms_users").set("email", "a@b.co");
    api.sign_up(&command).await.unwrap();

    let requests = stub.requests();
    assert_eq!(requests[0].0, "auth/signUp");
    assert_eq!(requests[0].1["modelName"], "cms_users");
}

#[tokio::test]
async fn sign_up_rejection() {
    let stub = Stub::default();
    stub.respond(
        "auth/signUp",
        StatusCode::OK,
        json!({"code": 2, "message": "Email already exists"}),
    );
    let api = spawn(stub).await;

    let err = api
        .sign_up(&MutationCommand::create("cms_users"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Email already exists");
}

/// The trait seam forwards to the same executors.
#[tokio::test]
async fn gateway_trait_delegates_to_api() {
    let stub = Stub::default();
    stub.respond(
        "masters/getMasterList",
        StatusCode::OK,
        json!({"data": [], "count": 0}),
    );
    let api: Arc<dyn MasterGateway> = Arc::new(spawn(stub).await);

    let result = api.list(&language_query()).await.unwrap();
    assert!(result.rows.is_empty());
    assert_eq!(result.count, 0);
}
