//! Cosmos REST client against a local fake of the document endpoints.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use vcounter_core::record::COUNTER_ID;
use vcounter_core::store::{DocumentStore, ReadOutcome};
use vcounter_core::VisitorCounter;
use vcounter_gateway::config::{StoreBackend, StoreSection};
use vcounter_gateway::store::CosmosStore;

const KEY: &str = "bG9jYWwtdGVzdC1tYXN0ZXIta2V5LTAxMjM0NTY3ODk=";

#[derive(Default)]
struct Fake {
    doc: Mutex<Option<Value>>,
    /// (method, upsert flag, partition key header) per request
    seen: Mutex<Vec<(String, bool, String)>>,
    fail_with: Mutex<Option<StatusCode>>,
}

type Shared = Arc<Fake>;

fn check_auth(headers: &HeaderMap) {
    let auth = headers["authorization"].to_str().unwrap();
    assert!(auth.starts_with("type%3Dmaster%26ver%3D1.0%26sig%3D"), "{auth}");
    assert!(headers["x-ms-date"].to_str().unwrap().ends_with(" GMT"));
    assert_eq!(headers["x-ms-version"], "2018-12-31");
}

fn pk(headers: &HeaderMap) -> String {
    headers["x-ms-documentdb-partitionkey"].to_str().unwrap().to_string()
}

async fn read_doc(State(fake): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    check_auth(&headers);
    fake.seen.lock().unwrap().push(("GET".into(), false, pk(&headers)));
    if let Some(status) = *fake.fail_with.lock().unwrap() {
        return (status, Json(json!({ "code": "ServiceUnavailable", "message": "try later" }))).into_response();
    }
    match fake.doc.lock().unwrap().clone() {
        Some(doc) if doc["id"] == id => Json(doc).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": "NotFound", "message": "Entity with the specified id does not exist in the system." })),
        )
            .into_response(),
    }
}

async fn write_doc(State(fake): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    check_auth(&headers);
    let upsert = headers
        .get("x-ms-documentdb-is-upsert")
        .map(|v| v == "True")
        .unwrap_or(false);
    fake.seen.lock().unwrap().push(("POST".into(), upsert, pk(&headers)));

    let mut doc = fake.doc.lock().unwrap();
    if doc.is_some() && !upsert {
        return (StatusCode::CONFLICT, Json(json!({ "code": "Conflict", "message": "exists" }))).into_response();
    }
    let status = if doc.is_some() { StatusCode::OK } else { StatusCode::CREATED };
    let mut stored = body;
    stored["_etag"] = json!("\"0000\"");
    stored["_ts"] = json!(1_700_000_000);
    *doc = Some(stored.clone());
    (status, Json(stored)).into_response()
}

async fn serve(fake: Shared) -> SocketAddr {
    let app = Router::new()
        .route("/dbs/resume/colls/counter/docs/:id", get(read_doc))
        .route("/dbs/resume/colls/counter/docs", post(write_doc))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn section(endpoint: String) -> StoreSection {
    StoreSection {
        backend: StoreBackend::Cosmos,
        endpoint,
        key: KEY.into(),
        database: "resume".into(),
        container: "counter".into(),
        request_timeout_ms: 2000,
    }
}

async fn store_for(fake: &Shared) -> CosmosStore {
    let addr = serve(fake.clone()).await;
    CosmosStore::from_config(&section(format!("http://{addr}/"))).unwrap()
}

#[tokio::test]
async fn lazy_create_then_increment() {
    let fake = Shared::default();
    let counter = VisitorCounter::new(Arc::new(store_for(&fake).await));

    assert_eq!(counter.increment().await.unwrap(), 1);
    assert_eq!(counter.increment().await.unwrap(), 2);

    let seen = fake.seen.lock().unwrap().clone();
    let expected_pk = format!("[\"{COUNTER_ID}\"]");
    assert_eq!(
        seen,
        vec![
            ("GET".to_string(), false, expected_pk.clone()),
            ("POST".to_string(), false, expected_pk.clone()),
            ("POST".to_string(), true, expected_pk.clone()),
            ("GET".to_string(), false, expected_pk.clone()),
            ("POST".to_string(), true, expected_pk),
        ]
    );
    assert_eq!(fake.doc.lock().unwrap().as_ref().unwrap()["count"], 2);
}

#[tokio::test]
async fn not_found_maps_to_tag() {
    let fake = Shared::default();
    let store = store_for(&fake).await;

    assert!(matches!(store.read(COUNTER_ID, COUNTER_ID).await, ReadOutcome::NotFound));
}

#[tokio::test]
async fn service_error_maps_to_rejected() {
    let fake = Shared::default();
    *fake.fail_with.lock().unwrap() = Some(StatusCode::SERVICE_UNAVAILABLE);
    let store = store_for(&fake).await;

    match store.read(COUNTER_ID, COUNTER_ID).await {
        ReadOutcome::Failure(e) => {
            assert_eq!(e.client_code().as_str(), "STORE_REJECTED");
            assert!(e.to_string().contains("try later"), "{e}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn create_on_existing_is_conflict() {
    let fake = Shared::default();
    *fake.doc.lock().unwrap() = Some(json!({ "id": COUNTER_ID, "count": 4 }));
    let store = store_for(&fake).await;

    let err = store
        .create(&vcounter_core::CounterRecord::empty(COUNTER_ID))
        .await
        .unwrap_err();
    assert_eq!(err.client_code().as_str(), "CONFLICT");
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    // Bind then drop to get a port nothing listens on.
    let addr = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let store = CosmosStore::from_config(&section(format!("http://{addr}"))).unwrap();

    match store.read(COUNTER_ID, COUNTER_ID).await {
        ReadOutcome::Failure(e) => assert_eq!(e.client_code().as_str(), "STORE_UNAVAILABLE"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn malformed_document_is_reported() {
    let fake = Shared::default();
    *fake.doc.lock().unwrap() = Some(json!({ "id": COUNTER_ID, "count": "many" }));
    let store = store_for(&fake).await;

    match store.read(COUNTER_ID, COUNTER_ID).await {
        ReadOutcome::Failure(e) => assert_eq!(e.client_code().as_str(), "MALFORMED_RECORD"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn upsert_same_record_twice_is_stable() {
    let fake = Shared::default();
    let store = store_for(&fake).await;
    let rec = vcounter_core::CounterRecord::new(COUNTER_ID, 3);

    store.upsert(&rec).await.unwrap();
    store.upsert(&rec).await.unwrap();

    let seen = fake.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|(method, upsert, _)| method == "POST" && *upsert));

    let doc = fake.doc.lock().unwrap().clone().unwrap();
    assert_eq!(doc["id"], COUNTER_ID);
    assert_eq!(doc["count"], 3);
}
