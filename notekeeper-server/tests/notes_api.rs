//! End-to-end HTTP tests against the in-memory store

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use notekeeper_server::models::{Note, NoteDraft, NoteId};
use notekeeper_server::{build_router, AppState, MemoryNoteStore, NoteStore, ServerConfig, StoreError};

fn app_with(store: Arc<dyn NoteStore>) -> Router {
    build_router(AppState::new(store), &ServerConfig::default())
}

fn app() -> Router {
    app_with(Arc::new(MemoryNoteStore::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, body) = send(app, post_json("/notes/create-note", body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["note"].clone()
}

#[tokio::test]
async fn root_returns_greeting() {
    let app = app();
    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Welcome to Note App".into()));
}

#[tokio::test]
async fn create_applies_defaults() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(
            "/notes/create-note",
            json!({"title": "Groceries", "tags": {"label": "errand"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());

    let note = &body["note"];
    assert!(!note["id"].as_str().unwrap().is_empty());
    assert_eq!(note["title"], "Groceries");
    assert_eq!(note["content"], "");
    assert_eq!(note["category"], "personal");
    assert_eq!(note["pinned"], false);
    assert_eq!(note["tags"], json!({"label": "errand", "color": "gray"}));
}

#[tokio::test]
async fn create_keeps_supplied_fields() {
    let app = app();
    let note = create(
        &app,
        json!({
            "title": "  Exam prep  ",
            "content": "chapters 3-5",
            "category": "study",
            "pinned": true,
            "tags": {"label": "school", "color": "green"}
        }),
    )
    .await;

    assert_eq!(note["title"], "Exam prep");
    assert_eq!(note["content"], "chapters 3-5");
    assert_eq!(note["category"], "study");
    assert_eq!(note["pinned"], true);
    assert_eq!(note["tags"]["color"], "green");
}

#[tokio::test]
async fn legacy_other_category_is_normalized() {
    let app = app();
    let note = create(
        &app,
        json!({"title": "misc", "category": "Other", "tags": {"label": "x"}}),
    )
    .await;

    assert_eq!(note["category"], "other");
}

#[tokio::test]
async fn create_without_title_is_validation_error() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json("/notes/create-note", json!({"tags": {"label": "errand"}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["field"], "title");
}

#[tokio::test]
async fn create_with_blank_title_is_validation_error() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(
            "/notes/create-note",
            json!({"title": "   ", "tags": {"label": "errand"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "title");
}

#[tokio::test]
async fn create_without_label_is_validation_error() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(
            "/notes/create-note",
            json!({"title": "Groceries", "tags": {"color": "red"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["field"], "tags.label");
}

#[tokio::test]
async fn create_with_unknown_category_is_validation_error() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(
            "/notes/create-note",
            json!({"title": "Groceries", "category": "hobby", "tags": {"label": "x"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "category");
}

#[tokio::test]
async fn malformed_json_is_invalid_body() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/notes/create-note")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_body");
}

#[tokio::test]
async fn wrong_field_type_is_validation_error() {
    let app = app();
    let cases = [
        (json!({"title": "Groceries", "pinned": "yes", "tags": {"label": "x"}}), "pinned"),
        (json!({"title": 5, "tags": {"label": "x"}}), "title"),
        (json!({"title": "Groceries", "tags": "errand"}), "tags"),
        (json!({"title": "Groceries", "tags": {"label": 7}}), "tags.label"),
    ];

    for (payload, field) in cases {
        let (status, body) = send(&app, post_json("/notes/create-note", payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["field"], field);
    }
}

#[tokio::test]
async fn non_object_body_is_validation_error() {
    let app = app();
    let (status, body) = send(&app, post_json("/notes/create-note", json!(["Groceries"]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["field"], "body");
}

#[tokio::test]
async fn missing_content_type_is_415() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/notes/create-note")
        .body(Body::from(r#"{"title":"a","tags":{"label":"b"}}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "invalid_body");
}

#[tokio::test]
async fn get_by_id_round_trips() {
    let app = app();
    let created = create(&app, json!({"title": "Groceries", "tags": {"label": "errand"}})).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, get(&format!("/notes/{id}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["note"], created);
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = app();
    let (status, body) = send(&app, get(&format!("/notes/{}", NoteId::new_v4()))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn get_malformed_id_is_404() {
    let app = app();
    let (status, body) = send(&app, get("/notes/doesnotexist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert!(body.get("note").is_none());
}

#[tokio::test]
async fn list_returns_every_created_note() {
    let app = app();

    let (status, body) = send(&app, get("/notes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notes"], json!([]));

    let mut created = Vec::new();
    for (title, label) in [("one", "a"), ("two", "b"), ("three", "c")] {
        created.push(create(&app, json!({"title": title, "tags": {"label": label}})).await);
    }

    let (status, body) = send(&app, get("/notes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let notes = body["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 3);
    for note in &created {
        assert!(notes.contains(note), "missing {note}");
    }
}

#[tokio::test]
async fn create_note_path_rejects_get() {
    let app = app();
    let (status, _) = send(&app, get("/notes/create-note")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unmatched_route_is_404_envelope() {
    let app = app();
    for uri in ["/notes/a/b", "/nothing-here"] {
        let (status, body) = send(&app, get(uri)).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], format!("route '{uri}' not found"));
    }
}

/// Store whose backend is permanently down
struct DownStore;

#[async_trait]
impl NoteStore for DownStore {
    async fn insert(&self, _: NoteDraft) -> Result<Note, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_all(&self) -> Result<Vec<Note>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_id(&self, _: NoteId) -> Result<Option<Note>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn close(&self) {}

    fn backend(&self) -> &'static str {
        "down"
    }
}

#[tokio::test]
async fn unavailable_store_is_503() {
    let app = app_with(Arc::new(DownStore));

    let (status, body) = send(&app, get("/notes")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "store_unavailable");

    let (status, _) = send(
        &app,
        post_json("/notes/create-note", json!({"title": "a", "tags": {"label": "b"}})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, get(&format!("/notes/{}", NoteId::new_v4()))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn validation_runs_before_store() {
    // An invalid draft never reaches the store, so even a dead backend yields 400
    let app = app_with(Arc::new(DownStore));
    let (status, body) = send(&app, post_json("/notes/create-note", json!({"tags": {"label": "b"}}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "title");
}

/// Store that never answers within a short request timeout
struct SlowStore;

#[async_trait]
impl NoteStore for SlowStore {
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(draft.into_note(NoteId::new_v4()))
    }

    async fn find_all(&self) -> Result<Vec<Note>, StoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _: NoteId) -> Result<Option<Note>, StoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(None)
    }

    async fn close(&self) {}

    fn backend(&self) -> &'static str {
        "slow"
    }
}

#[tokio::test]
async fn slow_request_times_out_with_envelope() {
    let config = ServerConfig {
        request_timeout: Duration::from_millis(50),
        ..ServerConfig::default()
    };
    let app = build_router(AppState::new(Arc::new(SlowStore)), &config);

    let (status, body) = send(&app, get("/notes")).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "timeout");
}

#[tokio::test]
async fn closed_store_is_503() {
    let store = Arc::new(MemoryNoteStore::new());
    let app = app_with(store.clone());
    store.close().await;

    let (status, _) = send(&app, get("/notes")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
