//! End-to-end tests for the table routes.
//!
//! Each test builds the full router over an in-memory SQLite pool and drives it
//! through `tower::ServiceExt::oneshot`; no TCP port is bound.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use table_bridge::config::DEFAULT_BODY_LIMIT_BYTES;
use table_bridge::{app, run_migrations, AppState, TableAccess};
use tower::ServiceExt;

async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database should open");
    run_migrations(&pool).await.expect("migrations should apply");
    sqlx::query(
        "CREATE TABLE animals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            species TEXT NOT NULL,
            tag TEXT UNIQUE,
            zoo_id INTEGER,
            added_on TEXT NOT NULL DEFAULT 'today'
        )",
    )
    .execute(&pool)
    .await
    .expect("animals table should be created");
    pool
}

async fn router_with(tables: TableAccess) -> (Router, SqlitePool) {
    let pool = pool().await;
    let state = AppState::new(pool.clone(), tables);
    (app(state, DEFAULT_BODY_LIMIT_BYTES), pool)
}

async fn router() -> Router {
    router_with(TableAccess::Any).await.0
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// Zoos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_walk_zoo_lifecycle() {
    let app = router().await;

    let (status, body) = send(&app, Method::POST, "/api/zoos", Some(json!({ "name": "Metro Zoo" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "id": 1, "name": "Metro Zoo" }));

    let (status, body) = send(&app, Method::GET, "/api/zoos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "Metro Zoo" }));

    let (status, body) = send(&app, Method::DELETE, "/api/zoos/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, "/api/zoos/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "No zoos data with that id!" }));
}

#[tokio::test]
async fn should_list_empty_table_as_empty_array() {
    let app = router().await;
    let (status, body) = send(&app, Method::GET, "/api/zoos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn should_list_rows_in_insertion_order() {
    let app = router().await;
    for name in ["Alpha Zoo", "Beta Zoo", "Gamma Zoo"] {
        let (status, _) = send(&app, Method::POST, "/api/zoos", Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, body) = send(&app, Method::GET, "/api/zoos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "name": "Alpha Zoo" },
            { "id": 2, "name": "Beta Zoo" },
            { "id": 3, "name": "Gamma Zoo" }
        ])
    );
}

#[tokio::test]
async fn should_reject_duplicate_name_with_friendly_message() {
    let app = router().await;
    let (status, _) = send(&app, Method::POST, "/api/zoos", Some(json!({ "name": "Metro Zoo" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/api/zoos", Some(json!({ "name": "Metro Zoo" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Another record with that value exists");
    assert_eq!(body["code"], "unique_violation");
}

#[tokio::test]
async fn should_update_zoo_and_return_fresh_row() {
    let app = router().await;
    send(&app, Method::POST, "/api/zoos", Some(json!({ "name": "Metro Zoo" }))).await;

    let (status, body) = send(&app, Method::PUT, "/api/zoos/1", Some(json!({ "name": "City Zoo" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "City Zoo" }));
}

#[tokio::test]
async fn should_return_404_when_updating_unknown_zoo_without_mutation() {
    let app = router().await;
    let (status, body) = send(&app, Method::PUT, "/api/zoos/42", Some(json!({ "name": "Ghost Zoo" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "No zoos item with that id!" }));

    let (_, listed) = send(&app, Method::GET, "/api/zoos", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn should_return_404_when_deleting_unknown_zoo() {
    let app = router().await;
    let (status, body) = send(&app, Method::DELETE, "/api/zoos/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No zoos item with that id!");
}

// ---------------------------------------------------------------------------
// Generic tables
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_superset_of_posted_fields() {
    let app = router().await;
    let posted = json!({ "species": "otter", "tag": "OT-1", "zoo_id": 3 });
    let (status, created) = send(&app, Method::POST, "/api/animals", Some(posted.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().expect("server assigns an id");
    let (status, fetched) = send(&app, Method::GET, &format!("/api/animals/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    for (key, value) in posted.as_object().unwrap() {
        assert_eq!(&fetched[key], value, "field {key}");
    }
    assert_eq!(fetched["added_on"], "today");
}

#[tokio::test]
async fn should_apply_partial_update() {
    let app = router().await;
    send(&app, Method::POST, "/api/animals", Some(json!({ "species": "lynx", "zoo_id": 1 }))).await;

    let (status, body) = send(&app, Method::PUT, "/api/animals/1", Some(json!({ "zoo_id": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["species"], "lynx");
    assert_eq!(body["zoo_id"], 2);
}

#[tokio::test]
async fn should_store_null_values() {
    let app = router().await;
    let (status, body) = send(&app, Method::POST, "/api/animals", Some(json!({ "species": "heron", "tag": null }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tag"], Value::Null);
}

#[tokio::test]
async fn should_surface_raw_detail_for_not_null_violation() {
    let app = router().await;
    let (status, body) = send(&app, Method::POST, "/api/animals", Some(json!({ "tag": "X" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "not_null_violation");
    assert!(body["message"].as_str().unwrap().contains("NOT NULL"));
}

#[tokio::test]
async fn should_return_500_for_unknown_table() {
    let app = router().await;
    let (status, body) = send(&app, Method::GET, "/api/penguins", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "database_error");
    assert!(body["message"].as_str().unwrap().contains("no such table"));
}

#[tokio::test]
async fn should_return_500_for_unknown_column() {
    let app = router().await;
    let (status, _) = send(&app, Method::POST, "/api/animals", Some(json!({ "species": "owl", "wings": 2 }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn should_return_404_after_delete() {
    let app = router().await;
    send(&app, Method::POST, "/api/animals", Some(json!({ "species": "ibis" }))).await;

    let (status, _) = send(&app, Method::DELETE, "/api/animals/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/api/animals/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "No animals data with that id!" }));
}

#[tokio::test]
async fn should_reject_non_object_body_as_storage_error() {
    let app = router().await;
    let (status, body) = send(&app, Method::POST, "/api/zoos", Some(json!([{ "name": "Q" }]))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "body must be a JSON object", "code": "invalid_row" }));

    let (_, body) = send(&app, Method::GET, "/api/zoos", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn should_pass_empty_update_to_storage_and_surface_its_error() {
    let app = router().await;
    send(&app, Method::POST, "/api/zoos", Some(json!({ "name": "Metro Zoo" }))).await;

    let (status, body) = send(&app, Method::PUT, "/api/zoos/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "database_error");
    assert!(body["message"].as_str().unwrap().contains("syntax error"));

    let (_, body) = send(&app, Method::GET, "/api/zoos/1", None).await;
    assert_eq!(body, json!({ "id": 1, "name": "Metro Zoo" }));
}

#[tokio::test]
async fn should_create_row_with_caller_supplied_text_id() {
    let (app, pool) = router_with(TableAccess::Any).await;
    sqlx::query("CREATE TABLE tags (id TEXT PRIMARY KEY, label TEXT)")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(&app, Method::POST, "/api/tags", Some(json!({ "id": "a", "label": "x" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "id": "a", "label": "x" }));

    let (status, body) = send(&app, Method::GET, "/api/tags/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "a", "label": "x" }));
}

// ---------------------------------------------------------------------------
// Allow-list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_hide_tables_outside_allow_list() {
    let (app, _pool) = router_with(TableAccess::from_list("animals")).await;

    let (status, body) = send(&app, Method::GET, "/api/sqlite_master", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No table named sqlite_master is exposed");

    let (status, _) = send(&app, Method::GET, "/api/animals", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn should_serve_fixed_zoo_routes_regardless_of_allow_list() {
    let (app, pool) = router_with(TableAccess::from_list("animals")).await;
    sqlx::query("INSERT INTO zoos (name) VALUES ('Harbor Zoo')")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(&app, Method::GET, "/api/zoos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": 1, "name": "Harbor Zoo" }]));
}

// ---------------------------------------------------------------------------
// Common routes and headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_health_and_readiness() {
    let app = router().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn should_report_unready_when_pool_is_closed() {
    let (app, pool) = router_with(TableAccess::Any).await;
    pool.close().await;
    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn should_set_security_headers() {
    let app = router().await;
    let response = app
        .oneshot(Request::builder().uri("/api/zoos").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
}

#[tokio::test]
async fn should_reject_oversized_body() {
    let pool = pool().await;
    let app = app(AppState::new(pool, TableAccess::Any), 16);
    let payload = json!({ "name": "A zoo with a rather long name" }).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/zoos")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
