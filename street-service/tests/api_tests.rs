//! Integration tests for the HTTP API.
//!
//! The default run is hermetic: it exercises routing, validation and error
//! mapping against a lazily connected pool, so no statement ever reaches a
//! database. Tests that need a live PostGIS instance read `DATABASE_URL` and
//! are `#[ignore]`d; run them with
//! `DATABASE_URL=... cargo test -- --ignored --test-threads=1`
//! (single-threaded, they share tables).

use axum::http::StatusCode;
use axum_test::TestServer;
use common::config::{AppConfig, DatabaseConfig};
use serde_json::{json, Value};
use street_service::{create_router, db, state::AppState};

fn test_config() -> AppConfig {
    AppConfig {
        service_name: "street-service".into(),
        host: "127.0.0.1".into(),
        port: 0,
        database: DatabaseConfig {
            user: "postgres".into(),
            host: "127.0.0.1".into(),
            database: "unreachable".into(),
            password: "".into(),
            // Nothing listens here; requests must fail before any round-trip.
            port: 1,
            max_connections: 1,
            acquire_timeout_secs: 1,
        },
    }
}

/// Server backed by a lazy pool that never connects successfully.
fn lazy_server() -> TestServer {
    let config = test_config();
    let pool = db::create_lazy_pool(&config.database).unwrap();
    TestServer::new(create_router(AppState::with_pool(config, pool))).unwrap()
}

#[tokio::test]
async fn health_answers_without_a_database() {
    let server = lazy_server();
    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "street-service");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = lazy_server();
    let response = server.get("/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert!(body["paths"]["/api/street"].is_object());
    assert!(body["paths"]["/api/bulk-update"].is_object());
}

#[tokio::test]
async fn api_root_redirects_to_docs() {
    let server = lazy_server();
    let response = server.get("/api/").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/api-docs/openapi.json");
}

#[tokio::test]
async fn bulk_update_rejects_non_array_body() {
    let server = lazy_server();
    let response = server.put("/api/bulk-update").json(&json!({ "id": 1 })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "request body must be a JSON array");
}

#[tokio::test]
async fn bulk_update_rejects_element_without_id() {
    let server = lazy_server();
    let payload = json!([{ "id": 3, "nama": "Jalan Baru" }, { "nama": "no id here" }]);
    let response = server.put("/api/bulk-update").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_update_rejects_id_beyond_i32_range() {
    let server = lazy_server();
    let payload = json!([{ "id": 4294967297i64, "nama": "wrapped" }]);
    let response = server.put("/api/bulk-update").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_route_issue_rejects_zero_id() {
    let server = lazy_server();
    let payload = json!([{ "id": 0, "blocked": true }]);
    let response = server.post("/api/add-route-issue").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_todo_requires_title() {
    let server = lazy_server();

    let response = server.post("/api/todos").json(&json!({ "completed": true })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "title is required");

    let response = server.post("/api/todos").json(&json!({ "title": "" })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_todo_requires_title() {
    let server = lazy_server();
    let response = server.put("/api/todos/1").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

mod live {
    //! Tests against a real PostGIS database, addressed by `DATABASE_URL`.

    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;

    async fn live_server() -> (TestServer, PgPool) {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for live tests");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("failed to connect to test database");
        db::ensure_schema(&pool).await.unwrap();

        let state = AppState::with_pool(test_config(), pool.clone());
        (TestServer::new(create_router(state)).unwrap(), pool)
    }

    #[tokio::test]
    #[ignore]
    async fn paginated_streets_contain_only_linestrings() {
        let (server, pool) = live_server().await;
        sqlx::query("DELETE FROM street").execute(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO street (osm_id, nama, geom) VALUES \
             ('p1', 'A point', ST_GeomFromText('POINT(140.4 -8.49)', 4326)), \
             ('l1', 'A line', ST_GeomFromText('LINESTRING(140.40 -8.49, 140.41 -8.48, 140.42 -8.47)', 4326))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let response = server
            .get("/api/street")
            .add_query_param("limit", "10")
            .add_query_param("page", "1")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["pages"], 1);
        assert_eq!(body["currentPage"], 1);

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["nama"], "A line");
        assert_eq!(data[0]["geom"]["type"], "LineString");
        assert_eq!(data[0]["geom"]["coordinates"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    #[ignore]
    async fn upsert_with_duplicate_ids_keeps_the_last_element() {
        let (server, pool) = live_server().await;
        sqlx::query("DELETE FROM route_issues WHERE id = 8001")
            .execute(&pool)
            .await
            .unwrap();

        let payload = json!([
            { "id": 8001, "street_id": 1, "blocked": true, "notes": "first", "geom": "POINT(140.4 -8.49)" },
            { "id": 8001, "street_id": 2, "blocked": false, "notes": "second", "geom": "POINT(140.5 -8.48)" }
        ]);
        let response = server.post("/api/add-route-issue").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "OK");

        let (notes, blocked): (Option<String>, Option<bool>) = sqlx::query_as(
            "SELECT notes, blocked FROM route_issues WHERE id = 8001",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(notes.as_deref(), Some("second"));
        assert_eq!(blocked, Some(false));

        sqlx::query("DELETE FROM route_issues WHERE id = 8001")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn deleting_a_missing_route_issue_reports_success() {
        let (server, _pool) = live_server().await;
        let response = server.delete("/api/delete-route-issues/7777").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "OK");
    }

    #[tokio::test]
    #[ignore]
    async fn bulk_update_commits_even_when_one_id_matches_nothing() {
        let (server, pool) = live_server().await;
        sqlx::query("DELETE FROM street WHERE id IN (9001, 999999)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO street (id, osm_id, nama, geom) VALUES \
             (9001, 'w9001', 'before', ST_GeomFromText('LINESTRING(140.40 -8.49, 140.41 -8.48)', 4326))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let payload = json!([
            { "id": 9001, "osm_id": "w9001", "nama": "after", "geom": "LINESTRING(140.40 -8.49, 140.41 -8.48)" },
            { "id": 999999, "nama": "ghost", "geom": "LINESTRING(0 0, 1 1)" }
        ]);
        let response = server.put("/api/bulk-update").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let (nama,): (Option<String>,) =
            sqlx::query_as("SELECT nama FROM street WHERE id = 9001")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(nama.as_deref(), Some("after"));

        sqlx::query("DELETE FROM street WHERE id = 9001")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn invalid_batch_writes_nothing() {
        let (server, pool) = live_server().await;
        sqlx::query("DELETE FROM street WHERE id = 9101").execute(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO street (id, nama, geom) VALUES \
             (9101, 'untouched', ST_GeomFromText('LINESTRING(140.40 -8.49, 140.41 -8.48)', 4326))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let payload = json!([
            { "id": 9101, "nama": "touched", "geom": "LINESTRING(140.40 -8.49, 140.41 -8.48)" },
            { "nama": "missing id" }
        ]);
        let response = server.put("/api/bulk-update").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let (nama,): (Option<String>,) =
            sqlx::query_as("SELECT nama FROM street WHERE id = 9101")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(nama.as_deref(), Some("untouched"));

        sqlx::query("DELETE FROM street WHERE id = 9101")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn todo_crud_roundtrip() {
        let (server, pool) = live_server().await;

        let response = server
            .post("/api/todos")
            .json(&json!({ "title": "check bridge on Jalan Raya" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["title"], "check bridge on Jalan Raya");
        assert_eq!(created["completed"], false);

        let response = server
            .put(&format!("/api/todos/{id}"))
            .json(&json!({ "title": "bridge checked" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let (title,): (Option<String>,) =
            sqlx::query_as("SELECT title FROM todo WHERE id = $1")
                .bind(id as i32)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(title.as_deref(), Some("bridge checked"));

        let response = server.delete(&format!("/api/todos/{id}")).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        // Deleting again still reports success.
        let response = server.delete(&format!("/api/todos/{id}")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
