/// HTTP tests against an unreachable database.
/// The pool points at a closed local port, so every query fails fast.
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use demo_app::config::{Config, ConnectionParams};
use demo_app::db::Database;
use demo_app::handlers::{router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn unreachable_config() -> Config {
    Config {
        version: "9.9".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        database: ConnectionParams {
            host: "127.0.0.1".to_string(),
            port: 1,
            database: "demo".to_string(),
            user: "test_user".to_string(),
            password: "test_pass".to_string(),
        },
        db_max_connections: 1,
        db_acquire_timeout: Duration::from_secs(2),
    }
}

fn test_app() -> Router {
    let config = unreachable_config();
    let db = Database::connect_lazy(&config);
    router(Arc::new(AppState {
        db: db.pool,
        config,
    }))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_index_shows_version() {
    let (status, body) = get(test_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Version: 9.9"));
}

#[tokio::test]
async fn test_health_reports_unhealthy_database() {
    let (status, body) = get(test_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["database"], "unhealthy");
}

#[tokio::test]
async fn test_stats_returns_500_json_error() {
    let (status, body) = get(test_app(), "/api/stats").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let message = value["error"].as_str().unwrap();
    assert!(!message.is_empty());
}

#[tokio::test]
async fn test_every_api_endpoint_fails_with_json() {
    for uri in ["/api/users", "/api/products", "/api/orders"] {
        let (status, body) = get(test_app(), uri).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value.get("error").is_some(), "{}", uri);
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = get(test_app(), "/api/payments").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
