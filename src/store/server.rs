use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::api::{self, AppState, SharedState};
use super::db::{CardDb, DbHandle};

/// Configuration for the card configuration service.
pub struct ServerConfig {
    pub port: u16,
    pub db_path: std::path::PathBuf,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            db_path: std::path::PathBuf::from(".cardsmith/cards.db"),
            dev_mode: false,
        }
    }
}

/// Build the full application router.
pub fn build_router(state: SharedState) -> Router {
    api::api_router().with_state(state)
}

/// Start the card configuration service.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    // Ensure parent directory exists for DB
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let db = CardDb::new(&config.db_path).context("Failed to initialize card database")?;
    let state = Arc::new(AppState {
        db: DbHandle::new(db),
    });

    let mut app = build_router(state);

    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    println!("Cardsmith card service running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    println!("\nShutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let db = CardDb::new_in_memory().unwrap();
        let state = Arc::new(AppState {
            db: DbHandle::new(db),
        });
        build_router(state)
    }

    fn save_body(form_id: &str, fields: &[&str]) -> String {
        serde_json::json!({
            "formId": form_id,
            "formData": {"id": form_id, "elements": []},
            "layoutSelections": [
                {"layout": "vertical", "fields": fields, "timestamp": 1700000000000i64}
            ]
        })
        .to_string()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_router();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["status"], "OK");
        assert_eq!(json["message"], "Server is running");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_save_then_get_round_trip() {
        let app = test_router();

        let req = Request::builder()
            .method("PUT")
            .uri("/configurations/form-1")
            .header("content-type", "application/json")
            .body(Body::from(save_body("form-1", &["f1", "f2"])))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let receipt = body_json(resp).await;
        assert_eq!(receipt["formId"], "form-1");
        assert_eq!(receipt["message"], "Card configuration saved successfully");
        assert!(receipt["cardId"].is_i64());

        let req = Request::builder()
            .uri("/configurations/form-1")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let config = body_json(resp).await;
        assert_eq!(config["formId"], "form-1");
        assert_eq!(config["layoutSelections"][0]["fields"][1], "f2");
    }

    #[tokio::test]
    async fn test_save_rejects_mismatched_form_id() {
        let app = test_router();
        let req = Request::builder()
            .method("PUT")
            .uri("/configurations/form-other")
            .header("content-type", "application/json")
            .body(Body::from(save_body("form-1", &["f1"])))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("formId"));
    }

    #[tokio::test]
    async fn test_get_missing_returns_404_with_error_body() {
        let app = test_router();
        let req = Request::builder()
            .uri("/configurations/ghost")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Card configuration not found");
    }

    #[tokio::test]
    async fn test_second_save_overwrites() {
        let app = test_router();

        for fields in [&["f1"][..], &["f3", "f4"][..]] {
            let req = Request::builder()
                .method("PUT")
                .uri("/configurations/form-1")
                .header("content-type", "application/json")
                .body(Body::from(save_body("form-1", fields)))
                .unwrap();
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = Request::builder()
            .uri("/configurations")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let json = body_json(resp).await;
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["layoutSelections"][0]["fields"][0], "f3");
    }

    #[tokio::test]
    async fn test_delete_configuration() {
        let app = test_router();

        let req = Request::builder()
            .method("PUT")
            .uri("/configurations/form-1")
            .header("content-type", "application/json")
            .body(Body::from(save_body("form-1", &["f1"])))
            .unwrap();
        app.clone().oneshot(req).await.unwrap();

        let req = Request::builder()
            .method("DELETE")
            .uri("/configurations/form-1")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let req = Request::builder()
            .method("DELETE")
            .uri("/configurations/form-1")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_clear_is_idempotent() {
        let app = test_router();

        // Clearing an empty store still succeeds.
        let req = Request::builder()
            .method("DELETE")
            .uri("/configurations")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "No existing data to clear");

        let req = Request::builder()
            .method("PUT")
            .uri("/configurations/form-1")
            .header("content-type", "application/json")
            .body(Body::from(save_body("form-1", &["f1"])))
            .unwrap();
        app.clone().oneshot(req).await.unwrap();

        let req = Request::builder()
            .method("DELETE")
            .uri("/configurations")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "All card configurations cleared successfully");

        let req = Request::builder()
            .uri("/configurations")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(
            config.db_path,
            std::path::PathBuf::from(".cardsmith/cards.db")
        );
        assert!(!config.dev_mode);
    }
}
