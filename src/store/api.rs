use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use super::db::DbHandle;
use super::models::{HealthStatus, SaveCardRequest, SaveReceipt};

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub db: DbHandle,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal { error: String, details: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({"error": msg}))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
            }
            ApiError::Internal { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": error, "details": details})),
            )
                .into_response(),
        }
    }
}

fn internal(operation: &str, err: anyhow::Error) -> ApiError {
    tracing::error!(operation, error = %err, "Card store operation failed");
    ApiError::Internal {
        error: format!("Failed to {}", operation),
        details: err.to_string(),
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route(
            "/configurations",
            get(list_configurations).delete(clear_configurations),
        )
        .route(
            "/configurations/{form_id}",
            get(get_configuration)
                .put(save_configuration)
                .delete(delete_configuration),
        )
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn save_configuration(
    State(state): State<SharedState>,
    Path(form_id): Path<String>,
    Json(req): Json<SaveCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.form_id != form_id {
        return Err(ApiError::BadRequest(format!(
            "Body formId '{}' does not match path formId '{}'",
            req.form_id, form_id
        )));
    }

    tracing::info!(
        form_id = %form_id,
        sections = req.layout_selections.len(),
        "Saving card configuration"
    );
    let (card_id, _config) = state
        .db
        .call(move |db| db.upsert_configuration(&req))
        .await
        .map_err(|e| internal("save card configuration", e))?;

    Ok((
        StatusCode::CREATED,
        Json(SaveReceipt {
            message: "Card configuration saved successfully".to_string(),
            card_id,
            form_id,
        }),
    ))
}

async fn get_configuration(
    State(state): State<SharedState>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup_id = form_id.clone();
    let found = state
        .db
        .call(move |db| db.get_configuration(&lookup_id))
        .await
        .map_err(|e| internal("retrieve card configuration", e))?;

    match found {
        Some(config) => Ok(Json(config)),
        None => Err(ApiError::NotFound(
            "Card configuration not found".to_string(),
        )),
    }
}

async fn list_configurations(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let configs = state
        .db
        .call(|db| db.list_configurations())
        .await
        .map_err(|e| internal("retrieve card configurations", e))?;
    tracing::debug!(count = configs.len(), "Retrieved card configurations");
    Ok(Json(configs))
}

async fn delete_configuration(
    State(state): State<SharedState>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let delete_id = form_id.clone();
    let deleted = state
        .db
        .call(move |db| db.delete_configuration(&delete_id))
        .await
        .map_err(|e| internal("delete card configuration", e))?;

    if !deleted {
        return Err(ApiError::NotFound(
            "Card configuration not found".to_string(),
        ));
    }
    tracing::info!(form_id = %form_id, "Deleted card configuration");
    Ok(Json(
        json!({"message": "Card configuration deleted successfully"}),
    ))
}

/// Bulk clear. Idempotent: 200 whether or not any data existed.
async fn clear_configurations(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .db
        .call(|db| db.clear_all())
        .await
        .map_err(|e| internal("clear card configurations", e))?;

    let message = if removed > 0 {
        "All card configurations cleared successfully"
    } else {
        "No existing data to clear"
    };
    tracing::info!(removed, "Cleared card configurations");
    Ok(Json(json!({"message": message})))
}
