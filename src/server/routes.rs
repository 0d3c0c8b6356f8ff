use crate::errors::GainerError;
use crate::models::gain::{GainerQuery, QueryResult};
use crate::services::gainer_service::GainerService;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::error;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

impl IntoResponse for GainerError {
    fn into_response(self) -> Response {
        let status = match self {
            GainerError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "eu_gainer".to_string(),
    })
}

/// `GET /get_gainers?interval_minutes=5&min_gain=2.0&top_n=10`
pub async fn get_gainers(
    State(service): State<Arc<GainerService>>,
    Query(query): Query<GainerQuery>,
) -> Result<Json<QueryResult>, GainerError> {
    let result = service.calculate_gainers(&query).await?;
    Ok(Json(result))
}
