// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Submission, staff mutation, and the joined read views. Errors map onto
//! the service taxonomy: invalid shapes and constraint violations are 400,
//! missing targets 404, storage unavailability 503 with a generic message
//! (detail goes to the log, not the wire).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use tola_core::{EnquiryPatch, TolaError};
use tola_storage::queries::enquiries;

use crate::GatewayState;

/// Response body for PATCH /v1/enquiries/{id}.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub updated: bool,
}

/// Response body for DELETE /v1/enquiries/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a service error onto an HTTP response.
fn error_response(e: TolaError) -> Response {
    let (status, message) = match &e {
        TolaError::InvalidRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
        TolaError::Constraint { message } => (StatusCode::BAD_REQUEST, message.clone()),
        TolaError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        TolaError::Storage { .. } => {
            error!(error = %e, "storage failure surfaced to handler");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "storage unavailable".to_string(),
            )
        }
        _ => {
            error!(error = %e, "unexpected failure surfaced to handler");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse { error: message })).into_response()
}

/// POST /v1/enquiries
///
/// Accepts any of the three submission shapes; replies 201 with the created
/// ids, the batch id (if any), and the count of dropped line items.
pub async fn post_enquiries(
    State(state): State<GatewayState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    match state.service.submit(body).await {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /v1/enquiries — staff listing, newest first.
pub async fn get_enquiries(State(state): State<GatewayState>) -> Response {
    match enquiries::find_all_joined(state.service.database()).await {
        Ok(details) => Json(details).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /v1/enquiries/{id} — one joined record.
pub async fn get_enquiry(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    match enquiries::find_joined_by_id(state.service.database(), id).await {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => error_response(TolaError::NotFound {
            what: "enquiry",
            id,
        }),
        Err(e) => error_response(e),
    }
}

/// GET /v1/buyers/{buyer_id}/enquiries — per-buyer history, newest first.
pub async fn get_buyer_enquiries(
    State(state): State<GatewayState>,
    Path(buyer_id): Path<i64>,
) -> Response {
    match enquiries::find_joined_by_buyer(state.service.database(), buyer_id).await {
        Ok(details) => Json(details).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH /v1/enquiries/{id} — staff partial update; triggers the buyer
/// broadcast on success.
pub async fn patch_enquiry(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(patch): Json<EnquiryPatch>,
) -> Response {
    match state.service.update(id, &patch).await {
        Ok(()) => Json(UpdateResponse { updated: true }).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /v1/enquiries/{id} — hard delete.
pub async fn delete_enquiry(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    match state.service.remove(id).await {
        Ok(()) => Json(DeleteResponse { deleted: true }).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /health — unauthenticated liveness.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
