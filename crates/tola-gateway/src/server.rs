// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;

use tola_config::model::ServerConfig;
use tola_core::TolaError;

use crate::auth::auth_middleware;
use crate::handlers;
use crate::ws;
use crate::GatewayState;

/// Build the gateway router.
///
/// - `GET /health` is public (liveness probes).
/// - Everything under `/v1` requires the bearer token.
/// - `GET /ws` is the live channel; joining a buyer key is the explicit
///   opt-in, so the upgrade itself is unauthenticated.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/enquiries", post(handlers::post_enquiries))
        .route("/v1/enquiries", get(handlers::get_enquiries))
        .route("/v1/enquiries/{id}", get(handlers::get_enquiry))
        .route("/v1/enquiries/{id}", patch(handlers::patch_enquiry))
        .route("/v1/enquiries/{id}", delete(handlers::delete_enquiry))
        .route(
            "/v1/buyers/{buyer_id}/enquiries",
            get(handlers::get_buyer_enquiries),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}

/// Bind and serve the gateway until the process stops.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), TolaError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TolaError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| TolaError::Channel {
            message: format!("gateway server error: {e}"),
        })?;

    Ok(())
}
