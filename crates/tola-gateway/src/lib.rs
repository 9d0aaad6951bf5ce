// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the tola enquiry service.
//!
//! REST handlers drive the intake pipeline and the joined read views; the
//! WebSocket endpoint is the buyers' live channel. The gateway owns the
//! [`live::LiveHub`], the in-process implementation of the `LiveChannel`
//! collaborator the broadcaster addresses.

pub mod auth;
pub mod handlers;
pub mod live;
pub mod server;
pub mod ws;

use std::sync::Arc;
use std::time::Instant;

use tola_intake::EnquiryService;

use crate::auth::AuthConfig;
use crate::live::LiveHub;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The intake pipeline (also the road to the database for read views).
    pub service: EnquiryService,
    /// Per-buyer live-channel registry.
    pub hub: Arc<LiveHub>,
    /// Authentication configuration for the /v1 routes.
    pub auth: AuthConfig,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}
