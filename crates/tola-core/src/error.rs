// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the tola enquiry service.

use thiserror::Error;

/// The primary error type used across the tola workspace.
///
/// Variants map onto the service's propagation policy: request-shape and
/// constraint errors surface to the caller as 4xx responses, storage errors
/// as 503, and transport/channel errors are recovered at the dispatch
/// boundary (logged, never surfaced to the buyer-facing request).
#[derive(Debug, Error)]
pub enum TolaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The submission body matched none of the recognized shapes.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Foreign-key or required-field violation on insert/update.
    #[error("constraint violation: {message}")]
    Constraint { message: String },

    /// Update/delete/read target does not exist.
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    /// Storage backend errors (connection failure, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Mail transport failure. Always swallowed at the dispatch boundary.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Live-channel delivery problems. Logged only, never surfaced.
    #[error("channel error: {message}")]
    Channel { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
