// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-channel trait for per-buyer status-change delivery.

use async_trait::async_trait;

/// Per-buyer real-time delivery scope.
///
/// Buyers opt in by joining a channel keyed by their buyer id rendered as a
/// string; the broadcaster addresses the same key. Delivery is at-most-once:
/// if the buyer has no active connection the event is dropped. There is no
/// outbox, retry, or queued redelivery.
#[async_trait]
pub trait LiveChannel: Send + Sync + 'static {
    /// Subscribe an existing connection to a buyer key.
    async fn join(&self, conn_id: &str, buyer_key: &str);

    /// Drop a connection from whatever buyer key it joined.
    async fn leave(&self, conn_id: &str);

    /// Push an event to every connection joined under `buyer_key`.
    ///
    /// Infallible by contract: delivery problems are logged by the
    /// implementation and never surface to the operation that triggered
    /// the push.
    async fn emit(&self, buyer_key: &str, event: &str, payload: serde_json::Value);
}
