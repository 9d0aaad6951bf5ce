// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock live channel for deterministic testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tola_core::LiveChannel;

/// One captured `emit` call.
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub buyer_key: String,
    pub event: String,
    pub payload: serde_json::Value,
}

/// A mock live channel that records joins and emitted events.
pub struct MockLive {
    joined: Arc<Mutex<HashMap<String, String>>>,
    emitted: Arc<Mutex<Vec<EmittedEvent>>>,
}

impl MockLive {
    pub fn new() -> Self {
        Self {
            joined: Arc::new(Mutex::new(HashMap::new())),
            emitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The buyer key a connection joined, if any.
    pub async fn joined_key(&self, conn_id: &str) -> Option<String> {
        self.joined.lock().await.get(conn_id).cloned()
    }

    /// All events emitted so far.
    pub async fn emitted(&self) -> Vec<EmittedEvent> {
        self.emitted.lock().await.clone()
    }

    /// Count of emitted events.
    pub async fn emitted_count(&self) -> usize {
        self.emitted.lock().await.len()
    }
}

impl Default for MockLive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveChannel for MockLive {
    async fn join(&self, conn_id: &str, buyer_key: &str) {
        self.joined
            .lock()
            .await
            .insert(conn_id.to_string(), buyer_key.to_string());
    }

    async fn leave(&self, conn_id: &str) {
        self.joined.lock().await.remove(conn_id);
    }

    async fn emit(&self, buyer_key: &str, event: &str, payload: serde_json::Value) {
        self.emitted.lock().await.push(EmittedEvent {
            buyer_key: buyer_key.to_string(),
            event: event.to_string(),
            payload,
        });
    }
}
