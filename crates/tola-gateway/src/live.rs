// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process live-channel registry backing the WebSocket endpoint.
//!
//! Connections register a sender when the socket opens, then join a buyer
//! key with an explicit action. `emit` fans an event out to every
//! connection under the key; with no connections the event is dropped,
//! which is the documented at-most-once delivery model.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use tola_core::LiveChannel;

struct ConnEntry {
    sender: mpsc::Sender<String>,
    buyer_key: Option<String>,
}

/// Registry of open WebSocket connections and their buyer subscriptions.
///
/// Injected into the broadcaster as `Arc<dyn LiveChannel>`, never held as
/// process-global state.
pub struct LiveHub {
    conns: DashMap<String, ConnEntry>,
    buyers: DashMap<String, HashSet<String>>,
}

impl LiveHub {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
            buyers: DashMap::new(),
        }
    }

    /// Track a newly opened connection. It delivers nothing until it joins
    /// a buyer key.
    pub fn register(&self, conn_id: &str, sender: mpsc::Sender<String>) {
        self.conns.insert(
            conn_id.to_string(),
            ConnEntry {
                sender,
                buyer_key: None,
            },
        );
    }

    /// Forget a closed connection and its subscription.
    pub fn unregister(&self, conn_id: &str) {
        if let Some((_, entry)) = self.conns.remove(conn_id) {
            if let Some(key) = entry.buyer_key {
                self.drop_membership(&key, conn_id);
            }
        }
    }

    /// Number of currently open connections.
    pub fn connection_count(&self) -> usize {
        self.conns.len()
    }

    fn drop_membership(&self, buyer_key: &str, conn_id: &str) {
        let mut empty = false;
        if let Some(mut set) = self.buyers.get_mut(buyer_key) {
            set.remove(conn_id);
            empty = set.is_empty();
        }
        if empty {
            self.buyers.remove(buyer_key);
        }
    }
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveChannel for LiveHub {
    async fn join(&self, conn_id: &str, buyer_key: &str) {
        let previous = match self.conns.get_mut(conn_id) {
            Some(mut entry) => entry.buyer_key.replace(buyer_key.to_string()),
            None => {
                warn!(conn_id, "join from unknown connection ignored");
                return;
            }
        };
        if let Some(old_key) = previous {
            if old_key != buyer_key {
                self.drop_membership(&old_key, conn_id);
            }
        }
        self.buyers
            .entry(buyer_key.to_string())
            .or_default()
            .insert(conn_id.to_string());
        debug!(conn_id, buyer_key, "connection joined buyer channel");
    }

    async fn leave(&self, conn_id: &str) {
        let key = self
            .conns
            .get_mut(conn_id)
            .and_then(|mut entry| entry.buyer_key.take());
        if let Some(key) = key {
            self.drop_membership(&key, conn_id);
        }
    }

    async fn emit(&self, buyer_key: &str, event: &str, payload: serde_json::Value) {
        let message = serde_json::json!({ "type": event, "data": payload }).to_string();

        // Collect senders first: dashmap guards must not be held while the
        // message is pushed out.
        let senders: Vec<(String, mpsc::Sender<String>)> = match self.buyers.get(buyer_key) {
            Some(set) => set
                .iter()
                .filter_map(|conn_id| {
                    self.conns
                        .get(conn_id)
                        .map(|entry| (conn_id.clone(), entry.sender.clone()))
                })
                .collect(),
            None => {
                debug!(buyer_key, event, "no active connections, event dropped");
                return;
            }
        };

        for (conn_id, sender) in senders {
            // try_send keeps emit non-blocking; a full or closed connection
            // just misses this event.
            if let Err(e) = sender.try_send(message.clone()) {
                debug!(conn_id, error = %e, "live event not delivered");
            }
        }
    }
}
