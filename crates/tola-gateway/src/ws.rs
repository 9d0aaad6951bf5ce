// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for the per-buyer live channel.
//!
//! Client -> Server (JSON):
//! ```json
//! {"type": "join", "buyer_id": "42"}
//! {"type": "leave"}
//! ```
//!
//! Server -> Client (JSON):
//! ```json
//! {"type": "joined", "buyer_id": "42"}
//! {"type": "enquiry:update", "data": { ...joined record... }}
//! {"type": "enquiry:delete", "data": {"id": 7}}
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use tola_core::LiveChannel;

use crate::GatewayState;

/// Client command names.
pub mod commands {
    /// Subscribe this connection to a buyer key.
    pub const JOIN: &str = "join";
    /// Unsubscribe without closing the socket.
    pub const LEAVE: &str = "leave";
    /// Server acknowledgement of a join.
    pub const JOINED: &str = "joined";
}

/// WebSocket command from the client.
#[derive(Debug, Deserialize)]
struct WsCommand {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    buyer_id: Option<String>,
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
///
/// Spawns a sender task that forwards hub events to the client, then loops
/// reading join/leave commands until the socket closes.
async fn handle_socket(socket: WebSocket, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let conn_id = uuid::Uuid::new_v4().to_string();

    let (tx, mut rx) = mpsc::channel::<String>(64);
    state.hub.register(&conn_id, tx.clone());

    let sender_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let text_str: &str = &text;
                let command: WsCommand = match serde_json::from_str(text_str) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(conn_id, "invalid WebSocket command: {e}");
                        continue;
                    }
                };

                match command.kind.as_str() {
                    commands::JOIN => {
                        let Some(buyer_id) = command.buyer_id else {
                            tracing::warn!(conn_id, "join without buyer_id ignored");
                            continue;
                        };
                        state.hub.join(&conn_id, &buyer_id).await;
                        let ack = serde_json::json!({
                            "type": commands::JOINED,
                            "buyer_id": buyer_id,
                        });
                        let _ = tx.try_send(ack.to_string());
                    }
                    commands::LEAVE => state.hub.leave(&conn_id).await,
                    other => tracing::warn!(conn_id, command = other, "unknown command ignored"),
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping (handled by the protocol layer)
        }
    }

    // Cleanup.
    state.hub.unregister(&conn_id);
    sender_task.abort();
}
