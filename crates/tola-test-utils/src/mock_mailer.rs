// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock mail transport for deterministic testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tola_core::{MailTransport, TolaError};

/// One captured `send` call.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// A mock mail transport that captures every send.
///
/// With `fail_sends(true)` the transport raises a `Transport` error on every
/// call, for exercising the swallow-and-log policy at the dispatch boundary.
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockMailer {
    /// Create a new mock transport with an empty capture list.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every subsequent send fail with a transport error.
    pub async fn fail_sends(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }

    /// All digests that were sent.
    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    /// Count of send calls that succeeded.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for MockMailer {
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<String, TolaError> {
        if *self.fail.lock().await {
            return Err(TolaError::Transport {
                message: "mock transport configured to fail".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(format!("mock-delivery-{}", uuid::Uuid::new_v4()))
    }
}
