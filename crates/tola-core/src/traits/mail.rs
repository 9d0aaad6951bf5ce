// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail transport trait for the staff notification collaborator.

use async_trait::async_trait;

use crate::error::TolaError;

/// Outbound email transport.
///
/// One `send` call delivers one message to every recipient. The dispatcher
/// makes exactly one call per submission batch regardless of line-item
/// count; per-item sends would flood the staff inboxes and must not occur.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Send one HTML message to all recipients.
    ///
    /// Returns a transport-assigned delivery identifier on success, or
    /// [`TolaError::Transport`] on failure. Callers at the dispatch
    /// boundary recover transport failures locally.
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<String, TolaError>;
}
