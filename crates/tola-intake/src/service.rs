// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The enquiry service: submission, staff mutation, and the fire-and-forget
//! handoffs to notification and broadcast.
//!
//! Within one submission the line-item inserts run sequentially and
//! continue past individual failures. The notification dispatcher and the
//! live-channel broadcaster run as spawned background tasks and never block
//! the request/response cycle that triggered them; their failures are
//! logged and swallowed.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use tola_core::types::events;
use tola_core::{EnquiryPatch, LiveChannel, MailTransport, NewEnquiry, TolaError};
use tola_storage::queries::{directory, enquiries};
use tola_storage::Database;

use crate::normalize::normalize;

/// What a successful submission reports back to the client.
///
/// `skipped` counts line items dropped during normalization; partial
/// acceptance is deliberate, so a 5-item submission with 2 malformed items
/// succeeds with 3 ids and `skipped = 2`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub ids: Vec<i64>,
    pub batch_id: Option<String>,
    pub skipped: usize,
}

/// Orchestrates the intake pipeline against the store and the external
/// collaborators. Clones share the same database handle and adapters.
#[derive(Clone)]
pub struct EnquiryService {
    db: Database,
    mailer: Arc<dyn MailTransport>,
    live: Arc<dyn LiveChannel>,
}

impl EnquiryService {
    pub fn new(db: Database, mailer: Arc<dyn MailTransport>, live: Arc<dyn LiveChannel>) -> Self {
        Self { db, mailer, live }
    }

    /// The database handle, for the read-view handlers.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Accept one submission body in any of the three recognized shapes.
    ///
    /// Fails only when the body matches no shape, when zero line items
    /// survive validation, or when the store itself is unavailable. The
    /// staff notification is handed to a background task once every insert
    /// of the batch has completed.
    pub async fn submit(&self, body: Value) -> Result<SubmissionOutcome, TolaError> {
        let (drafts, batch_id) = normalize(body)?;
        let submitted = drafts.len();

        let mut items: Vec<NewEnquiry> = Vec::with_capacity(submitted);
        for draft in drafts {
            match draft.validate() {
                Ok(item) => items.push(item),
                Err(reason) => {
                    warn!(%reason, "line item dropped during normalization");
                }
            }
        }
        if items.is_empty() {
            return Err(TolaError::InvalidRequest(
                "no valid line items in submission".to_string(),
            ));
        }
        let skipped = submitted - items.len();

        for item in &mut items {
            self.derive_weight(item).await?;
        }

        let ids = enquiries::create_many(&self.db, &items).await?;

        if !ids.is_empty() {
            let db = self.db.clone();
            let mailer = Arc::clone(&self.mailer);
            let created = ids.clone();
            tokio::spawn(async move {
                if let Err(e) = tola_notify::dispatch(&db, mailer.as_ref(), &created).await {
                    warn!(error = %e, "staff notification failed");
                }
            });
        }

        Ok(SubmissionOutcome {
            ids,
            batch_id,
            skipped,
        })
    }

    /// Fill nominal/total weight from the size record when the buyer did
    /// not override them. Supplied values are never touched.
    async fn derive_weight(&self, item: &mut NewEnquiry) -> Result<(), TolaError> {
        if !item.custom_weight && item.weight.is_none() {
            if let Some(size) = directory::find_size(&self.db, item.size_id).await? {
                item.weight = size.weight;
            }
        }
        if item.total_weight.is_none() {
            if let Some(weight) = item.weight {
                item.total_weight = Some(weight * item.quantity as f64);
            }
        }
        Ok(())
    }

    /// Apply a staff partial update, then push the change to the buyer's
    /// live channel from a background task.
    pub async fn update(&self, id: i64, patch: &EnquiryPatch) -> Result<(), TolaError> {
        let affected = enquiries::update(&self.db, id, patch).await?;
        if affected == 0 {
            return Err(TolaError::NotFound {
                what: "enquiry",
                id,
            });
        }

        let db = self.db.clone();
        let live = Arc::clone(&self.live);
        tokio::spawn(async move {
            broadcast_update(&db, live.as_ref(), id).await;
        });
        Ok(())
    }

    /// Hard delete, then tell the buyer's live channel the row is gone.
    pub async fn remove(&self, id: i64) -> Result<(), TolaError> {
        // The buyer key must be read before the row disappears.
        let existing = enquiries::find_joined_by_id(&self.db, id).await?;

        let affected = enquiries::delete(&self.db, id).await?;
        if affected == 0 {
            return Err(TolaError::NotFound {
                what: "enquiry",
                id,
            });
        }

        if let Some(buyer_id) = existing.and_then(|d| d.enquiry.user_id) {
            let live = Arc::clone(&self.live);
            tokio::spawn(async move {
                live.emit(
                    &buyer_id.to_string(),
                    events::ENQUIRY_DELETE,
                    serde_json::json!({ "id": id }),
                )
                .await;
            });
        }
        Ok(())
    }
}

/// Re-read the authoritative joined record and push it to the buyer's
/// channel. All failure paths are logged and swallowed: delivery problems
/// never reach the staff member whose update triggered the push.
async fn broadcast_update(db: &Database, live: &dyn LiveChannel, id: i64) {
    match enquiries::find_joined_by_id(db, id).await {
        Ok(Some(detail)) => {
            let Some(buyer_id) = detail.enquiry.user_id else {
                debug!(id, "enquiry has no buyer reference, broadcast skipped");
                return;
            };
            match serde_json::to_value(&detail) {
                Ok(payload) => {
                    live.emit(&buyer_id.to_string(), events::ENQUIRY_UPDATE, payload)
                        .await;
                }
                Err(e) => warn!(error = %e, id, "broadcast payload serialization failed"),
            }
        }
        Ok(None) => debug!(id, "enquiry vanished before broadcast"),
        Err(e) => warn!(error = %e, id, "status broadcast re-read failed"),
    }
}
