// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch: read the batch back, build one digest, make one transport call.

use tracing::{debug, info, warn};

use tola_core::{MailTransport, TolaError};
use tola_storage::queries::{directory, enquiries};
use tola_storage::Database;

use crate::digest;

/// Notify all active staff about one submission's created records.
///
/// Runs strictly after every insert of the batch has completed: callers
/// hand over the final id list. Exactly one `send` happens per call
/// regardless of line-item count; an empty recipient list downgrades to a
/// warning because a missing audience must never fail the buyer-facing
/// request. Transport failures are likewise recovered here.
///
/// Storage errors do propagate: the caller runs dispatch as a background
/// task and logs them.
pub async fn dispatch(
    db: &Database,
    transport: &dyn MailTransport,
    ids: &[i64],
) -> Result<(), TolaError> {
    let details = enquiries::find_by_ids(db, ids).await?;
    if details.is_empty() {
        debug!("no created records to notify about");
        return Ok(());
    }

    let staff = directory::active_staff(db).await?;
    if staff.is_empty() {
        warn!(
            items = details.len(),
            "no active staff recipients, enquiry digest skipped"
        );
        return Ok(());
    }

    let Some((subject, body)) = digest::build(&details) else {
        return Ok(());
    };
    let recipients: Vec<String> = staff.into_iter().map(|s| s.email).collect();

    match transport.send(&recipients, &subject, &body).await {
        Ok(delivery_id) => {
            info!(
                %delivery_id,
                recipients = recipients.len(),
                items = details.len(),
                "enquiry digest sent"
            );
        }
        Err(e) => {
            warn!(error = %e, "enquiry digest send failed, submission unaffected");
        }
    }
    Ok(())
}
