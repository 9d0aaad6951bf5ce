// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff notification dispatch for the tola enquiry service.
//!
//! One submission produces at most one aggregated email digest to all
//! active staff, built from the freshly created joined records. Sending is
//! best-effort: transport failures are logged and never surface to the
//! buyer-facing request.

pub mod digest;
pub mod dispatch;
pub mod transport;

pub use dispatch::dispatch;
pub use transport::{LogMailer, SmtpMailer};
