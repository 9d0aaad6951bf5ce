// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enquiry intake pipeline for the tola service.
//!
//! Normalizes the three recognized submission shapes into a batch of line
//! items, persists them with partial-batch semantics, hands the staff
//! notification to a background task, and pushes status changes to the
//! originating buyer's live channel.

pub mod normalize;
pub mod service;

pub use normalize::{normalize, EnquiryDraft};
pub use service::{EnquiryService, SubmissionOutcome};
