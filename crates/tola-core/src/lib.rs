// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the tola enquiry service.
//!
//! This crate provides the error taxonomy, domain types, and the adapter
//! traits for the external collaborators (mail transport, live channel).
//! Every other crate in the workspace builds on these definitions.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TolaError;
pub use types::{
    Enquiry, EnquiryDetail, EnquiryPatch, NewEnquiry, StaffRecipient, STATUS_PENDING,
};

pub use traits::{LiveChannel, MailTransport};
