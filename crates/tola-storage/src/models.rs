// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `tola-core::types` so the pipeline, gateway,
//! and mocks share one definition. This module re-exports them for
//! convenience within the storage crate, alongside the row types of the
//! catalog/directory lookup collaborator.

use serde::Serialize;

pub use tola_core::types::{Enquiry, EnquiryDetail, EnquiryPatch, NewEnquiry, StaffRecipient};

/// One buyer or staff row from the directory.
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: String,
    pub active: bool,
}

/// One catalog product row.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
}

/// One size/spec row. `weight` is the stored weight an enquiry derives its
/// nominal weight from when the buyer does not override it.
#[derive(Debug, Clone, Serialize)]
pub struct SizeRow {
    pub id: i64,
    pub product_id: Option<i64>,
    pub die_no: Option<String>,
    pub weight: Option<f64>,
}
