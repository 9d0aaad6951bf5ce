// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the tola workspace.

use serde::{Deserialize, Serialize};

/// The one distinguished status tag: every enquiry starts here.
///
/// Status is an open-ended text tag. Transitions are unrestricted and
/// happen only through the store's `update`; policy about which tags are
/// meaningful belongs to the caller.
pub const STATUS_PENDING: &str = "pending";

/// Event names pushed over the per-buyer live channel.
pub mod events {
    /// A staff member changed an enquiry; payload is the full joined record.
    pub const ENQUIRY_UPDATE: &str = "enquiry:update";
    /// A staff member deleted an enquiry; payload carries the id.
    pub const ENQUIRY_DELETE: &str = "enquiry:delete";
}

/// One persisted enquiry line item.
///
/// Foreign references are optional-on-delete: when the referenced product,
/// buyer, or size record is removed, the reference nulls rather than
/// cascading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: i64,
    pub product_id: Option<i64>,
    pub user_id: Option<i64>,
    pub size_id: Option<i64>,
    pub quantity: i64,
    /// Purity/fineness value, stored as text to permit locale-formatted input.
    pub tunch: Option<String>,
    pub weight: Option<f64>,
    pub total_weight: Option<f64>,
    /// True when the buyer overrode the weight instead of taking the size record's.
    pub custom_weight: bool,
    /// Buyer-entered die/spec label, first link of the die-identifier fallback chain.
    pub spec_label: Option<String>,
    /// Correlation token shared by line items created in one submission call.
    /// `None` for standalone items.
    pub batch_id: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A validated insert payload: everything the store needs to create one row.
///
/// Produced by the submission normalizer after the mandatory-field check;
/// drafts missing a product, buyer, size, or positive quantity never become
/// a `NewEnquiry`.
#[derive(Debug, Clone)]
pub struct NewEnquiry {
    pub product_id: i64,
    pub user_id: i64,
    pub size_id: i64,
    pub quantity: i64,
    pub tunch: Option<String>,
    pub weight: Option<f64>,
    pub total_weight: Option<f64>,
    pub custom_weight: bool,
    pub spec_label: Option<String>,
    pub batch_id: Option<String>,
}

/// Joined read projection: an enquiry plus product, size, and buyer columns.
///
/// All joined columns are optional because the foreign references null on
/// delete.
#[derive(Debug, Clone, Serialize)]
pub struct EnquiryDetail {
    #[serde(flatten)]
    pub enquiry: Enquiry,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub size_die_no: Option<String>,
    pub size_weight: Option<f64>,
    pub buyer_name: Option<String>,
    pub buyer_email: Option<String>,
    pub buyer_mobile: Option<String>,
}

/// Partial update: only supplied fields are applied, absent fields stay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnquiryPatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub tunch: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub total_weight: Option<f64>,
    #[serde(default)]
    pub custom_weight: Option<bool>,
    #[serde(default)]
    pub size_id: Option<i64>,
    #[serde(default)]
    pub spec_label: Option<String>,
}

impl EnquiryPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.quantity.is_none()
            && self.tunch.is_none()
            && self.weight.is_none()
            && self.total_weight.is_none()
            && self.custom_weight.is_none()
            && self.size_id.is_none()
            && self.spec_label.is_none()
    }
}

/// Projection of one active staff member, the notification audience.
#[derive(Debug, Clone, Serialize)]
pub struct StaffRecipient {
    pub name: String,
    pub email: String,
}
