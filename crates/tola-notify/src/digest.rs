// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregated digest construction: one subject + HTML body per batch.

use tola_core::EnquiryDetail;

const NOT_AVAILABLE: &str = "N/A";

/// Build the digest for one submission's freshly created records.
///
/// Returns `None` for an empty batch; the dispatcher never sends in that
/// case. The buyer contact block is rendered once, followed by one table
/// row per line item.
pub fn build(details: &[EnquiryDetail]) -> Option<(String, String)> {
    let first = details.first()?;
    let buyer = first.buyer_name.as_deref().unwrap_or("Unknown buyer");

    let subject = if details.len() == 1 {
        format!("New enquiry from {buyer}")
    } else {
        format!("New enquiry from {buyer} ({} items)", details.len())
    };

    let mut body = String::new();
    body.push_str("<h2>New price enquiry</h2>\n");
    body.push_str(&format!(
        "<p><strong>Buyer:</strong> {}<br/>\n<strong>Email:</strong> {}<br/>\n<strong>Mobile:</strong> {}</p>\n",
        buyer,
        first.buyer_email.as_deref().unwrap_or(NOT_AVAILABLE),
        first.buyer_mobile.as_deref().unwrap_or(NOT_AVAILABLE),
    ));

    body.push_str("<table border=\"1\" cellpadding=\"6\" cellspacing=\"0\">\n");
    body.push_str(
        "<tr><th>Item</th><th>Die No</th><th>Qty</th><th>Weight</th><th>Tunch</th></tr>\n",
    );
    for detail in details {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            detail.product_name.as_deref().unwrap_or(NOT_AVAILABLE),
            die_identifier(detail),
            detail.enquiry.quantity,
            weight_cell(detail),
            tunch_cell(detail),
        ));
    }
    body.push_str("</table>\n");

    Some((subject, body))
}

/// Resolve the die/spec identifier through the explicit fallback chain:
/// buyer-entered label first, then the size record's die number, then the
/// sentinel.
fn die_identifier(detail: &EnquiryDetail) -> &str {
    detail
        .enquiry
        .spec_label
        .as_deref()
        .or(detail.size_die_no.as_deref())
        .unwrap_or(NOT_AVAILABLE)
}

/// Weight column: buyer-overridden weights get a visual marker and an
/// annotation; otherwise the size record's stored weight, or the sentinel.
fn weight_cell(detail: &EnquiryDetail) -> String {
    if detail.enquiry.custom_weight {
        let weight = detail
            .enquiry
            .weight
            .map(|w| format!("{w} g"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        format!("<strong>{weight}</strong> (Custom Weight)")
    } else {
        detail
            .size_weight
            .map(|w| format!("{w} g"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

fn tunch_cell(detail: &EnquiryDetail) -> String {
    detail
        .enquiry
        .tunch
        .as_deref()
        .map(|t| format!("{t}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tola_core::{Enquiry, STATUS_PENDING};

    fn make_detail(id: i64) -> EnquiryDetail {
        EnquiryDetail {
            enquiry: Enquiry {
                id,
                product_id: Some(1),
                user_id: Some(1),
                size_id: Some(1),
                quantity: 2,
                tunch: Some("92.5".to_string()),
                weight: None,
                total_weight: None,
                custom_weight: false,
                spec_label: None,
                batch_id: None,
                status: STATUS_PENDING.to_string(),
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
                updated_at: "2026-01-01T00:00:00.000Z".to_string(),
            },
            product_name: Some("Classic Bangle".to_string()),
            product_category: Some("bangle".to_string()),
            size_die_no: Some("D-114".to_string()),
            size_weight: Some(11.5),
            buyer_name: Some("Asha".to_string()),
            buyer_email: Some("asha@example.com".to_string()),
            buyer_mobile: Some("9000000001".to_string()),
        }
    }

    fn row_count(body: &str) -> usize {
        body.matches("<tr><td>").count()
    }

    #[test]
    fn empty_batch_builds_nothing() {
        assert!(build(&[]).is_none());
    }

    #[test]
    fn single_item_subject_names_the_buyer() {
        let (subject, body) = build(&[make_detail(1)]).unwrap();
        assert_eq!(subject, "New enquiry from Asha");
        assert_eq!(row_count(&body), 1);
    }

    #[test]
    fn multi_item_subject_carries_the_count() {
        let details = vec![make_detail(1), make_detail(2), make_detail(3)];
        let (subject, body) = build(&details).unwrap();
        assert_eq!(subject, "New enquiry from Asha (3 items)");
        assert_eq!(row_count(&body), 3);
    }

    #[test]
    fn buyer_contact_block_renders_once() {
        let details = vec![make_detail(1), make_detail(2)];
        let (_, body) = build(&details).unwrap();
        assert_eq!(body.matches("asha@example.com").count(), 1);
    }

    #[test]
    fn die_identifier_prefers_buyer_label_over_size_die() {
        let mut detail = make_detail(1);
        detail.enquiry.spec_label = Some("CUSTOM-9".to_string());
        assert_eq!(die_identifier(&detail), "CUSTOM-9");

        detail.enquiry.spec_label = None;
        assert_eq!(die_identifier(&detail), "D-114");

        detail.size_die_no = None;
        assert_eq!(die_identifier(&detail), "N/A");
    }

    #[test]
    fn custom_weight_gets_marker_and_annotation() {
        let mut detail = make_detail(1);
        detail.enquiry.custom_weight = true;
        detail.enquiry.weight = Some(14.25);
        let cell = weight_cell(&detail);
        assert_eq!(cell, "<strong>14.25 g</strong> (Custom Weight)");
    }

    #[test]
    fn derived_weight_comes_from_the_size_record() {
        let detail = make_detail(1);
        assert_eq!(weight_cell(&detail), "11.5 g");

        let mut no_size = make_detail(2);
        no_size.size_weight = None;
        assert_eq!(weight_cell(&no_size), "N/A");
    }

    #[test]
    fn tunch_renders_with_percent_suffix() {
        let detail = make_detail(1);
        assert_eq!(tunch_cell(&detail), "92.5%");

        let mut missing = make_detail(2);
        missing.enquiry.tunch = None;
        assert_eq!(tunch_cell(&missing), "N/A");
    }

    #[test]
    fn unknown_buyer_falls_back_in_subject() {
        let mut detail = make_detail(1);
        detail.buyer_name = None;
        let (subject, _) = build(&[detail]).unwrap();
        assert_eq!(subject, "New enquiry from Unknown buyer");
    }
}
