// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission normalization: three client payload shapes, one canonical
//! batch of line items.
//!
//! Shapes are modeled as a tagged union whose declaration order IS the
//! precedence order: cart, then explicit list, then single item. A body
//! matching none of them is an invalid request.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use tola_core::{NewEnquiry, TolaError};

/// One raw line item as submitted. Everything is optional here; the
/// mandatory-field check happens in [`EnquiryDraft::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnquiryDraft {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub size_id: Option<i64>,
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
    pub spec_label: Option<String>,
    #[serde(default)]
    pub batch_id: Option<String>,
}

impl EnquiryDraft {
    /// Promote a draft to an insertable line item.
    ///
    /// Product reference, buyer reference, size reference, and a positive
    /// quantity are mandatory; the returned reason feeds the drop log. A
    /// dropped item never fails the batch.
    pub fn validate(self) -> Result<NewEnquiry, &'static str> {
        let Some(product_id) = self.product_id else {
            return Err("missing product reference");
        };
        let Some(user_id) = self.user_id else {
            return Err("missing buyer reference");
        };
        let Some(size_id) = self.size_id else {
            return Err("missing size reference");
        };
        let quantity = match self.quantity {
            Some(q) if q > 0 => q,
            Some(_) => return Err("quantity must be positive"),
            None => return Err("missing quantity"),
        };
        Ok(NewEnquiry {
            product_id,
            user_id,
            size_id,
            quantity,
            tunch: self.tunch,
            weight: self.weight,
            total_weight: self.total_weight,
            custom_weight: self.custom_weight.unwrap_or(false),
            spec_label: self.spec_label,
            batch_id: self.batch_id,
        })
    }
}

/// Cart shape: a buyer reference plus a sequence of items.
#[derive(Debug, Deserialize)]
struct CartSubmission {
    user_id: i64,
    items: Vec<EnquiryDraft>,
}

/// Single-item shape: product and buyer references carried directly.
#[derive(Debug, Deserialize)]
struct SingleSubmission {
    product_id: i64,
    user_id: i64,
    #[serde(default)]
    size_id: Option<i64>,
    #[serde(default)]
    quantity: Option<i64>,
    #[serde(default)]
    tunch: Option<String>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    total_weight: Option<f64>,
    #[serde(default)]
    custom_weight: Option<bool>,
    #[serde(default)]
    spec_label: Option<String>,
}

/// The three recognized shapes, tried in declaration order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmissionPayload {
    Cart(CartSubmission),
    List(Vec<EnquiryDraft>),
    Single(SingleSubmission),
}

/// Normalize a request body into `(line items, batch id)`.
///
/// Batch id rules:
/// - cart: a fresh id is generated unconditionally, even for one item;
/// - explicit list: a fresh id only when the list has more than one
///   element, overwriting any caller-supplied value either way;
/// - single item: always `None`.
pub fn normalize(body: Value) -> Result<(Vec<EnquiryDraft>, Option<String>), TolaError> {
    let payload: SubmissionPayload = serde_json::from_value(body)
        .map_err(|_| TolaError::InvalidRequest("unrecognized submission shape".to_string()))?;

    match payload {
        SubmissionPayload::Cart(cart) => {
            if cart.items.is_empty() {
                return Err(TolaError::InvalidRequest(
                    "cart submission carries no items".to_string(),
                ));
            }
            let batch_id = Uuid::new_v4().to_string();
            let items = cart
                .items
                .into_iter()
                .map(|mut item| {
                    item.batch_id = Some(batch_id.clone());
                    if item.user_id.is_none() {
                        item.user_id = Some(cart.user_id);
                    }
                    item
                })
                .collect();
            Ok((items, Some(batch_id)))
        }
        SubmissionPayload::List(items) => {
            if items.is_empty() {
                return Err(TolaError::InvalidRequest(
                    "enquiry list carries no items".to_string(),
                ));
            }
            let batch_id = (items.len() > 1).then(|| Uuid::new_v4().to_string());
            let items = items
                .into_iter()
                .map(|mut item| {
                    item.batch_id = batch_id.clone();
                    item
                })
                .collect();
            Ok((items, batch_id))
        }
        SubmissionPayload::Single(single) => {
            let draft = EnquiryDraft {
                product_id: Some(single.product_id),
                user_id: Some(single.user_id),
                size_id: single.size_id,
                quantity: single.quantity,
                tunch: single.tunch,
                weight: single.weight,
                total_weight: single.total_weight,
                custom_weight: single.custom_weight,
                spec_label: single.spec_label,
                batch_id: None,
            };
            Ok((vec![draft], None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cart_shape_generates_one_batch_id_for_all_items() {
        let body = json!({
            "user_id": 1,
            "items": [
                {"product_id": 1, "size_id": 1, "quantity": 2},
                {"product_id": 2, "size_id": 2, "quantity": 1},
                {"product_id": 3, "size_id": 3, "quantity": 5}
            ]
        });
        let (items, batch_id) = normalize(body).unwrap();
        assert_eq!(items.len(), 3);
        let batch_id = batch_id.expect("cart always gets a batch id");
        for item in &items {
            assert_eq!(item.batch_id.as_deref(), Some(batch_id.as_str()));
            assert_eq!(item.user_id, Some(1), "cart buyer is stamped onto items");
        }
    }

    #[test]
    fn cart_with_one_item_still_gets_a_batch_id() {
        let body = json!({
            "user_id": 7,
            "items": [{"product_id": 1, "size_id": 1, "quantity": 1}]
        });
        let (items, batch_id) = normalize(body).unwrap();
        assert_eq!(items.len(), 1);
        assert!(batch_id.is_some());
        assert_eq!(items[0].batch_id, batch_id);
    }

    #[test]
    fn empty_cart_is_an_invalid_request() {
        let body = json!({"user_id": 1, "items": []});
        assert!(matches!(
            normalize(body),
            Err(TolaError::InvalidRequest(_))
        ));
    }

    #[test]
    fn list_of_two_gets_a_shared_batch_id() {
        let body = json!([
            {"product_id": 1, "user_id": 1, "size_id": 1, "quantity": 1},
            {"product_id": 2, "user_id": 1, "size_id": 2, "quantity": 2}
        ]);
        let (items, batch_id) = normalize(body).unwrap();
        assert!(batch_id.is_some());
        assert_eq!(items[0].batch_id, batch_id);
        assert_eq!(items[1].batch_id, batch_id);
    }

    #[test]
    fn list_of_one_gets_no_batch_id() {
        let body = json!([{"product_id": 1, "user_id": 1, "size_id": 1, "quantity": 1}]);
        let (items, batch_id) = normalize(body).unwrap();
        assert_eq!(items.len(), 1);
        assert!(batch_id.is_none());
        assert!(items[0].batch_id.is_none());
    }

    #[test]
    fn caller_supplied_batch_id_is_overwritten() {
        let body = json!([
            {"product_id": 1, "user_id": 1, "size_id": 1, "quantity": 1, "batch_id": "spoofed"}
        ]);
        let (items, _) = normalize(body).unwrap();
        assert!(items[0].batch_id.is_none(), "spoofed value is cleared");
    }

    #[test]
    fn empty_list_is_an_invalid_request() {
        assert!(matches!(
            normalize(json!([])),
            Err(TolaError::InvalidRequest(_))
        ));
    }

    #[test]
    fn single_item_shape_has_no_batch_id() {
        let body = json!({
            "product_id": 4, "user_id": 2, "size_id": 9,
            "quantity": 3, "tunch": "91.6"
        });
        let (items, batch_id) = normalize(body).unwrap();
        assert_eq!(items.len(), 1);
        assert!(batch_id.is_none());
        assert_eq!(items[0].product_id, Some(4));
        assert_eq!(items[0].tunch.as_deref(), Some("91.6"));
    }

    #[test]
    fn cart_wins_over_single_when_both_could_match() {
        // A body carrying user_id + items is a cart even though the items
        // themselves could be read as bare objects.
        let body = json!({
            "user_id": 1,
            "items": [{"product_id": 1, "size_id": 1, "quantity": 1}]
        });
        let (_, batch_id) = normalize(body).unwrap();
        assert!(batch_id.is_some(), "cart precedence applies");
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        for body in [json!("a string"), json!(42), json!({}), json!({"foo": "bar"})] {
            assert!(
                matches!(normalize(body.clone()), Err(TolaError::InvalidRequest(_))),
                "body {body} should be rejected"
            );
        }
    }

    #[test]
    fn validate_requires_all_mandatory_fields() {
        let complete = EnquiryDraft {
            product_id: Some(1),
            user_id: Some(1),
            size_id: Some(1),
            quantity: Some(2),
            ..Default::default()
        };
        assert!(complete.clone().validate().is_ok());

        let mut missing_quantity = complete.clone();
        missing_quantity.quantity = None;
        assert_eq!(missing_quantity.validate().unwrap_err(), "missing quantity");

        let mut zero_quantity = complete.clone();
        zero_quantity.quantity = Some(0);
        assert_eq!(
            zero_quantity.validate().unwrap_err(),
            "quantity must be positive"
        );

        let mut missing_size = complete;
        missing_size.size_id = None;
        assert_eq!(missing_size.validate().unwrap_err(), "missing size reference");
    }

    #[test]
    fn validate_defaults_custom_weight_to_false() {
        let draft = EnquiryDraft {
            product_id: Some(1),
            user_id: Some(1),
            size_id: Some(1),
            quantity: Some(1),
            ..Default::default()
        };
        let item = draft.validate().unwrap();
        assert!(!item.custom_weight);
    }
}
