// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enquiry CRUD and joined read projections.
//!
//! Batch creation is deliberately NOT wrapped in a transaction: inserts run
//! sequentially and an individual constraint failure skips that item while
//! siblings already inserted stay. Callers that need the full-batch view
//! read the returned id list.

use rusqlite::{params, params_from_iter, types::Value};
use tracing::warn;

use tola_core::TolaError;

use crate::database::{map_tr_err, Database};
use crate::models::{Enquiry, EnquiryDetail, EnquiryPatch, NewEnquiry};

/// Joined projection over products, sizes, and users. LEFT JOINs throughout:
/// every foreign reference nulls on delete.
const JOINED_SELECT: &str = "
    SELECT e.id, e.product_id, e.user_id, e.size_id, e.quantity, e.tunch,
           e.weight, e.total_weight, e.custom_weight, e.spec_label,
           e.batch_id, e.status, e.created_at, e.updated_at,
           p.name, p.category, s.die_no, s.weight, u.name, u.email, u.mobile
    FROM enquiries e
    LEFT JOIN products p ON p.id = e.product_id
    LEFT JOIN sizes s    ON s.id = e.size_id
    LEFT JOIN users u    ON u.id = e.user_id";

fn detail_from_row(row: &rusqlite::Row<'_>) -> Result<EnquiryDetail, rusqlite::Error> {
    Ok(EnquiryDetail {
        enquiry: Enquiry {
            id: row.get(0)?,
            product_id: row.get(1)?,
            user_id: row.get(2)?,
            size_id: row.get(3)?,
            quantity: row.get(4)?,
            tunch: row.get(5)?,
            weight: row.get(6)?,
            total_weight: row.get(7)?,
            custom_weight: row.get(8)?,
            spec_label: row.get(9)?,
            batch_id: row.get(10)?,
            status: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        },
        product_name: row.get(14)?,
        product_category: row.get(15)?,
        size_die_no: row.get(16)?,
        size_weight: row.get(17)?,
        buyer_name: row.get(18)?,
        buyer_email: row.get(19)?,
        buyer_mobile: row.get(20)?,
    })
}

/// Insert a batch of line items sequentially, skipping constraint failures.
///
/// Returns the assigned ids of the successful inserts, in input order. A
/// foreign-key or CHECK violation drops that item (logged) and the batch
/// continues; connection-level failures abort the whole call.
pub async fn create_many(db: &Database, items: &[NewEnquiry]) -> Result<Vec<i64>, TolaError> {
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match insert_one(db, item).await {
            Ok(id) => ids.push(id),
            Err(TolaError::Constraint { message }) => {
                warn!(%message, "line item rejected by constraint, batch continues");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(ids)
}

async fn insert_one(db: &Database, item: &NewEnquiry) -> Result<i64, TolaError> {
    let item = item.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO enquiries
                   (product_id, user_id, size_id, quantity, tunch, weight,
                    total_weight, custom_weight, spec_label, batch_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    item.product_id,
                    item.user_id,
                    item.size_id,
                    item.quantity,
                    item.tunch,
                    item.weight,
                    item.total_weight,
                    item.custom_weight,
                    item.spec_label,
                    item.batch_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the joined records for exactly the given ids, ordered by id.
///
/// Used by the notification dispatcher immediately after `create_many`.
pub async fn find_by_ids(db: &Database, ids: &[i64]) -> Result<Vec<EnquiryDetail>, TolaError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids = ids.to_vec();
    db.connection()
        .call(move |conn| {
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!("{JOINED_SELECT} WHERE e.id IN ({placeholders}) ORDER BY e.id ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(ids.iter()), detail_from_row)?;
            let mut details = Vec::new();
            for row in rows {
                details.push(row?);
            }
            Ok(details)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply only the supplied fields; absent fields stay untouched.
///
/// Always bumps `updated_at`. Returns the affected row count; 0 means the
/// id does not exist and the caller surfaces `NotFound`.
pub async fn update(db: &Database, id: i64, patch: &EnquiryPatch) -> Result<u64, TolaError> {
    let patch = patch.clone();
    db.connection()
        .call(move |conn| {
            let mut sets: Vec<&str> = Vec::new();
            let mut values: Vec<Value> = Vec::new();

            if let Some(status) = patch.status {
                sets.push("status = ?");
                values.push(Value::Text(status));
            }
            if let Some(quantity) = patch.quantity {
                sets.push("quantity = ?");
                values.push(Value::Integer(quantity));
            }
            if let Some(tunch) = patch.tunch {
                sets.push("tunch = ?");
                values.push(Value::Text(tunch));
            }
            if let Some(weight) = patch.weight {
                sets.push("weight = ?");
                values.push(Value::Real(weight));
            }
            if let Some(total_weight) = patch.total_weight {
                sets.push("total_weight = ?");
                values.push(Value::Real(total_weight));
            }
            if let Some(custom_weight) = patch.custom_weight {
                sets.push("custom_weight = ?");
                values.push(Value::Integer(custom_weight.into()));
            }
            if let Some(size_id) = patch.size_id {
                sets.push("size_id = ?");
                values.push(Value::Integer(size_id));
            }
            if let Some(spec_label) = patch.spec_label {
                sets.push("spec_label = ?");
                values.push(Value::Text(spec_label));
            }

            sets.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
            let sql = format!("UPDATE enquiries SET {} WHERE id = ?", sets.join(", "));
            values.push(Value::Integer(id));

            let affected = conn.execute(&sql, params_from_iter(values))?;
            Ok(affected as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// All enquiries joined, newest first. The staff listing view.
pub async fn find_all_joined(db: &Database) -> Result<Vec<EnquiryDetail>, TolaError> {
    db.connection()
        .call(|conn| {
            let sql = format!("{JOINED_SELECT} ORDER BY e.created_at DESC, e.id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], detail_from_row)?;
            let mut details = Vec::new();
            for row in rows {
                details.push(row?);
            }
            Ok(details)
        })
        .await
        .map_err(map_tr_err)
}

/// One enquiry joined, or `None` if the id does not exist.
pub async fn find_joined_by_id(db: &Database, id: i64) -> Result<Option<EnquiryDetail>, TolaError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("{JOINED_SELECT} WHERE e.id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let result = stmt.query_row(params![id], detail_from_row);
            match result {
                Ok(detail) => Ok(Some(detail)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Per-buyer history, newest first.
pub async fn find_joined_by_buyer(
    db: &Database,
    buyer_id: i64,
) -> Result<Vec<EnquiryDetail>, TolaError> {
    db.connection()
        .call(move |conn| {
            let sql =
                format!("{JOINED_SELECT} WHERE e.user_id = ?1 ORDER BY e.created_at DESC, e.id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![buyer_id], detail_from_row)?;
            let mut details = Vec::new();
            for row in rows {
                details.push(row?);
            }
            Ok(details)
        })
        .await
        .map_err(map_tr_err)
}

/// Hard delete. Returns the affected row count; 0 means `NotFound` upstream.
pub async fn delete(db: &Database, id: i64) -> Result<u64, TolaError> {
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM enquiries WHERE id = ?1", params![id])?;
            Ok(affected as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tola_config::model::StorageConfig;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let db = Database::open(&config).await.unwrap();
        seed_catalog(&db).await;
        (db, dir)
    }

    async fn seed_catalog(db: &Database) {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "INSERT INTO products (id, name, category) VALUES
                        (1, 'Classic Bangle', 'bangle'),
                        (2, 'Rope Chain', 'chain');
                     INSERT INTO users (id, name, email, mobile, role, active) VALUES
                        (1, 'Asha', 'asha@example.com', '9000000001', 'buyer', 1),
                        (9, 'Staff One', 'staff1@example.com', NULL, 'admin', 1);
                     INSERT INTO sizes (id, product_id, die_no, weight) VALUES
                        (1, 1, 'D-114', 11.5),
                        (2, 2, 'C-22', 8.25);",
                )?;
                Ok(())
            })
            .await
            .unwrap();
    }

    fn make_item(product_id: i64, size_id: i64) -> NewEnquiry {
        NewEnquiry {
            product_id,
            user_id: 1,
            size_id,
            quantity: 2,
            tunch: Some("92.5".to_string()),
            weight: Some(11.5),
            total_weight: Some(23.0),
            custom_weight: false,
            spec_label: None,
            batch_id: Some("batch-abc".to_string()),
        }
    }

    #[tokio::test]
    async fn create_many_assigns_ids_and_round_trips() {
        let (db, _dir) = setup_db().await;

        let items = vec![make_item(1, 1), make_item(2, 2)];
        let ids = create_many(&db, &items).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids[1] > ids[0], "ids are monotonically assigned");

        let details = find_by_ids(&db, &ids).await.unwrap();
        assert_eq!(details.len(), 2);

        // Every field supplied at creation comes back unchanged.
        let first = &details[0].enquiry;
        assert_eq!(first.quantity, 2);
        assert_eq!(first.tunch.as_deref(), Some("92.5"));
        assert_eq!(first.weight, Some(11.5));
        assert_eq!(first.total_weight, Some(23.0));
        assert!(!first.custom_weight);
        assert_eq!(first.batch_id.as_deref(), Some("batch-abc"));
        assert_eq!(first.status, "pending");

        // Joined columns come from the catalog rows.
        assert_eq!(details[0].product_name.as_deref(), Some("Classic Bangle"));
        assert_eq!(details[0].size_die_no.as_deref(), Some("D-114"));
        assert_eq!(details[0].buyer_email.as_deref(), Some("asha@example.com"));
    }

    #[tokio::test]
    async fn create_many_skips_bad_foreign_key_and_keeps_siblings() {
        let (db, _dir) = setup_db().await;

        let mut bad = make_item(1, 1);
        bad.product_id = 777; // no such product
        let items = vec![make_item(1, 1), bad, make_item(2, 2)];

        let ids = create_many(&db, &items).await.unwrap();
        assert_eq!(ids.len(), 2, "the bad item is skipped, siblings persist");

        let all = find_all_joined(&db).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let (db, _dir) = setup_db().await;
        let ids = create_many(&db, &[make_item(1, 1)]).await.unwrap();
        let id = ids[0];

        // Millisecond timestamps: make sure the update lands in a later tick.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let patch = EnquiryPatch {
            status: Some("confirmed".to_string()),
            ..Default::default()
        };
        let affected = update(&db, id, &patch).await.unwrap();
        assert_eq!(affected, 1);

        let detail = find_joined_by_id(&db, id).await.unwrap().unwrap();
        assert_eq!(detail.enquiry.status, "confirmed");
        // Untouched fields survive.
        assert_eq!(detail.enquiry.quantity, 2);
        assert_eq!(detail.enquiry.tunch.as_deref(), Some("92.5"));
        // updated_at is bumped strictly past created_at (ISO-8601 text sorts).
        assert!(detail.enquiry.updated_at > detail.enquiry.created_at);
    }

    #[tokio::test]
    async fn update_nonexistent_id_affects_zero_rows() {
        let (db, _dir) = setup_db().await;
        let patch = EnquiryPatch {
            status: Some("confirmed".to_string()),
            ..Default::default()
        };
        let affected = update(&db, 424242, &patch).await.unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn update_rejects_nonpositive_quantity() {
        let (db, _dir) = setup_db().await;
        let ids = create_many(&db, &[make_item(1, 1)]).await.unwrap();

        let patch = EnquiryPatch {
            quantity: Some(0),
            ..Default::default()
        };
        let result = update(&db, ids[0], &patch).await;
        assert!(matches!(result, Err(TolaError::Constraint { .. })));
    }

    #[tokio::test]
    async fn list_views_are_newest_first() {
        let (db, _dir) = setup_db().await;
        let first = create_many(&db, &[make_item(1, 1)]).await.unwrap()[0];
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = create_many(&db, &[make_item(2, 2)]).await.unwrap()[0];

        let all = find_all_joined(&db).await.unwrap();
        assert_eq!(all[0].enquiry.id, second);
        assert_eq!(all[1].enquiry.id, first);

        let mine = find_joined_by_buyer(&db, 1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].enquiry.id, second);

        let nobody = find_joined_by_buyer(&db, 777).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn delete_twice_second_affects_zero() {
        let (db, _dir) = setup_db().await;
        let ids = create_many(&db, &[make_item(1, 1)]).await.unwrap();

        assert_eq!(delete(&db, ids[0]).await.unwrap(), 1);
        assert_eq!(delete(&db, ids[0]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_a_product_nulls_the_reference() {
        let (db, _dir) = setup_db().await;
        let ids = create_many(&db, &[make_item(1, 1)]).await.unwrap();

        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM products WHERE id = 1", [])?;
                Ok(())
            })
            .await
            .unwrap();

        let detail = find_joined_by_id(&db, ids[0]).await.unwrap().unwrap();
        assert_eq!(detail.enquiry.product_id, None);
        assert_eq!(detail.product_name, None);
        // The enquiry itself survives the catalog deletion.
        assert_eq!(detail.enquiry.quantity, 2);
    }

    #[tokio::test]
    async fn find_by_ids_returns_exactly_the_requested_rows() {
        let (db, _dir) = setup_db().await;
        let ids = create_many(&db, &[make_item(1, 1), make_item(2, 2), make_item(1, 2)])
            .await
            .unwrap();

        let subset = find_by_ids(&db, &ids[..2]).await.unwrap();
        assert_eq!(subset.len(), 2);
        assert_eq!(subset[0].enquiry.id, ids[0]);
        assert_eq!(subset[1].enquiry.id, ids[1]);

        let none = find_by_ids(&db, &[]).await.unwrap();
        assert!(none.is_empty());
    }
}
