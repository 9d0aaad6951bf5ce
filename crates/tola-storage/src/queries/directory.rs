// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog/size/buyer lookups and the admin directory projection.
//!
//! These are the read-only collaborator interfaces: lookups return `None`
//! for absent ids, and the staff recipient list is derived from the users
//! table rather than owned by the pipeline.

use rusqlite::params;

use tola_core::TolaError;

use crate::database::{map_tr_err, Database};
use crate::models::{ProductRow, SizeRow, StaffRecipient, UserRow};

/// Email addresses of all currently-active staff, the notification audience.
pub async fn active_staff(db: &Database) -> Result<Vec<StaffRecipient>, TolaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, email FROM users
                 WHERE role = 'admin' AND active = 1
                 ORDER BY name ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(StaffRecipient {
                    name: row.get(0)?,
                    email: row.get(1)?,
                })
            })?;
            let mut staff = Vec::new();
            for row in rows {
                staff.push(row?);
            }
            Ok(staff)
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a user by id.
pub async fn find_user(db: &Database, id: i64) -> Result<Option<UserRow>, TolaError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, name, email, mobile, role, active FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        mobile: row.get(3)?,
                        role: row.get(4)?,
                        active: row.get(5)?,
                    })
                },
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a catalog product by id.
pub async fn find_product(db: &Database, id: i64) -> Result<Option<ProductRow>, TolaError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, name, category FROM products WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ProductRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        category: row.get(2)?,
                    })
                },
            );
            match result {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a size/spec record by id. Supplies the stored weight an enquiry
/// derives from when the buyer did not override it.
pub async fn find_size(db: &Database, id: i64) -> Result<Option<SizeRow>, TolaError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, product_id, die_no, weight FROM sizes WHERE id = ?1",
                params![id],
                |row| {
                    Ok(SizeRow {
                        id: row.get(0)?,
                        product_id: row.get(1)?,
                        die_no: row.get(2)?,
                        weight: row.get(3)?,
                    })
                },
            );
            match result {
                Ok(size) => Ok(Some(size)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
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
            database_path: dir.path().join("dir.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let db = Database::open(&config).await.unwrap();
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "INSERT INTO users (id, name, email, role, active) VALUES
                        (1, 'Asha', 'asha@example.com', 'buyer', 1),
                        (2, 'Staff A', 'a@example.com', 'admin', 1),
                        (3, 'Staff B', 'b@example.com', 'admin', 0),
                        (4, 'Staff C', 'c@example.com', 'admin', 1);
                     INSERT INTO products (id, name, category) VALUES
                        (1, 'Classic Bangle', 'bangle');
                     INSERT INTO sizes (id, product_id, die_no, weight) VALUES
                        (1, 1, 'D-114', 11.5);",
                )?;
                Ok(())
            })
            .await
            .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn active_staff_excludes_buyers_and_inactive_admins() {
        let (db, _dir) = setup_db().await;
        let staff = active_staff(&db).await.unwrap();
        let emails: Vec<&str> = staff.iter().map(|s| s.email.as_str()).collect();
        assert_eq!(emails, vec!["a@example.com", "c@example.com"]);
    }

    #[tokio::test]
    async fn lookups_return_none_for_absent_ids() {
        let (db, _dir) = setup_db().await;
        assert!(find_user(&db, 99).await.unwrap().is_none());
        assert!(find_product(&db, 99).await.unwrap().is_none());
        assert!(find_size(&db, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_size_supplies_stored_weight() {
        let (db, _dir) = setup_db().await;
        let size = find_size(&db, 1).await.unwrap().unwrap();
        assert_eq!(size.die_no.as_deref(), Some("D-114"));
        assert_eq!(size.weight, Some(11.5));
    }
}
