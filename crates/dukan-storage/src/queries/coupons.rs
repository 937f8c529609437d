// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coupon lookup for bulk-cart hand-offs. Codes are matched uppercase.

use std::str::FromStr;

use dukan_core::DukanError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{Coupon, DiscountType};

/// Find an active coupon by shop and code (case-insensitive on the code).
pub async fn find_active(
    db: &Database,
    shop_id: i64,
    code: &str,
) -> Result<Option<Coupon>, DukanError> {
    let code = code.trim().to_uppercase();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT code, discount_type, value FROM coupons
                 WHERE shop_id = ?1 AND code = ?2 AND is_active = 1",
            )?;
            let result = stmt.query_row(params![shop_id, code], |row| {
                let discount_type: String = row.get(1)?;
                Ok(Coupon {
                    code: row.get(0)?,
                    discount_type: DiscountType::from_str(&discount_type)
                        .unwrap_or(DiscountType::Flat),
                    value: row.get(2)?,
                })
            });
            match result {
                Ok(coupon) => Ok(Some(coupon)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Seed one coupon row.
pub async fn insert_coupon(
    db: &Database,
    shop_id: i64,
    code: &str,
    discount_type: DiscountType,
    value: f64,
    is_active: bool,
) -> Result<i64, DukanError> {
    let code = code.trim().to_uppercase();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO coupons (shop_id, code, discount_type, value, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    shop_id,
                    code,
                    discount_type.to_string(),
                    value,
                    is_active as i64
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("coupons_test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.connection()
            .call(|conn| {
                conn.execute("INSERT INTO shops (id, name) VALUES (1, 'Test Shop')", [])?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive_on_code() {
        let (db, _dir) = setup_db().await;
        insert_coupon(&db, 1, "SALE20", DiscountType::Percent, 20.0, true)
            .await
            .unwrap();

        let coupon = find_active(&db, 1, "sale20").await.unwrap().unwrap();
        assert_eq!(coupon.code, "SALE20");
        assert_eq!(coupon.discount_type, DiscountType::Percent);
    }

    #[tokio::test]
    async fn inactive_coupon_is_invisible() {
        let (db, _dir) = setup_db().await;
        insert_coupon(&db, 1, "DEAD", DiscountType::Flat, 50.0, false)
            .await
            .unwrap();
        assert!(find_active(&db, 1, "DEAD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn coupon_is_scoped_to_shop() {
        let (db, _dir) = setup_db().await;
        insert_coupon(&db, 1, "MINE", DiscountType::Flat, 10.0, true)
            .await
            .unwrap();
        assert!(find_active(&db, 2, "MINE").await.unwrap().is_none());
    }
}
