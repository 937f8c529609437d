// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-delivery review capture.

use dukan_core::DukanError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Record a rating reply (1-5) against a delivered order.
pub async fn insert_review(
    db: &Database,
    order_id: i64,
    shop_id: i64,
    shopper_id: &str,
    rating: u8,
) -> Result<i64, DukanError> {
    let shopper_id = shopper_id.to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO reviews (order_id, shop_id, shopper_id, rating, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![order_id, shop_id, shopper_id, i64::from(rating), created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}
