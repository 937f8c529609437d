// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog item reads and the stock decrement used on payment confirmation.
//!
//! `specs` and `variants` are JSON columns; malformed JSON degrades to an
//! item without variants rather than failing the checkout.

use dukan_core::DukanError;
use dukan_core::types::Item;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::NewItem;

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    let specs_json: Option<String> = row.get(7)?;
    let variants_json: Option<String> = row.get(8)?;
    Ok(Item {
        id: row.get(0)?,
        shop_id: row.get(1)?,
        name: row.get(2)?,
        price: row.get(3)?,
        stock_count: row.get(4)?,
        image_url: row.get(5)?,
        description: row.get(6)?,
        specs: specs_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default(),
        variants: variants_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default(),
    })
}

/// Get an item by id.
pub async fn get_item(db: &Database, id: i64) -> Result<Option<Item>, DukanError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, shop_id, name, price, stock_count, image_url, description,
                        specs, variants
                 FROM items WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], item_from_row) {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Decrement stock after a confirmed sale, clamped at zero.
pub async fn decrement_stock(db: &Database, id: i64, qty: u32) -> Result<(), DukanError> {
    let qty = i64::from(qty);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE items SET stock_count = MAX(stock_count - ?2, 0) WHERE id = ?1",
                params![id, qty],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Seed one item row (used by merchant tooling and tests).
pub async fn insert_item(db: &Database, item: &NewItem) -> Result<i64, DukanError> {
    let item = item.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO items (shop_id, name, price, stock_count, image_url,
                                    description, specs, variants)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    item.shop_id,
                    item.name,
                    item.price,
                    item.stock_count,
                    item.image_url,
                    item.description,
                    item.specs_json,
                    item.variants_json,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}
