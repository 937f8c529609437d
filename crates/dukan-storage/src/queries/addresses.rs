// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Address rows. Immutable once created: corrections insert a new row and
//! "current address" is the most recently created one for a shopper.

use dukan_core::DukanError;
use dukan_core::types::Address;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::NewAddress;

fn address_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get(0)?,
        shopper_id: row.get(1)?,
        house_no: row.get(2)?,
        area: row.get(3)?,
        city: row.get(4)?,
        state: row.get(5)?,
        pincode: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const ADDRESS_COLUMNS: &str =
    "id, shopper_id, house_no, area, city, state, pincode, created_at";

/// Insert a new address row and return its id.
pub async fn insert_address(db: &Database, addr: &NewAddress) -> Result<i64, DukanError> {
    let addr = addr.clone();
    let created_at = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO addresses (shopper_id, house_no, area, city, state, pincode, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    addr.shopper_id,
                    addr.house_no,
                    addr.area,
                    addr.city,
                    addr.state,
                    addr.pincode,
                    created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an address by id.
pub async fn get_address(db: &Database, id: i64) -> Result<Option<Address>, DukanError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = ?1"))?;
            match stmt.query_row(params![id], address_from_row) {
                Ok(addr) => Ok(Some(addr)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// The shopper's current address: the most recently created row.
pub async fn latest_for_shopper(
    db: &Database,
    shopper_id: &str,
) -> Result<Option<Address>, DukanError> {
    let shopper_id = shopper_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ADDRESS_COLUMNS} FROM addresses
                 WHERE shopper_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT 1"
            ))?;
            match stmt.query_row(params![shopper_id], address_from_row) {
                Ok(addr) => Ok(Some(addr)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}
