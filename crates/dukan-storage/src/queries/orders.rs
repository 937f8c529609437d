// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order CRUD and status transitions.
//!
//! Order rows are never deleted (financial record). The payment transitions
//! here are single conditional UPDATEs so a duplicate webhook and the status
//! check cannot race: zero changed rows means another writer already won.

use std::str::FromStr;

use dukan_core::DukanError;
use dukan_core::types::{Order, OrderStatus, PaymentChoice, PaymentStatus};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::NewOrder;

fn choice_to_str(choice: PaymentChoice) -> &'static str {
    match choice {
        PaymentChoice::Cod => "cod",
        PaymentChoice::Online => "online",
    }
}

fn choice_from_str(s: &str) -> PaymentChoice {
    if s == "online" {
        PaymentChoice::Online
    } else {
        PaymentChoice::Cod
    }
}

const ORDER_COLUMNS: &str = "id, shopper_id, shop_id, items, item_summary, quantity, \
     total_amount, payment_choice, delivery_address, delivery_pincode, delivery_city, \
     delivery_state, order_status, payment_status, provider_payment_id, payment_proof_ref, \
     shipment_ref, review_requested, created_at";

fn order_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    let items_json: String = row.get(3)?;
    let choice: String = row.get(7)?;
    let order_status: String = row.get(12)?;
    let payment_status: String = row.get(13)?;
    Ok(Order {
        id: row.get(0)?,
        shopper_id: row.get(1)?,
        shop_id: row.get(2)?,
        items: serde_json::from_str(&items_json).unwrap_or_default(),
        item_summary: row.get(4)?,
        quantity: row.get::<_, i64>(5)? as u32,
        total_amount: row.get(6)?,
        payment_choice: choice_from_str(&choice),
        delivery_address: row.get(8)?,
        delivery_pincode: row.get(9)?,
        delivery_city: row.get(10)?,
        delivery_state: row.get(11)?,
        order_status: OrderStatus::from_str(&order_status).unwrap_or(OrderStatus::Placed),
        payment_status: PaymentStatus::from_str(&payment_status)
            .unwrap_or(PaymentStatus::Pending),
        provider_payment_id: row.get(14)?,
        payment_proof_ref: row.get(15)?,
        shipment_ref: row.get(16)?,
        review_requested: row.get::<_, i64>(17)? != 0,
        created_at: row.get(18)?,
    })
}

/// Insert one order row and return its id.
pub async fn insert_order(db: &Database, order: &NewOrder) -> Result<i64, DukanError> {
    let order = order.clone();
    let items_json = serde_json::to_string(&order.items)
        .map_err(|e| DukanError::Internal(format!("serialize line items: {e}")))?;
    let created_at = chrono::Utc::now().to_rfc3339();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO orders (
                     shopper_id, shop_id, items, item_summary, quantity, total_amount,
                     payment_choice, delivery_address, delivery_pincode, delivery_city,
                     delivery_state, order_status, payment_status, created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    order.shopper_id,
                    order.shop_id,
                    items_json,
                    order.item_summary,
                    i64::from(order.quantity),
                    order.total_amount,
                    choice_to_str(order.payment_choice),
                    order.delivery_address,
                    order.delivery_pincode,
                    order.delivery_city,
                    order.delivery_state,
                    order.order_status.to_string(),
                    order.payment_status.to_string(),
                    created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an order by id.
pub async fn get_order(db: &Database, id: i64) -> Result<Option<Order>, DukanError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], order_from_row);
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Idempotency guard for payment confirmation: transitions the order to
/// `paid`/`processing` only if it is not already paid.
///
/// Returns `true` if this call performed the transition, `false` if another
/// writer (a duplicate webhook, an earlier admin approval) already did.
pub async fn mark_order_paid(
    db: &Database,
    id: i64,
    provider_payment_id: Option<String>,
) -> Result<bool, DukanError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE orders SET payment_status = 'paid', order_status = 'processing',
                     provider_payment_id = COALESCE(?2, provider_payment_id)
                 WHERE id = ?1 AND payment_status <> 'paid'",
                params![id, provider_payment_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Reject a payment: `failed` + `cancelled`, unless the order is already paid.
pub async fn reject_payment(db: &Database, id: i64) -> Result<bool, DukanError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE orders SET payment_status = 'failed', order_status = 'cancelled'
                 WHERE id = ?1 AND payment_status <> 'paid'",
                params![id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Record a manual payment proof and move the order to `needs_approval`.
///
/// Only applies while the payment is still pending, so a retried upload
/// cannot clobber a decision already made.
pub async fn mark_needs_approval(
    db: &Database,
    id: i64,
    proof_ref: String,
) -> Result<bool, DukanError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE orders SET payment_status = 'needs_approval', payment_proof_ref = ?2
                 WHERE id = ?1 AND payment_status = 'pending'",
                params![id, proof_ref],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Mark an order shipped with an automated-provider shipment reference.
pub async fn mark_shipped(db: &Database, id: i64, shipment_ref: String) -> Result<(), DukanError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET order_status = 'shipped', shipment_ref = ?2 WHERE id = ?1",
                params![id, shipment_ref],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Mark an order delivered and flag it for a review request.
pub async fn mark_delivered(db: &Database, id: i64) -> Result<(), DukanError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET order_status = 'delivered', review_requested = 1
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Orders in transit with an automated shipping provider, for the watchdog.
pub async fn list_shipped(db: &Database) -> Result<Vec<Order>, DukanError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders
                 WHERE order_status = 'shipped' AND shipment_ref IS NOT NULL
                 ORDER BY id"
            ))?;
            let rows = stmt.query_map([], order_from_row)?;
            let mut orders = Vec::new();
            for row in rows {
                orders.push(row?);
            }
            Ok(orders)
        })
        .await
        .map_err(map_tr_err)
}
