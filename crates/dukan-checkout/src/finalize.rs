// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order finalization: one call persists exactly one order row.
//!
//! Idempotency is the caller's responsibility: once a finalize transition
//! fires, the session must be cleared or moved to a state where the same
//! button cannot re-trigger it. The per-shopper session lock makes the
//! whole decide-finalize-move cycle atomic against a double-tap.

use dukan_core::DukanError;
use dukan_core::types::{Address, LineItem, OrderStatus, PaymentChoice, PaymentStatus, ShopperId};
use dukan_session::CheckoutContext;
use dukan_storage::{Database, NewOrder, queries::orders};

/// Human summary plus total unit count for a cart.
pub fn summarize(cart: &[LineItem]) -> (String, u32) {
    let mut summary = cart
        .iter()
        .map(|line| format!("{} (x{})", line.name, line.qty))
        .collect::<Vec<_>>()
        .join(", ");
    if summary.len() > 500 {
        summary.truncate(500);
    }
    let quantity = cart.iter().map(|line| line.qty).sum();
    (summary, quantity)
}

/// Persist one order for the accumulated checkout context.
///
/// The address must already be resolved by the caller: a missing or foreign
/// address re-enters address collection at the state-machine layer instead
/// of reaching this function.
pub async fn create_order(
    db: &Database,
    shopper: &ShopperId,
    checkout: &CheckoutContext,
    choice: PaymentChoice,
    address: &Address,
) -> Result<i64, DukanError> {
    let (item_summary, quantity) = summarize(&checkout.cart);

    let order = NewOrder {
        shopper_id: shopper.0.clone(),
        shop_id: checkout.shop_id,
        items: checkout.cart.clone(),
        item_summary,
        quantity,
        total_amount: checkout.display_total(),
        payment_choice: choice,
        delivery_address: address.display_line(),
        delivery_pincode: address.pincode.clone(),
        delivery_city: address.city.clone(),
        delivery_state: address.state.clone(),
        order_status: OrderStatus::Placed,
        payment_status: PaymentStatus::Pending,
    };

    orders::insert_order(db, &order).await
}
