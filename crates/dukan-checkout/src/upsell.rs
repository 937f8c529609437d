// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-purchase upsell: a time-delayed secondary offer appended to an
//! existing order if accepted.
//!
//! Triggered only after a successful COD confirmation. The secondary order
//! inherits the delivery address from the linked order and is always COD.

use dukan_core::types::{
    LineItem, OrderStatus, PaymentChoice, PaymentStatus, ShopperId,
};
use dukan_core::{DukanError, MessageSender};
use dukan_session::{Session, SessionState, SessionStore, UpsellOffer};
use dukan_storage::{Database, NewOrder, queries::items, queries::orders, queries::shops};
use tracing::{debug, warn};

use crate::messages;

/// Replies accepted as "yes, add it".
pub fn is_affirmative(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "yes" | "add" | "ok" | "y" | "1"
    )
}

/// If the shop has an upsell configured, pitch it and move the session to
/// the decision state. A no-op for shops without one.
pub async fn maybe_trigger(
    db: &Database,
    store: &SessionStore,
    sender: &dyn MessageSender,
    shopper: &ShopperId,
    shop_id: i64,
    linked_order_id: i64,
) -> Result<(), DukanError> {
    let Some(settings) = shops::get_upsell_settings(db, shop_id).await? else {
        return Ok(());
    };
    if !settings.enabled {
        return Ok(());
    }
    let Some(item_id) = settings.item_id else {
        return Ok(());
    };
    let Some(item) = items::get_item(db, item_id).await? else {
        debug!(shop_id, item_id, "configured upsell item no longer exists");
        return Ok(());
    };

    let discount = settings.discount_pct.clamp(0, 100) as f64;
    let offer_price = (item.price * (100.0 - discount) / 100.0).round();

    store.set(
        shopper,
        Session::with_state(SessionState::AwaitingUpsellDecision {
            shop_id,
            linked_order_id,
            offer: UpsellOffer {
                item_id,
                name: item.name.clone(),
                price: offer_price,
            },
        }),
    );

    if let Err(e) = sender
        .send(shopper, messages::upsell_pitch(&item.name, item.price, offer_price))
        .await
    {
        warn!(shopper = %shopper, error = %e, "upsell pitch send failed");
    }
    Ok(())
}

/// Handle the shopper's reply to a pending upsell offer. Affirmative
/// creates a secondary COD order inheriting the linked order's address;
/// anything else is a polite no-op. The session clears either way.
#[allow(clippy::too_many_arguments)]
pub async fn handle_decision(
    db: &Database,
    store: &SessionStore,
    sender: &dyn MessageSender,
    shopper: &ShopperId,
    shop_id: i64,
    linked_order_id: i64,
    offer: &UpsellOffer,
    text: &str,
) -> Result<(), DukanError> {
    if is_affirmative(text) {
        let previous = orders::get_order(db, linked_order_id).await?;
        let (address, pincode, city, state) = match &previous {
            Some(order) => (
                order.delivery_address.clone(),
                order.delivery_pincode.clone(),
                order.delivery_city.clone(),
                order.delivery_state.clone(),
            ),
            None => Default::default(),
        };

        let order_id = orders::insert_order(
            db,
            &NewOrder {
                shopper_id: shopper.0.clone(),
                shop_id,
                items: vec![LineItem {
                    item_id: offer.item_id,
                    name: offer.name.clone(),
                    qty: 1,
                    unit_price: offer.price,
                }],
                item_summary: offer.name.clone(),
                quantity: 1,
                total_amount: offer.price,
                payment_choice: PaymentChoice::Cod,
                delivery_address: address,
                delivery_pincode: pincode,
                delivery_city: city,
                delivery_state: state,
                order_status: OrderStatus::Placed,
                payment_status: PaymentStatus::Pending,
            },
        )
        .await?;

        if let Err(e) = sender
            .send(shopper, messages::upsell_added(&offer.name, offer.price))
            .await
        {
            warn!(shopper = %shopper, error = %e, "upsell confirmation send failed");
        }

        if let Some(config) = shops::get_payment_config(db, shop_id).await?
            && let Some(seller) = config.seller_phone
        {
            let seller = ShopperId(seller);
            if let Err(e) = sender
                .send(&seller, messages::seller_upsell_converted(order_id))
                .await
            {
                warn!(error = %e, "seller upsell notification failed");
            }
        }
    } else if let Err(e) = sender.send(shopper, messages::upsell_declined()).await {
        warn!(shopper = %shopper, error = %e, "upsell decline send failed");
    }

    store.clear(shopper);
    Ok(())
}
