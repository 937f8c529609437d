// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous payment confirmation, idempotent against provider retries.
//!
//! The signature check runs before any parsing side effects; an unknown
//! order or a duplicate delivery acknowledges silently (providers retry on
//! failure responses, so surfacing an error would only cause retry storms).
//! The paid transition itself is a conditional UPDATE in storage -- see
//! `dukan_storage::queries::orders::mark_order_paid`.

use std::sync::Arc;

use dukan_core::{DukanError, MessageSender, types::ShopperId};
use dukan_session::{SessionState, SessionStore};
use dukan_storage::{Database, queries::items, queries::orders};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::messages;

type HmacSha256 = Hmac<Sha256>;

/// Verify the provider's HMAC-SHA256 signature over the raw request body.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    signature_hex: &str,
) -> Result<(), DukanError> {
    let signature = hex::decode(signature_hex.trim())
        .map_err(|_| DukanError::Signature("signature is not valid hex".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| DukanError::Signature("webhook secret unusable".to_string()))?;
    mac.update(body);
    mac.verify_slice(&signature)
        .map_err(|_| DukanError::Signature("payment webhook signature mismatch".to_string()))
}

/// A parsed payment-confirmation event.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    /// Provider event type; only `payment.captured` is acted on.
    pub event: String,
    /// Provider-assigned payment id.
    pub payment_id: String,
    pub correlation: Correlation,
}

/// Merchant/order correlation payload echoed back by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Correlation {
    pub order_id: i64,
    pub shop_id: i64,
}

/// Consumes payment confirmations and manual admin decisions.
pub struct Reconciler {
    db: Arc<Database>,
    store: Arc<SessionStore>,
    sender: Arc<dyn MessageSender>,
}

impl Reconciler {
    pub fn new(
        db: Arc<Database>,
        store: Arc<SessionStore>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self { db, store, sender }
    }

    /// Process one (already signature-verified) payment event.
    ///
    /// Unknown orders, irrelevant event types, and duplicate deliveries all
    /// return `Ok(())` with no side effects.
    pub async fn process(&self, event: PaymentEvent) -> Result<(), DukanError> {
        if event.event != "payment.captured" {
            debug!(event = %event.event, "ignoring irrelevant payment event type");
            return Ok(());
        }

        let order_id = event.correlation.order_id;
        let Some(order) = orders::get_order(&self.db, order_id).await? else {
            debug!(order_id, "payment event for unknown order, acknowledged");
            return Ok(());
        };

        let changed =
            orders::mark_order_paid(&self.db, order_id, Some(event.payment_id.clone())).await?;
        if !changed {
            debug!(order_id, "duplicate payment confirmation, no-op");
            return Ok(());
        }

        info!(
            order_id,
            payment_id = %event.payment_id,
            "payment confirmed, order moved to processing"
        );

        self.settle(&order).await;
        Ok(())
    }

    /// Manual merchant approval of a `needs_approval` order.
    ///
    /// Returns `false` if the order does not exist.
    pub async fn approve(&self, order_id: i64) -> Result<bool, DukanError> {
        let Some(order) = orders::get_order(&self.db, order_id).await? else {
            return Ok(false);
        };
        let changed = orders::mark_order_paid(&self.db, order_id, None).await?;
        if changed {
            info!(order_id, "payment manually approved");
            self.settle(&order).await;
        }
        Ok(true)
    }

    /// Manual merchant rejection: `failed` + `cancelled`, then notify.
    ///
    /// Returns `false` if the order does not exist.
    pub async fn reject(&self, order_id: i64) -> Result<bool, DukanError> {
        let Some(order) = orders::get_order(&self.db, order_id).await? else {
            return Ok(false);
        };
        let changed = orders::reject_payment(&self.db, order_id).await?;
        if changed {
            info!(order_id, "payment manually rejected");
            let shopper = ShopperId(order.shopper_id.clone());
            self.notify(&shopper, messages::payment_rejected(order_id)).await;
        }
        Ok(true)
    }

    /// Post-confirmation effects shared by webhook and manual approval:
    /// stock decrement, session cleanup, shopper notification. None of these
    /// may fail the reconciliation.
    async fn settle(&self, order: &dukan_core::types::Order) {
        for line in &order.items {
            if let Err(e) = items::decrement_stock(&self.db, line.item_id, line.qty).await {
                warn!(
                    order_id = order.id,
                    item_id = line.item_id,
                    error = %e,
                    "stock decrement failed"
                );
            }
        }

        let shopper = ShopperId(order.shopper_id.clone());
        {
            // Release the session only if it is still waiting on THIS order's
            // gateway confirmation; the shopper may have started a new
            // checkout in the meantime.
            let _guard = self.store.lock(&shopper).await;
            let current = self.store.get(&shopper);
            match current.state {
                SessionState::AwaitingGatewayConfirm { order_id, .. }
                | SessionState::AwaitingScreenshot { order_id, .. }
                    if order_id == order.id =>
                {
                    self.store.clear(&shopper);
                }
                _ => {}
            }
        }

        self.notify(&shopper, messages::payment_approved(order.id)).await;
    }

    async fn notify(&self, to: &ShopperId, msg: dukan_core::OutboundMessage) {
        if let Err(e) = self.sender.send(to, msg).await {
            warn!(to = %to, error = %e, "reconciliation notification failed");
        }
    }
}
