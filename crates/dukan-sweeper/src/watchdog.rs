// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery watchdog.
//!
//! No push channel exists for shipment status, so orders in `shipped`
//! status with an automated provider reference are polled on an interval.
//! On delivery the order is closed out, a review prompt goes to the
//! shopper, and a fresh review-rating session is seeded. One order's
//! polling failure never aborts the batch.

use std::sync::Arc;

use dukan_checkout::messages;
use dukan_core::{MessageSender, ShipmentStatus, ShipmentTracker, types::ShopperId};
use dukan_session::{Session, SessionState, SessionStore};
use dukan_storage::{Database, queries::orders};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Periodic shipment-status poller.
pub struct DeliveryWatchdog {
    db: Arc<Database>,
    tracker: Arc<dyn ShipmentTracker>,
    sender: Arc<dyn MessageSender>,
    store: Arc<SessionStore>,
    interval: std::time::Duration,
}

impl DeliveryWatchdog {
    pub fn new(
        db: Arc<Database>,
        tracker: Arc<dyn ShipmentTracker>,
        sender: Arc<dyn MessageSender>,
        store: Arc<SessionStore>,
        interval: std::time::Duration,
    ) -> Self {
        Self {
            db,
            tracker,
            sender,
            store,
            interval,
        }
    }

    /// Run until cancelled. Overrunning ticks are skipped, never overlapped.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = self.interval.as_secs(), "delivery watchdog started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("delivery watchdog stopped");
                    break;
                }
                _ = interval.tick() => {
                    let delivered = self.tick().await;
                    if delivered > 0 {
                        info!(delivered, "orders marked delivered");
                    }
                }
            }
        }
    }

    /// One polling pass. Returns the number of orders marked delivered.
    pub async fn tick(&self) -> usize {
        let shipped = match orders::list_shipped(&self.db).await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "could not list shipped orders");
                return 0;
            }
        };

        let mut delivered = 0;
        for order in shipped {
            let Some(shipment_ref) = order.shipment_ref.as_deref() else {
                continue;
            };
            match self.tracker.track(shipment_ref).await {
                Ok(ShipmentStatus::Delivered) => {
                    if let Err(e) = orders::mark_delivered(&self.db, order.id).await {
                        warn!(order_id = order.id, error = %e, "delivered update failed");
                        continue;
                    }
                    self.request_review(&order).await;
                    delivered += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    // Skip and continue; this order is retried next tick.
                    warn!(
                        order_id = order.id,
                        shipment_ref,
                        error = %e,
                        "shipment status poll failed"
                    );
                }
            }
        }
        delivered
    }

    /// Seed a review-rating session and prompt the shopper.
    async fn request_review(&self, order: &dukan_core::types::Order) {
        let shopper = ShopperId(order.shopper_id.clone());
        {
            let _guard = self.store.lock(&shopper).await;
            self.store.set(
                &shopper,
                Session::with_state(SessionState::AwaitingReviewRating {
                    order_id: order.id,
                    shop_id: order.shop_id,
                }),
            );
        }
        if let Err(e) = self.sender.send(&shopper, messages::review_prompt()).await {
            warn!(order_id = order.id, error = %e, "review prompt send failed");
        }
    }
}
