// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed per-state session data.
//!
//! Each variant carries only the fields that state needs, so illegal
//! combinations (a screenshot wait without an order id, an idle session
//! with a cart) are unrepresentable.

use chrono::{DateTime, Utc};
use dukan_core::types::{Item, LineItem, cart_total};

/// Accumulated checkout context once a cart exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutContext {
    pub shop_id: i64,
    pub cart: Vec<LineItem>,
    /// Amount due. May be below the cart sum when a coupon applied.
    pub total: f64,
    /// Address chosen or captured so far.
    pub address_id: Option<i64>,
}

impl CheckoutContext {
    /// Display total, recomputed from line items when not cached.
    pub fn display_total(&self) -> f64 {
        if self.total > 0.0 {
            self.total
        } else {
            cart_total(&self.cart)
        }
    }
}

/// A discounted post-purchase offer.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsellOffer {
    pub item_id: i64,
    pub name: String,
    pub price: f64,
}

/// Where a shopper is in the purchase funnel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// No purchase in progress.
    #[default]
    Idle,
    /// Multi-step variant drilldown: one attribute asked per step.
    AwaitingSelection {
        item: Item,
        step_index: usize,
        chosen: Vec<(String, String)>,
    },
    /// Waiting for a numeric quantity reply.
    AwaitingQty {
        item: Item,
        unit_price: f64,
        variant_title: Option<String>,
    },
    /// Waiting for the shopper to confirm or change a delivery address.
    AwaitingAddress { checkout: CheckoutContext },
    /// Manual free-text address capture (no structured hand-off available).
    AwaitingManualAddress { checkout: CheckoutContext },
    /// Waiting for the COD/online button.
    AwaitingPaymentMethod { checkout: CheckoutContext },
    /// A hosted gateway link is outstanding; confirmation arrives by webhook.
    AwaitingGatewayConfirm { order_id: i64, shop_id: i64 },
    /// Manual-proof path: waiting for a payment screenshot.
    AwaitingScreenshot { order_id: i64, shop_id: i64 },
    /// Post-purchase upsell offer pending a yes/no reply.
    AwaitingUpsellDecision {
        shop_id: i64,
        linked_order_id: i64,
        offer: UpsellOffer,
    },
    /// Delivery watchdog seeded this; waiting for a 1-5 rating.
    AwaitingReviewRating { order_id: i64, shop_id: i64 },
}

impl SessionState {
    /// States the cart recovery sweeper considers a stalled checkout.
    pub fn is_checkout_in_progress(&self) -> bool {
        matches!(
            self,
            SessionState::AwaitingQty { .. }
                | SessionState::AwaitingAddress { .. }
                | SessionState::AwaitingManualAddress { .. }
                | SessionState::AwaitingPaymentMethod { .. }
                | SessionState::AwaitingScreenshot { .. }
        )
    }

    /// Line items a recovery nudge can describe, if any.
    pub fn recovery_lines(&self) -> Option<Vec<LineItem>> {
        match self {
            SessionState::AwaitingQty {
                item, unit_price, ..
            } => Some(vec![LineItem {
                item_id: item.id,
                name: item.name.clone(),
                qty: 1,
                unit_price: *unit_price,
            }]),
            SessionState::AwaitingAddress { checkout }
            | SessionState::AwaitingManualAddress { checkout }
            | SessionState::AwaitingPaymentMethod { checkout } => {
                if checkout.cart.is_empty() {
                    None
                } else {
                    Some(checkout.cart.clone())
                }
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingSelection { .. } => "awaiting_selection",
            SessionState::AwaitingQty { .. } => "awaiting_qty",
            SessionState::AwaitingAddress { .. } => "awaiting_address",
            SessionState::AwaitingManualAddress { .. } => "awaiting_manual_address",
            SessionState::AwaitingPaymentMethod { .. } => "awaiting_payment_method",
            SessionState::AwaitingGatewayConfirm { .. } => "awaiting_gateway_confirm",
            SessionState::AwaitingScreenshot { .. } => "awaiting_screenshot",
            SessionState::AwaitingUpsellDecision { .. } => "awaiting_upsell_decision",
            SessionState::AwaitingReviewRating { .. } => "awaiting_review_rating",
        };
        write!(f, "{name}")
    }
}

/// Per-shopper conversation state with its activity timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: SessionState,
    /// Set once the recovery sweeper has nudged this abandonment.
    pub nudged: bool,
    pub last_updated: DateTime<Utc>,
}

impl Session {
    /// Fresh idle session stamped now.
    pub fn empty() -> Self {
        Self {
            state: SessionState::Idle,
            nudged: false,
            last_updated: Utc::now(),
        }
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            state,
            nudged: false,
            last_updated: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}
