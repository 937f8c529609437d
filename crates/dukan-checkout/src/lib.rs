// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkout orchestration for the Dukan commerce bot.
//!
//! Converts classified inbound events into state transitions, order
//! creation, and payment routing: the event classifier, the checkout state
//! machine, the order finalizer, the payment path router, the webhook
//! reconciler, and the post-purchase upsell flow.

pub mod classify;
pub mod engine;
pub mod finalize;
pub mod messages;
pub mod reconcile;
pub mod route;
pub mod upsell;

pub use classify::{Intent, classify, parse_envelope};
pub use engine::{CheckoutEngine, EngineConfig};
pub use reconcile::{Correlation, PaymentEvent, Reconciler, verify_signature};
pub use route::PaymentRoute;
