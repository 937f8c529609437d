// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dukan conversational-commerce bot.
//!
//! This crate provides the foundational error type, domain types, channel
//! event shapes, and the adapter traits that seam the orchestrator off from
//! the messaging, payment, and shipping providers.

pub mod error;
pub mod event;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DukanError;
pub use event::{Button, EventKind, InboundEvent, OutboundMessage};
pub use traits::{
    GatewayCredentials, MessageSender, PaymentGateway, PaymentLink, PaymentLinkRequest,
    ShipmentStatus, ShipmentTracker,
};
pub use types::{
    Address, Item, LineItem, Order, OrderStatus, PaymentChoice, PaymentMethodSetting,
    PaymentStatus, PlanTier, ShopPaymentConfig, ShopperId,
};
