// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the seams to external providers.

pub mod channel;
pub mod payment;
pub mod shipping;

pub use channel::MessageSender;
pub use payment::{GatewayCredentials, PaymentGateway, PaymentLink, PaymentLinkRequest};
pub use shipping::{ShipmentStatus, ShipmentTracker};
