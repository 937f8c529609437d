// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Dukan commerce bot.
//!
//! Four surfaces share one axum router: the messaging provider's webhook
//! (inbound events + verification challenge), the payment provider's
//! confirmation webhook (HMAC-signed), the checkout hand-off REST consumed
//! by the web address-capture page, and the admin approval endpoint.

pub mod admin;
pub mod checkout;
pub mod handlers;
pub mod payment;
pub mod server;

pub use server::{GatewayConfig, GatewayState, router, start_server};
