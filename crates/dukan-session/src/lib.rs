// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state for the Dukan commerce bot.
//!
//! Holds the in-memory per-shopper conversation state (with per-key
//! serialization for safe concurrent mutation), the typed session state
//! variants, and the single-use checkout token issuer for web hand-offs.

pub mod state;
pub mod store;
pub mod token;

pub use state::{CheckoutContext, Session, SessionState, UpsellOffer};
pub use store::SessionStore;
pub use token::TokenIssuer;
