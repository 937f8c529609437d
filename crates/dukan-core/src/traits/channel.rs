// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging seam.

use async_trait::async_trait;

use crate::error::DukanError;
use crate::event::OutboundMessage;
use crate::types::ShopperId;

/// Sends messages to shoppers and sellers over the chat channel.
///
/// Delivery is fire-and-forget: the channel offers no confirmation, so
/// callers treat a send error as loggable, never as a transition failure.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, to: &ShopperId, msg: OutboundMessage) -> Result<(), DukanError>;
}
