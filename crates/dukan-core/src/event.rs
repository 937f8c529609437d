// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound and outbound message shapes at the channel boundary.
//!
//! The upstream channel has fire-and-forget delivery semantics: inbound
//! events are always acknowledged regardless of internal outcome, and no
//! delivery confirmation is assumed for outbound sends.

use serde::{Deserialize, Serialize};

use crate::types::ShopperId;

/// What kind of content an inbound event carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Free-form text reply.
    Text(String),
    /// A tap on an interactive button.
    ButtonReply { id: String, title: String },
    /// A structured form submission (provider "flow" reply).
    FormReply(serde_json::Value),
    /// An uploaded image, referenced by the provider's opaque media id.
    Image { media_id: String },
}

/// A normalized inbound event from the messaging channel.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub sender: ShopperId,
    pub kind: EventKind,
}

/// An interactive button choice (id + title pair). Titles are clamped to
/// the provider's 20-character limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub title: String,
}

impl Button {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let mut title = title.into();
        if title.chars().count() > 20 {
            title = title.chars().take(20).collect();
        }
        Self {
            id: id.into(),
            title,
        }
    }
}

/// An outbound message to the shopper or seller.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// Plain text.
    Text(String),
    /// Text body with up to 3 interactive buttons.
    Buttons {
        body: String,
        buttons: Vec<Button>,
    },
    /// Image by URL with an optional caption.
    Image {
        url: String,
        caption: Option<String>,
    },
}

impl OutboundMessage {
    pub fn text(body: impl Into<String>) -> Self {
        OutboundMessage::Text(body.into())
    }

    pub fn buttons(body: impl Into<String>, buttons: Vec<Button>) -> Self {
        debug_assert!(buttons.len() <= 3, "channel supports at most 3 buttons");
        OutboundMessage::Buttons {
            body: body.into(),
            buttons,
        }
    }
}
