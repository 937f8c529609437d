// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A `MessageSender` that records every send for later assertions.

use async_trait::async_trait;
use dukan_core::{DukanError, MessageSender, OutboundMessage, types::ShopperId};
use tokio::sync::Mutex;

/// Records outbound messages instead of delivering them.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(ShopperId, OutboundMessage)>>,
    /// When true, every send fails -- for testing notify-failure tolerance.
    pub fail_sends: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        }
    }

    /// All recorded sends, in order.
    pub async fn sent(&self) -> Vec<(ShopperId, OutboundMessage)> {
        self.sent.lock().await.clone()
    }

    /// Sends addressed to one recipient, in order.
    pub async fn sent_to(&self, shopper: &ShopperId) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == shopper)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    /// Number of recorded sends.
    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Flattened text of every send (body/caption text), for contains-checks.
    pub async fn all_text(&self) -> String {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(_, msg)| match msg {
                OutboundMessage::Text(body) => body.clone(),
                OutboundMessage::Buttons { body, .. } => body.clone(),
                OutboundMessage::Image { caption, .. } => {
                    caption.clone().unwrap_or_default()
                }
            })
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, to: &ShopperId, msg: OutboundMessage) -> Result<(), DukanError> {
        if self.fail_sends {
            return Err(DukanError::Channel {
                message: "simulated send failure".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push((to.clone(), msg));
        Ok(())
    }
}
