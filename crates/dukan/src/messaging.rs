// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message delivery to the chat provider's graph API.

use async_trait::async_trait;
use dukan_config::model::MessagingConfig;
use dukan_core::{DukanError, MessageSender, OutboundMessage, types::ShopperId};
use tracing::debug;

/// Sends messages through the provider's HTTP API.
pub struct HttpMessageSender {
    client: reqwest::Client,
    config: MessagingConfig,
}

impl HttpMessageSender {
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

/// Build the provider wire payload for one outbound message.
fn build_payload(to: &ShopperId, msg: &OutboundMessage) -> serde_json::Value {
    match msg {
        OutboundMessage::Text(body) => serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to.as_str(),
            "type": "text",
            "text": { "body": body },
        }),
        OutboundMessage::Buttons { body, buttons } => {
            let button_payloads: Vec<serde_json::Value> = buttons
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "type": "reply",
                        "reply": { "id": b.id, "title": b.title },
                    })
                })
                .collect();
            serde_json::json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": to.as_str(),
                "type": "interactive",
                "interactive": {
                    "type": "button",
                    "body": { "text": body },
                    "action": { "buttons": button_payloads },
                },
            })
        }
        OutboundMessage::Image { url, caption } => {
            let mut image = serde_json::json!({ "link": url });
            if let Some(caption) = caption {
                image["caption"] = serde_json::Value::String(caption.clone());
            }
            serde_json::json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": to.as_str(),
                "type": "image",
                "image": image,
            })
        }
    }
}

#[async_trait]
impl MessageSender for HttpMessageSender {
    async fn send(&self, to: &ShopperId, msg: OutboundMessage) -> Result<(), DukanError> {
        if self.config.access_token.is_empty() || self.config.sender_id.is_empty() {
            return Err(DukanError::Channel {
                message: "messaging credentials not configured".to_string(),
                source: None,
            });
        }

        let url = format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.sender_id
        );
        let payload = build_payload(to, &msg);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DukanError::Channel {
                message: format!("message send failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(DukanError::Channel {
                message: format!("provider rejected message ({status}): {body}"),
                source: None,
            });
        }

        debug!(to = %to, "message delivered to provider");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukan_core::event::Button;

    fn shopper() -> ShopperId {
        ShopperId("919876543210".into())
    }

    #[test]
    fn text_payload_shape() {
        let payload = build_payload(&shopper(), &OutboundMessage::text("hello"));
        assert_eq!(payload["type"], "text");
        assert_eq!(payload["text"]["body"], "hello");
        assert_eq!(payload["to"], "919876543210");
    }

    #[test]
    fn buttons_payload_shape() {
        let msg = OutboundMessage::buttons(
            "Pick one:",
            vec![
                Button::new("pay_online", "Pay Online"),
                Button::new("pay_cod", "Cash on Delivery"),
            ],
        );
        let payload = build_payload(&shopper(), &msg);
        assert_eq!(payload["type"], "interactive");
        assert_eq!(payload["interactive"]["type"], "button");
        let buttons = payload["interactive"]["action"]["buttons"].as_array().unwrap();
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0]["reply"]["id"], "pay_online");
    }

    #[test]
    fn image_payload_includes_optional_caption() {
        let msg = OutboundMessage::Image {
            url: "https://cdn.example/mug.jpg".into(),
            caption: Some("A mug".into()),
        };
        let payload = build_payload(&shopper(), &msg);
        assert_eq!(payload["type"], "image");
        assert_eq!(payload["image"]["caption"], "A mug");

        let bare = OutboundMessage::Image {
            url: "https://cdn.example/mug.jpg".into(),
            caption: None,
        };
        let payload = build_payload(&shopper(), &bare);
        assert!(payload["image"].get("caption").is_none());
    }

    #[tokio::test]
    async fn unconfigured_sender_fails_fast() {
        let sender = HttpMessageSender::new(MessagingConfig {
            api_base: "https://graph.example".into(),
            access_token: String::new(),
            sender_id: String::new(),
        });
        let result = sender.send(&shopper(), OutboundMessage::text("hi")).await;
        assert!(matches!(result, Err(DukanError::Channel { .. })));
    }
}
