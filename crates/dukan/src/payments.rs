// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hosted payment link creation against the gateway provider's API.
//!
//! Each call authenticates with the merchant's own (just-unsealed)
//! credentials, so one process serves many merchants.

use async_trait::async_trait;
use dukan_core::{
    DukanError, GatewayCredentials, PaymentGateway, PaymentLink, PaymentLinkRequest,
};

const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

/// Payment-link client for a Razorpay-style gateway.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    api_base: String,
}

impl HttpPaymentGateway {
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }
}

impl Default for HttpPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn build_link_body(req: &PaymentLinkRequest) -> serde_json::Value {
    serde_json::json!({
        "amount": req.amount_minor,
        "currency": req.currency,
        "description": req.description,
        "customer": { "contact": req.customer_phone },
        "notify": { "sms": true, "email": false },
        "notes": { "order_id": req.reference },
    })
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment_link(
        &self,
        creds: &GatewayCredentials,
        req: &PaymentLinkRequest,
    ) -> Result<PaymentLink, DukanError> {
        let url = format!("{}/payment_links", self.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .basic_auth(&creds.key_id, Some(&creds.key_secret))
            .json(&build_link_body(req))
            .send()
            .await
            .map_err(|e| DukanError::Provider {
                message: format!("payment link request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DukanError::Provider {
                message: format!("gateway rejected link creation ({status}): {body}"),
                source: None,
            });
        }

        let json: serde_json::Value =
            response.json().await.map_err(|e| DukanError::Provider {
                message: format!("gateway response unparseable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let id = json.get("id").and_then(|v| v.as_str());
        let short_url = json.get("short_url").and_then(|v| v.as_str());
        match (id, short_url) {
            (Some(id), Some(short_url)) => Ok(PaymentLink {
                id: id.to_string(),
                short_url: short_url.to_string(),
            }),
            _ => Err(DukanError::Provider {
                message: "gateway response missing id/short_url".to_string(),
                source: None,
            }),
        }
    }
}
