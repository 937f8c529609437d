// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A `PaymentGateway` stub that succeeds or fails on demand.

use async_trait::async_trait;
use dukan_core::{
    DukanError, GatewayCredentials, PaymentGateway, PaymentLink, PaymentLinkRequest,
};
use tokio::sync::Mutex;

/// Returns a canned payment link, or an error when `failing` is set.
pub struct StubGateway {
    failing: bool,
    requests: Mutex<Vec<PaymentLinkRequest>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            failing: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A gateway whose link creation always fails (network/auth error).
    pub fn failing() -> Self {
        Self {
            failing: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Link-creation requests seen so far.
    pub async fn requests(&self) -> Vec<PaymentLinkRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_payment_link(
        &self,
        _creds: &GatewayCredentials,
        req: &PaymentLinkRequest,
    ) -> Result<PaymentLink, DukanError> {
        if self.failing {
            return Err(DukanError::Provider {
                message: "simulated gateway outage".to_string(),
                source: None,
            });
        }
        self.requests.lock().await.push(req.clone());
        Ok(PaymentLink {
            id: format!("plink_{}", req.reference),
            short_url: format!("https://pay.example/l/{}", req.reference),
        })
    }
}
