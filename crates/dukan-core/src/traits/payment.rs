// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hosted payment gateway seam.

use async_trait::async_trait;

use crate::error::DukanError;

/// Decrypted gateway API credentials. Held only transiently while creating
/// a payment link; Debug output is redacted.
#[derive(Clone)]
pub struct GatewayCredentials {
    pub key_id: String,
    pub key_secret: String,
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[redacted]")
            .finish()
    }
}

/// Request to create a hosted payment link for one order.
#[derive(Debug, Clone)]
pub struct PaymentLinkRequest {
    /// Amount in minor units (paise).
    pub amount_minor: i64,
    pub currency: String,
    pub description: String,
    pub customer_phone: String,
    /// Order id, echoed back in the confirmation webhook correlation.
    pub reference: String,
}

/// A created hosted payment link.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLink {
    pub id: String,
    pub short_url: String,
}

/// Creates hosted checkout links with a merchant's own credentials.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_link(
        &self,
        creds: &GatewayCredentials,
        req: &PaymentLinkRequest,
    ) -> Result<PaymentLink, DukanError>;
}
