// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment path selection, evaluated once per finalize call.
//!
//! Decision order: (1) COD confirms immediately; (2) online with a pro-tier
//! merchant, gateway selected, and decryptable credentials creates a hosted
//! payment link; (3) online with a manual payment address set moves to the
//! manual-proof path; (4) neither steers the shopper back to COD. Gateway
//! failures (network/auth, credential decryption) fall through to (3), never
//! leaving the shopper stuck.

use dukan_core::types::{
    PaymentChoice, PaymentMethodSetting, PlanTier, ShopPaymentConfig, ShopperId, to_minor_units,
};
use dukan_core::{GatewayCredentials, PaymentGateway, PaymentLink, PaymentLinkRequest};
use tracing::warn;

/// Outcome of routing one finalize call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentRoute {
    /// Cash on delivery: no payment path, confirm immediately.
    CodConfirmed,
    /// Hosted gateway checkout created; await asynchronous confirmation.
    GatewayLink(PaymentLink),
    /// Manual-proof path: pay out-of-band and upload a screenshot.
    ManualProof { pay_address: String },
    /// No online path is usable for this merchant.
    NoPathAvailable,
}

/// Decide the payment path for one order.
pub async fn select_route(
    gateway: &dyn PaymentGateway,
    master_key: Option<&[u8; 32]>,
    shop: &ShopPaymentConfig,
    choice: PaymentChoice,
    order_id: i64,
    total: f64,
    shopper: &ShopperId,
) -> PaymentRoute {
    if choice == PaymentChoice::Cod {
        return PaymentRoute::CodConfirmed;
    }

    if let Some(creds) = gateway_credentials(master_key, shop) {
        let request = PaymentLinkRequest {
            amount_minor: to_minor_units(total),
            currency: "INR".to_string(),
            description: format!("Order #{order_id}"),
            customer_phone: shopper.0.clone(),
            reference: order_id.to_string(),
        };
        match gateway.create_payment_link(&creds, &request).await {
            Ok(link) => return PaymentRoute::GatewayLink(link),
            Err(e) => {
                warn!(
                    shop_id = shop.shop_id,
                    order_id,
                    error = %e,
                    "gateway link creation failed, falling back to manual path"
                );
            }
        }
    }

    match &shop.manual_payment_address {
        Some(pay_address) if !pay_address.is_empty() => PaymentRoute::ManualProof {
            pay_address: pay_address.clone(),
        },
        _ => PaymentRoute::NoPathAvailable,
    }
}

/// Decrypt the merchant's gateway credentials if the merchant is eligible:
/// pro tier, gateway method selected, both credentials present, and a
/// master key configured. Any decryption failure disables the gateway path.
fn gateway_credentials(
    master_key: Option<&[u8; 32]>,
    shop: &ShopPaymentConfig,
) -> Option<GatewayCredentials> {
    if shop.plan_tier != PlanTier::Pro || shop.active_method != PaymentMethodSetting::Gateway {
        return None;
    }
    let key = master_key?;
    let sealed_id = shop.gateway_key_id_sealed.as_deref()?;
    let sealed_secret = shop.gateway_key_secret_sealed.as_deref()?;

    let key_id = match dukan_vault::open_from_hex(key, sealed_id) {
        Ok(v) => v,
        Err(e) => {
            warn!(shop_id = shop.shop_id, error = %e, "gateway key id unsealing failed");
            return None;
        }
    };
    let key_secret = match dukan_vault::open_from_hex(key, sealed_secret) {
        Ok(v) => v,
        Err(e) => {
            warn!(shop_id = shop.shop_id, error = %e, "gateway key secret unsealing failed");
            return None;
        }
    };
    Some(GatewayCredentials { key_id, key_secret })
}
