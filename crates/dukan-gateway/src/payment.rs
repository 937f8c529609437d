// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment-confirmation webhook.
//!
//! 200 for any successfully parsed and either processed or intentionally
//! ignored event (duplicates, irrelevant types); 400 only on signature
//! failure or an unparseable body. The signature covers the raw bytes, so
//! verification happens before any JSON work.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use dukan_checkout::{PaymentEvent, verify_signature};
use tracing::warn;

use crate::server::GatewayState;

/// Header carrying the provider's HMAC-SHA256 signature (hex).
pub const SIGNATURE_HEADER: &str = "x-payment-signature";

/// POST /webhooks/payment
pub async fn payment_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if let Err(e) = verify_signature(&state.config.webhook_secret, &body, signature) {
        warn!(error = %e, "payment webhook rejected");
        return (StatusCode::BAD_REQUEST, "invalid signature").into_response();
    }

    let event: PaymentEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "payment webhook body unparseable");
            return (StatusCode::BAD_REQUEST, "unparseable body").into_response();
        }
    };

    match state.reconciler.process(event).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response(),
        Err(e) => {
            warn!(error = %e, "payment reconciliation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "reconciliation failed").into_response()
        }
    }
}
