// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin approval surface: manual override of the reconciler for the
//! manual-proof path, behind a constant-time-compared shared secret.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::server::GatewayState;

/// Header carrying the shared admin secret.
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

#[derive(Debug, Deserialize)]
pub struct VerifyOrderRequest {
    pub order_id: i64,
    pub decision: Decision,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

/// Constant-time comparison of the presented secret against the configured
/// one. Fails closed when no secret is configured.
fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    let presented = headers
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    ring::constant_time::verify_slices_are_equal(presented.as_bytes(), expected.as_bytes())
        .is_ok()
}

/// POST /verify-order
pub async fn verify_order(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<VerifyOrderRequest>,
) -> Response {
    if !is_authorized(&headers, &state.config.admin_secret) {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }

    let result = match body.decision {
        Decision::Approve => state.reconciler.approve(body.order_id).await,
        Decision::Reject => state.reconciler.reject(body.order_id).await,
    };

    match result {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "order not found").into_response(),
        Err(e) => {
            warn!(order_id = body.order_id, error = %e, "verify-order failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
