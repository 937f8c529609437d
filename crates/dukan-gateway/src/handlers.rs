// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message webhook handlers: the provider's verification challenge and
//! inbound event ingestion.
//!
//! Ingestion always acknowledges: the upstream channel has no way to show
//! a failure to the shopper and retries non-2xx deliveries indefinitely,
//! so every internal outcome collapses to `{"status":"ok"}`.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::debug;

use crate::server::GatewayState;

/// Response body for acknowledged webhook deliveries.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: &'static str,
}

fn ack() -> Json<AckResponse> {
    Json(AckResponse { status: "ok" })
}

/// GET /webhook
///
/// The provider's subscription verification challenge: echo `hub.challenge`
/// as plain text when the verify token matches, 403 otherwise.
pub async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge").cloned().unwrap_or_default();

    if mode == Some("subscribe")
        && !state.config.verify_token.is_empty()
        && token == Some(state.config.verify_token.as_str())
    {
        (StatusCode::OK, challenge).into_response()
    } else {
        (StatusCode::FORBIDDEN, "verification failed").into_response()
    }
}

/// POST /webhook
///
/// Inbound event ingestion. Malformed envelopes and status-update
/// deliveries are acknowledged and dropped.
pub async fn receive_message(
    State(state): State<GatewayState>,
    body: Result<Json<serde_json::Value>, axum::extract::rejection::JsonRejection>,
) -> Json<AckResponse> {
    let Ok(Json(payload)) = body else {
        debug!("unparseable webhook body, acknowledged");
        return ack();
    };

    match dukan_checkout::parse_envelope(&payload) {
        Some(event) => state.engine.process(event).await,
        None => debug!("webhook delivery carried no actionable message"),
    }
    ack()
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
