// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkout hand-off REST surface, consumed by the web address-capture page.
//!
//! The hand-off URL embeds only the opaque token, never the shopper
//! identity. Expired and unknown tokens map to distinct statuses (400/404)
//! so the frontend can offer re-issuance.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dukan_checkout::classify::HANDOFF_RETURN_MARKER;
use dukan_core::DukanError;
use dukan_core::types::ShopperId;
use dukan_storage::NewAddress;
use dukan_storage::queries::addresses;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct GenerateLinkRequest {
    pub shopper_id: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateLinkResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SessionDataResponse {
    pub masked_identity: String,
    pub saved_address: Option<SavedAddress>,
}

#[derive(Debug, Serialize)]
pub struct SavedAddress {
    pub house_no: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmAddressRequest {
    pub token: String,
    pub address: AddressPayload,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AddressPayload {
    pub house_no: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmAddressResponse {
    pub redirect_url: String,
}

fn token_error(e: &DukanError) -> Response {
    match e {
        DukanError::TokenExpired => (StatusCode::BAD_REQUEST, "link expired").into_response(),
        DukanError::TokenNotFound => {
            (StatusCode::NOT_FOUND, "link invalid or used").into_response()
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response(),
    }
}

/// POST /generate-link
pub async fn generate_link(
    State(state): State<GatewayState>,
    Json(body): Json<GenerateLinkRequest>,
) -> Response {
    let shopper = ShopperId(body.shopper_id);
    let token = state.tokens.issue(&shopper).await;
    let url = format!(
        "{}/checkout/{token}",
        state.config.public_base_url.trim_end_matches('/')
    );
    (StatusCode::OK, Json(GenerateLinkResponse { url })).into_response()
}

/// GET /session/{token}
pub async fn session_data(
    State(state): State<GatewayState>,
    Path(token): Path<String>,
) -> Response {
    let shopper = match state.tokens.validate(&token).await {
        Ok(shopper) => shopper,
        Err(e) => return token_error(&e),
    };

    let saved_address = match addresses::latest_for_shopper(&state.db, shopper.as_str()).await {
        Ok(addr) => addr.map(|a| SavedAddress {
            house_no: a.house_no,
            area: a.area,
            city: a.city,
            state: a.state,
            pincode: a.pincode,
        }),
        Err(e) => {
            warn!(error = %e, "saved address lookup failed");
            None
        }
    };

    (
        StatusCode::OK,
        Json(SessionDataResponse {
            masked_identity: shopper.masked(),
            saved_address,
        }),
    )
        .into_response()
}

/// POST /confirm-address
///
/// Consuming the token and persisting the address row happen on the valid
/// path only; the returned deep link carries the confirmation marker that
/// resumes the chat session.
pub async fn confirm_address(
    State(state): State<GatewayState>,
    Json(body): Json<ConfirmAddressRequest>,
) -> Response {
    let pincode = body.address.pincode.trim();
    if pincode.len() != 6 || !pincode.bytes().all(|b| b.is_ascii_digit()) {
        return (StatusCode::BAD_REQUEST, "invalid address format").into_response();
    }

    let shopper = match state.tokens.consume(&body.token).await {
        Ok(shopper) => shopper,
        Err(e) => return token_error(&e),
    };

    let result = addresses::insert_address(
        &state.db,
        &NewAddress {
            shopper_id: shopper.0.clone(),
            house_no: body.address.house_no.trim().to_string(),
            area: body.address.area.trim().to_string(),
            city: body.address.city.trim().to_string(),
            state: body.address.state.trim().to_string(),
            pincode: pincode.to_string(),
        },
    )
    .await;

    match result {
        Ok(addr_id) => {
            info!(shopper = %shopper, addr_id, "address captured via web hand-off");
            let redirect_url = format!(
                "{}?text={HANDOFF_RETURN_MARKER}{}",
                state.config.chat_deep_link_base, body.token
            );
            (StatusCode::OK, Json(ConfirmAddressResponse { redirect_url })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "address insert failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
