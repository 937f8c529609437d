// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use dukan_checkout::{CheckoutEngine, Reconciler};
use dukan_core::DukanError;
use dukan_session::TokenIssuer;
use dukan_storage::Database;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::{admin, checkout, handlers, payment};

/// Gateway configuration (mirrors the relevant `dukan-config` sections to
/// avoid a config-crate dependency from the gateway crate).
#[derive(Clone)]
pub struct GatewayConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Token expected in the provider's verification challenge.
    pub verify_token: String,
    /// Shared secret for the admin approval endpoint.
    pub admin_secret: String,
    /// HMAC secret for payment webhooks.
    pub webhook_secret: String,
    /// Deep-link base back into the chat channel (e.g. `https://wa.me/91...`).
    pub chat_deep_link_base: String,
    /// Public base URL for building hand-off URLs from `/generate-link`.
    pub public_base_url: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("verify_token", &"[redacted]")
            .field("admin_secret", &"[redacted]")
            .field("webhook_secret", &"[redacted]")
            .field("chat_deep_link_base", &self.chat_deep_link_base)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<CheckoutEngine>,
    pub reconciler: Arc<Reconciler>,
    pub tokens: Arc<TokenIssuer>,
    pub db: Arc<Database>,
    pub config: GatewayConfig,
}

/// Build the full gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/webhook", get(handlers::verify_webhook))
        .route("/webhook", post(handlers::receive_message))
        .route("/webhooks/payment", post(payment::payment_webhook))
        .route("/generate-link", post(checkout::generate_link))
        .route("/session/{token}", get(checkout::session_data))
        .route("/confirm-address", post(checkout::confirm_address))
        .route("/verify-order", post(admin::verify_order))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the cancellation token fires.
pub async fn start_server(
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), DukanError> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DukanError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| DukanError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
