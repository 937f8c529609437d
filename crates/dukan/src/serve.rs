// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring for `dukan serve`: storage, session store, engine, sweepers,
//! and the HTTP gateway, with graceful shutdown on SIGINT.

use std::sync::Arc;

use dukan_checkout::{CheckoutEngine, EngineConfig, Reconciler};
use dukan_config::DukanConfig;
use dukan_core::{DukanError, MessageSender, PaymentGateway, ShipmentTracker};
use dukan_gateway::{GatewayConfig, GatewayState, start_server};
use dukan_session::{SessionStore, TokenIssuer};
use dukan_storage::Database;
use dukan_sweeper::{CartRecoverySweeper, DeliveryWatchdog};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::messaging::HttpMessageSender;
use crate::payments::HttpPaymentGateway;
use crate::shipping::HttpShipmentTracker;

fn parse_master_key(hex_key: &str) -> Option<[u8; 32]> {
    if hex_key.is_empty() {
        return None;
    }
    let bytes = hex::decode(hex_key).ok()?;
    let array: [u8; 32] = bytes.try_into().ok()?;
    Some(array)
}

/// Run the bot until SIGINT.
pub async fn run(config: DukanConfig) -> Result<(), DukanError> {
    let db = Arc::new(Database::open(&config.storage.database_path).await?);
    let store = Arc::new(SessionStore::new());
    let tokens = Arc::new(TokenIssuer::new(
        chrono::Duration::minutes(config.checkout.token_ttl_minutes as i64),
        chrono::Duration::seconds(config.checkout.token_grace_secs as i64),
    ));

    let sender: Arc<dyn MessageSender> =
        Arc::new(HttpMessageSender::new(config.messaging.clone()));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new());
    let tracker: Arc<dyn ShipmentTracker> =
        Arc::new(HttpShipmentTracker::new(config.shipping.clone()));

    let master_key = parse_master_key(&config.payments.master_key_hex);
    if master_key.is_none() && !config.payments.master_key_hex.is_empty() {
        warn!("payments.master_key_hex is invalid; gateway payments disabled");
    }

    let engine = Arc::new(CheckoutEngine::new(
        Arc::clone(&store),
        Arc::clone(&tokens),
        Arc::clone(&db),
        Arc::clone(&sender),
        gateway,
        EngineConfig {
            public_base_url: config.gateway.public_base_url.clone(),
            master_key,
        },
    ));
    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&db),
        Arc::clone(&store),
        Arc::clone(&sender),
    ));

    let cancel = CancellationToken::new();

    // Background sweepers.
    let recovery = Arc::new(CartRecoverySweeper::new(
        Arc::clone(&store),
        Arc::clone(&sender),
        std::time::Duration::from_secs(config.recovery.interval_secs),
        chrono::Duration::minutes(config.recovery.min_silence_minutes as i64),
        chrono::Duration::hours(config.recovery.max_age_hours as i64),
    ));
    let recovery_task = {
        let recovery = Arc::clone(&recovery);
        let cancel = cancel.clone();
        tokio::spawn(async move { recovery.run(cancel).await })
    };

    let watchdog = Arc::new(DeliveryWatchdog::new(
        Arc::clone(&db),
        tracker,
        Arc::clone(&sender),
        Arc::clone(&store),
        std::time::Duration::from_secs(config.watchdog.interval_secs),
    ));
    let watchdog_task = {
        let watchdog = Arc::clone(&watchdog);
        let cancel = cancel.clone();
        tokio::spawn(async move { watchdog.run(cancel).await })
    };

    // HTTP gateway.
    let state = GatewayState {
        engine,
        reconciler,
        tokens,
        db: Arc::clone(&db),
        config: GatewayConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
            verify_token: config.gateway.verify_token.clone(),
            admin_secret: config.gateway.admin_secret.clone(),
            webhook_secret: config.payments.webhook_secret.clone(),
            chat_deep_link_base: config.gateway.chat_deep_link_base.clone(),
            public_base_url: config.gateway.public_base_url.clone(),
        },
    };
    let server_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { start_server(state, cancel).await })
    };

    info!("dukan online");

    tokio::signal::ctrl_c().await.map_err(|e| DukanError::Internal(
        format!("signal handler failed: {e}"),
    ))?;
    info!("shutdown signal received");
    cancel.cancel();

    if let Err(e) = recovery_task.await {
        warn!(error = %e, "recovery sweeper task join failed");
    }
    if let Err(e) = watchdog_task.await {
        warn!(error = %e, "watchdog task join failed");
    }
    match server_task.await {
        Ok(result) => result?,
        Err(e) => warn!(error = %e, "gateway task join failed"),
    }

    db.close().await?;
    info!("shutdown complete");
    Ok(())
}
