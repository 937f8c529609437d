// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model with compiled defaults.
//!
//! All sections use `deny_unknown_fields` so a typo in `dukan.toml` fails
//! loudly at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Dukan bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DukanConfig {
    pub gateway: GatewayConfig,
    pub messaging: MessagingConfig,
    pub storage: StorageConfig,
    pub checkout: CheckoutConfig,
    pub payments: PaymentsConfig,
    pub recovery: RecoveryConfig,
    pub watchdog: WatchdogConfig,
    pub shipping: ShippingConfig,
}

/// HTTP gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GatewayConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Token echoed back during the provider's webhook verification challenge.
    pub verify_token: String,
    /// Shared secret for the admin approval endpoint (`x-admin-secret`).
    pub admin_secret: String,
    /// Public base URL used to build checkout hand-off links. When empty,
    /// the state machine falls back to manual free-text address capture.
    pub public_base_url: String,
    /// Deep-link base back into the chat channel after a web hand-off.
    pub chat_deep_link_base: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            verify_token: String::new(),
            admin_secret: String::new(),
            public_base_url: String::new(),
            chat_deep_link_base: "https://wa.me".to_string(),
        }
    }
}

/// Outbound messaging provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MessagingConfig {
    /// Provider graph API base, e.g. `https://graph.facebook.com/v18.0`.
    pub api_base: String,
    /// Bearer token for the provider API.
    pub access_token: String,
    /// The business sender id (phone-number id) messages are sent from.
    pub sender_id: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            api_base: "https://graph.facebook.com/v18.0".to_string(),
            access_token: String::new(),
            sender_id: String::new(),
        }
    }
}

/// SQLite storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StorageConfig {
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "dukan.db".to_string(),
        }
    }
}

/// Checkout token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CheckoutConfig {
    /// Validity window for web hand-off tokens.
    pub token_ttl_minutes: u64,
    /// Grace buffer for clock skew between components.
    pub token_grace_secs: u64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: 10,
            token_grace_secs: 30,
        }
    }
}

/// Payment webhook and credential-vault settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PaymentsConfig {
    /// HMAC secret for verifying provider payment webhooks.
    pub webhook_secret: String,
    /// 64-hex-char master key for sealing merchant gateway credentials.
    pub master_key_hex: String,
}

/// Cart recovery sweeper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RecoveryConfig {
    pub interval_secs: u64,
    /// Minimum silence before a nudge.
    pub min_silence_minutes: u64,
    /// Ceiling past which carts are presumed truly abandoned.
    pub max_age_hours: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            min_silence_minutes: 30,
            max_age_hours: 24,
        }
    }
}

/// Delivery watchdog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WatchdogConfig {
    pub interval_secs: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
        }
    }
}

/// Shipping provider settings for the delivery watchdog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ShippingConfig {
    pub api_base: String,
    /// Bearer token for the tracking API. Empty leaves the watchdog polling
    /// but every lookup fails (and is skipped) until one is configured.
    pub api_token: String,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            api_base: "https://apiv2.shiprocket.in/v1/external".to_string(),
            api_token: String::new(),
        }
    }
}
