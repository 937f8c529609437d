// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./dukan.toml` > `~/.config/dukan/dukan.toml` > `/etc/dukan/dukan.toml`
//! with environment variable overrides via the `DUKAN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DukanConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dukan/dukan.toml` (system-wide)
/// 3. `~/.config/dukan/dukan.toml` (user config)
/// 4. `./dukan.toml` (local directory)
/// 5. `DUKAN_*` environment variables
pub fn load_config() -> Result<DukanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukanConfig::default()))
        .merge(Toml::file("/etc/dukan/dukan.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dukan/dukan.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dukan.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string only (no hierarchy lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DukanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukanConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DukanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukanConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DUKAN_GATEWAY_VERIFY_TOKEN` must map to
/// `gateway.verify_token`, not `gateway.verify.token`.
fn env_provider() -> Env {
    Env::prefixed("DUKAN_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("gateway_", "gateway.", 1)
            .replacen("messaging_", "messaging.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("checkout_", "checkout.", 1)
            .replacen("payments_", "payments.", 1)
            .replacen("recovery_", "recovery.", 1)
            .replacen("watchdog_", "watchdog.", 1)
            .replacen("shipping_", "shipping.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [gateway]
            port = 9000
            verify_token = "hub-secret"

            [recovery]
            min_silence_minutes = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.verify_token, "hub-secret");
        assert_eq!(config.recovery.min_silence_minutes, 15);
        // Untouched sections keep their defaults.
        assert_eq!(config.watchdog.interval_secs, 3600);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = load_config_from_str(
            r#"
            [gateway]
            prot = 9000
            "#,
        );
        assert!(result.is_err(), "typo'd key should fail extraction");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.checkout.token_ttl_minutes, 10);
    }
}
