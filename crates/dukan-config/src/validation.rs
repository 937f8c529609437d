// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation that Figment cannot express.

use dukan_core::DukanError;

use crate::model::DukanConfig;

/// Validate cross-field constraints on a loaded configuration.
pub fn validate_config(config: &DukanConfig) -> Result<(), DukanError> {
    if config.checkout.token_ttl_minutes == 0 {
        return Err(DukanError::Config(
            "checkout.token_ttl_minutes must be greater than zero".to_string(),
        ));
    }

    if config.recovery.min_silence_minutes * 60 >= config.recovery.max_age_hours * 3600 {
        return Err(DukanError::Config(format!(
            "recovery.min_silence_minutes ({}) must be below recovery.max_age_hours ({})",
            config.recovery.min_silence_minutes, config.recovery.max_age_hours
        )));
    }

    if config.recovery.interval_secs == 0 || config.watchdog.interval_secs == 0 {
        return Err(DukanError::Config(
            "sweeper intervals must be greater than zero".to_string(),
        ));
    }

    if !config.payments.master_key_hex.is_empty() {
        let decoded = hex::decode(&config.payments.master_key_hex)
            .map_err(|e| DukanError::Config(format!("payments.master_key_hex: {e}")))?;
        if decoded.len() != 32 {
            return Err(DukanError::Config(
                "payments.master_key_hex must decode to exactly 32 bytes".to_string(),
            ));
        }
    }

    Ok(())
}
