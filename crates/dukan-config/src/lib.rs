// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Dukan commerce bot.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), file hierarchy lookup, and environment variable
//! overrides via the `DUKAN_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! let config = dukan_config::load_and_validate().expect("config errors");
//! println!("binding {}:{}", config.gateway.host, config.gateway.port);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::DukanConfig;
pub use validation::validate_config;

use dukan_core::DukanError;

/// Load configuration from the file hierarchy and validate it.
pub fn load_and_validate() -> Result<DukanConfig, DukanError> {
    let config = loader::load_config().map_err(|e| DukanError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from an inline TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<DukanConfig, DukanError> {
    let config =
        loader::load_config_from_str(toml_content).map_err(|e| DukanError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
