// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dukan commerce bot.

use thiserror::Error;

/// The primary error type used across all Dukan crates.
#[derive(Debug, Error)]
pub enum DukanError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (send failure, provider rejection, malformed payload).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Payment or shipping provider errors (link creation failed, tracking poll failed).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A checkout token that does not exist or was already consumed.
    #[error("checkout token not found")]
    TokenNotFound,

    /// A checkout token past its validity window.
    #[error("checkout token expired")]
    TokenExpired,

    /// Webhook or admin request failed authentication.
    #[error("signature verification failed: {0}")]
    Signature(String),

    /// Recoverable input validation failure (bad quantity, malformed address, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Credential seal/open failures.
    #[error("vault error: {0}")]
    Vault(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
