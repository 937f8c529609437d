// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived, single-use checkout tokens for web hand-offs.
//!
//! A token binds a shopper identity to a secure address-capture page without
//! exposing the identity in the URL. One typed record per token: opaque uuid
//! value, issuance instant, shopper binding. Expiry is computed from the
//! stored instant -- nothing is encoded in the token text.
//!
//! Invariants: at most one live token per shopper (reissue overwrites), and
//! a token is consumed at most once (check and removal happen under one
//! lock, so there is no double-spend window).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use dukan_core::{DukanError, types::ShopperId};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct TokenRecord {
    shopper: ShopperId,
    issued_at: DateTime<Utc>,
}

#[derive(Default)]
struct TokenMap {
    by_token: HashMap<String, TokenRecord>,
    by_shopper: HashMap<String, String>,
}

/// Mints and redeems checkout tokens.
pub struct TokenIssuer {
    ttl: Duration,
    /// Grace buffer for clock skew between components with independently
    /// sourced clocks.
    grace: Duration,
    inner: Mutex<TokenMap>,
}

impl TokenIssuer {
    pub fn new(ttl: Duration, grace: Duration) -> Self {
        Self {
            ttl,
            grace,
            inner: Mutex::new(TokenMap::default()),
        }
    }

    /// Defaults per design target: 10 minute validity, 30 s grace.
    pub fn with_defaults() -> Self {
        Self::new(Duration::minutes(10), Duration::seconds(30))
    }

    /// Mint a fresh token for a shopper, invalidating any live one.
    pub async fn issue(&self, shopper: &ShopperId) -> String {
        self.issue_at(shopper, Utc::now()).await
    }

    /// Check token liveness without consuming it.
    pub async fn validate(&self, token: &str) -> Result<ShopperId, DukanError> {
        self.validate_at(token, Utc::now()).await
    }

    /// Redeem a token: on success the token is invalidated atomically with
    /// the validity check.
    pub async fn consume(&self, token: &str) -> Result<ShopperId, DukanError> {
        self.consume_at(token, Utc::now()).await
    }

    async fn issue_at(&self, shopper: &ShopperId, now: DateTime<Utc>) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let mut map = self.inner.lock().await;

        if let Some(previous) = map.by_shopper.insert(shopper.0.clone(), token.clone()) {
            map.by_token.remove(&previous);
        }
        map.by_token.insert(
            token.clone(),
            TokenRecord {
                shopper: shopper.clone(),
                issued_at: now,
            },
        );
        token
    }

    async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<ShopperId, DukanError> {
        let mut map = self.inner.lock().await;
        let record = map
            .by_token
            .get(token)
            .cloned()
            .ok_or(DukanError::TokenNotFound)?;

        if self.is_expired(&record, now) {
            map.by_token.remove(token);
            map.by_shopper.remove(record.shopper.as_str());
            return Err(DukanError::TokenExpired);
        }
        Ok(record.shopper)
    }

    async fn consume_at(&self, token: &str, now: DateTime<Utc>) -> Result<ShopperId, DukanError> {
        let mut map = self.inner.lock().await;
        let record = map.by_token.remove(token).ok_or(DukanError::TokenNotFound)?;
        map.by_shopper.remove(record.shopper.as_str());

        if self.is_expired(&record, now) {
            return Err(DukanError::TokenExpired);
        }
        Ok(record.shopper)
    }

    fn is_expired(&self, record: &TokenRecord, now: DateTime<Utc>) -> bool {
        now - record.issued_at > self.ttl + self.grace
    }
}
