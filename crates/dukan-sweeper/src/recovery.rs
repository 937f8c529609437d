// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abandoned-cart recovery.
//!
//! Every tick snapshot-scans the session store for stalled checkouts:
//! checkout-in-progress state, non-empty cart, silent for more than the
//! minimum threshold but younger than the staleness ceiling, and not
//! already nudged. Each match gets exactly one resume/cancel nudge.
//!
//! Matches are re-checked under the per-shopper lock before mutation: the
//! snapshot holds no lock, so a shopper may have resumed between the scan
//! and the nudge.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dukan_checkout::messages;
use dukan_core::MessageSender;
use dukan_core::types::{ShopperId, cart_total};
use dukan_session::{SessionState, SessionStore};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Periodic abandoned-cart nudger.
pub struct CartRecoverySweeper {
    store: Arc<SessionStore>,
    sender: Arc<dyn MessageSender>,
    interval: std::time::Duration,
    min_silence: Duration,
    max_age: Duration,
}

impl CartRecoverySweeper {
    pub fn new(
        store: Arc<SessionStore>,
        sender: Arc<dyn MessageSender>,
        interval: std::time::Duration,
        min_silence: Duration,
        max_age: Duration,
    ) -> Self {
        Self {
            store,
            sender,
            interval,
            min_silence,
            max_age,
        }
    }

    /// Run until cancelled. Overrunning ticks are skipped, never overlapped.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = self.interval.as_secs(), "cart recovery sweeper started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("cart recovery sweeper stopped");
                    break;
                }
                _ = interval.tick() => {
                    let nudged = self.tick(Utc::now()).await;
                    if nudged > 0 {
                        info!(nudged, "recovery nudges sent");
                    }
                }
            }
        }
    }

    /// One sweep pass. Returns the number of nudges sent.
    pub async fn tick(&self, now: DateTime<Utc>) -> usize {
        let candidates = self.store.scan_stale(self.min_silence, self.max_age, now, |s| {
            s.state.is_checkout_in_progress() && !s.nudged && s.state.recovery_lines().is_some()
        });

        let mut nudged = 0;
        for (shopper, _) in candidates {
            if self.nudge(&shopper, now).await {
                nudged += 1;
            }
        }
        nudged
    }

    async fn nudge(&self, shopper: &ShopperId, now: DateTime<Utc>) -> bool {
        let _guard = self.store.lock(shopper).await;

        // Re-check under the lock; foreground traffic may have moved on.
        let current = self.store.get(shopper);
        if current.nudged
            || !current.state.is_checkout_in_progress()
            || now - current.last_updated <= self.min_silence
        {
            debug!(shopper = %shopper, "candidate no longer eligible, skipping nudge");
            return false;
        }
        let Some(lines) = current.state.recovery_lines() else {
            return false;
        };

        let total = match &current.state {
            SessionState::AwaitingAddress { checkout }
            | SessionState::AwaitingManualAddress { checkout }
            | SessionState::AwaitingPaymentMethod { checkout } => checkout.display_total(),
            _ => cart_total(&lines),
        };

        if let Err(e) = self
            .sender
            .send(shopper, messages::recovery_nudge(lines.len(), total))
            .await
        {
            warn!(shopper = %shopper, error = %e, "recovery nudge send failed");
            // Do not mark nudged; the next tick retries.
            return false;
        }

        self.store.update(shopper, |s| s.nudged = true);
        true
    }
}
