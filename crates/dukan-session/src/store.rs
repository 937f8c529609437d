// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyed in-memory session store with per-shopper serialization.
//!
//! The read-modify-write cycle around a transition (`get` state, decide,
//! `set`/`update` state) is a critical section: two concurrent events for
//! the same shopper (duplicate webhook retries, rapid double-taps) would
//! otherwise interleave and corrupt state. Every mutation path -- the state
//! machine, the webhook reconciler, and both sweepers -- must hold the
//! per-shopper guard from [`SessionStore::lock`] for the whole cycle.
//!
//! No ordering is guaranteed across different shoppers.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dukan_core::types::ShopperId;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::state::Session;

/// Shared in-memory session map. Sessions do not survive process restarts.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the per-shopper guard. Hold it across the full
    /// read-modify-write cycle of a transition.
    pub async fn lock(&self, shopper: &ShopperId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(shopper.0.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Current session for a shopper; an empty idle session if absent.
    pub fn get(&self, shopper: &ShopperId) -> Session {
        self.sessions
            .get(shopper.as_str())
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Replace the session, refreshing `last_updated`.
    pub fn set(&self, shopper: &ShopperId, mut session: Session) {
        session.last_updated = Utc::now();
        self.sessions.insert(shopper.0.clone(), session);
    }

    /// Merge-style update: applies `apply` to the current session (empty if
    /// absent), refreshes `last_updated`, and returns the stored result.
    pub fn update<F>(&self, shopper: &ShopperId, apply: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.get(shopper);
        apply(&mut session);
        session.last_updated = Utc::now();
        self.sessions.insert(shopper.0.clone(), session.clone());
        session
    }

    /// Drop a shopper's session entirely.
    pub fn clear(&self, shopper: &ShopperId) {
        self.sessions.remove(shopper.as_str());
    }

    /// Snapshot scan of sessions whose silence duration lies strictly inside
    /// `(min_age, max_age)` and which match `predicate`.
    ///
    /// Returns clones; no lock is held while the caller processes them, so
    /// callers must re-acquire [`lock`](Self::lock) and re-check before
    /// mutating a matched session.
    pub fn scan_stale<P>(
        &self,
        min_age: Duration,
        max_age: Duration,
        now: DateTime<Utc>,
        predicate: P,
    ) -> Vec<(ShopperId, Session)>
    where
        P: Fn(&Session) -> bool,
    {
        let mut matches = Vec::new();
        for entry in self.sessions.iter() {
            let silence = now - entry.value().last_updated;
            if silence > min_age && silence < max_age && predicate(entry.value()) {
                matches.push((ShopperId(entry.key().clone()), entry.value().clone()));
            }
        }
        matches
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionState;

    fn shopper(n: &str) -> ShopperId {
        ShopperId(n.to_string())
    }

    #[test]
    fn get_unknown_shopper_returns_empty_session() {
        let store = SessionStore::new();
        let session = store.get(&shopper("919876543210"));
        assert_eq!(session.state, SessionState::Idle);
        assert!(!session.nudged);
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = SessionStore::new();
        let id = shopper("919876543210");
        store.set(
            &id,
            Session::with_state(SessionState::AwaitingReviewRating {
                order_id: 5,
                shop_id: 1,
            }),
        );
        let session = store.get(&id);
        assert!(matches!(
            session.state,
            SessionState::AwaitingReviewRating { order_id: 5, .. }
        ));
    }

    #[test]
    fn update_refreshes_timestamp() {
        let store = SessionStore::new();
        let id = shopper("919876543210");
        let mut stale = Session::empty();
        stale.last_updated = Utc::now() - Duration::hours(2);
        store.sessions.insert(id.0.clone(), stale);

        let updated = store.update(&id, |s| s.nudged = true);
        assert!(updated.nudged);
        assert!(Utc::now() - updated.last_updated < Duration::seconds(5));
    }

    #[test]
    fn clear_removes_session() {
        let store = SessionStore::new();
        let id = shopper("919876543210");
        store.set(&id, Session::empty());
        assert_eq!(store.len(), 1);
        store.clear(&id);
        assert!(store.is_empty());
        assert_eq!(store.get(&id).state, SessionState::Idle);
    }

    #[test]
    fn scan_stale_respects_window_bounds() {
        let store = SessionStore::new();
        let now = Utc::now();

        let mut fresh = Session::empty();
        fresh.last_updated = now - Duration::minutes(10);
        store.sessions.insert("fresh".into(), fresh);

        let mut stale = Session::empty();
        stale.last_updated = now - Duration::minutes(45);
        store.sessions.insert("stale".into(), stale);

        let mut ancient = Session::empty();
        ancient.last_updated = now - Duration::hours(30);
        store.sessions.insert("ancient".into(), ancient);

        let matches = store.scan_stale(
            Duration::minutes(30),
            Duration::hours(24),
            now,
            |_| true,
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.as_str(), "stale");
    }

    #[test]
    fn scan_stale_applies_predicate() {
        let store = SessionStore::new();
        let now = Utc::now();
        let mut nudged = Session::empty();
        nudged.nudged = true;
        nudged.last_updated = now - Duration::minutes(45);
        store.sessions.insert("nudged".into(), nudged);

        let matches = store.scan_stale(
            Duration::minutes(30),
            Duration::hours(24),
            now,
            |s| !s.nudged,
        );
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn per_key_lock_serializes_same_shopper() {
        let store = Arc::new(SessionStore::new());
        let id = shopper("919876543210");

        let guard = store.lock(&id).await;
        let contender = {
            let store = Arc::clone(&store);
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = store.lock(&id).await;
            })
        };

        // While the first guard is held, the contender cannot finish.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_shoppers_do_not_contend() {
        let store = SessionStore::new();
        let _a = store.lock(&shopper("a")).await;
        // Acquiring a different key must not block.
        let _b = store.lock(&shopper("b")).await;
    }
}
