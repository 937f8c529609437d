// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dukan integration tests.
//!
//! Provides recording/stub implementations of the adapter traits and a
//! temp-database fixture so engine, sweeper, and gateway tests can drive
//! real flows without network or provider accounts.

pub mod fixtures;
pub mod recording_sender;
pub mod stub_gateway;
pub mod stub_tracker;

pub use fixtures::TestDb;
pub use recording_sender::RecordingSender;
pub use stub_gateway::StubGateway;
pub use stub_tracker::ScriptedTracker;
