// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic background tasks for the Dukan commerce bot.
//!
//! Both sweepers share the session store's per-shopper locking discipline
//! with the foreground state machine, and both run as cancellable scheduled
//! tasks so shutdown is graceful rather than an aborted loop.

pub mod recovery;
pub mod watchdog;

pub use recovery::CartRecoverySweeper;
pub use watchdog::DeliveryWatchdog;
