// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Dukan commerce bot.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed CRUD operations for
//! orders, addresses, items, shops, coupons, and reviews.
//!
//! The orders table is the single source of truth for financial state; all
//! payment-status transitions are single conditional UPDATEs so concurrent
//! writers (duplicate webhooks, admin approval) cannot race each other.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
