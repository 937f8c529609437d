// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipment tracking seam for the delivery watchdog.

use async_trait::async_trait;

use crate::error::DukanError;

/// Coarse shipment status as reported by the shipping provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentStatus {
    InTransit,
    Delivered,
    /// Provider returned something we do not act on.
    Unknown,
}

/// Polls current shipment status. No push channel exists for shipment
/// events, so the watchdog polls on an interval.
#[async_trait]
pub trait ShipmentTracker: Send + Sync {
    async fn track(&self, shipment_ref: &str) -> Result<ShipmentStatus, DukanError>;
}
