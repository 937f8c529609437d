// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A `ShipmentTracker` stub driven by a scripted status table.

use std::collections::HashMap;

use async_trait::async_trait;
use dukan_core::{DukanError, ShipmentStatus, ShipmentTracker};
use tokio::sync::Mutex;

/// Maps shipment references to scripted statuses; unknown refs error like a
/// provider failure so batch-tolerance can be tested.
#[derive(Default)]
pub struct ScriptedTracker {
    statuses: Mutex<HashMap<String, ShipmentStatus>>,
}

impl ScriptedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn script(&self, shipment_ref: &str, status: ShipmentStatus) {
        self.statuses
            .lock()
            .await
            .insert(shipment_ref.to_string(), status);
    }
}

#[async_trait]
impl ShipmentTracker for ScriptedTracker {
    async fn track(&self, shipment_ref: &str) -> Result<ShipmentStatus, DukanError> {
        self.statuses
            .lock()
            .await
            .get(shipment_ref)
            .copied()
            .ok_or_else(|| DukanError::Provider {
                message: format!("tracking lookup failed for {shipment_ref}"),
                source: None,
            })
    }
}
