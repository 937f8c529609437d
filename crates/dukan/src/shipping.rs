// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipment status polling against the shipping provider's tracking API.

use async_trait::async_trait;
use dukan_config::model::ShippingConfig;
use dukan_core::{DukanError, ShipmentStatus, ShipmentTracker};

/// Tracking client for a Shiprocket-style provider.
pub struct HttpShipmentTracker {
    client: reqwest::Client,
    config: ShippingConfig,
}

impl HttpShipmentTracker {
    pub fn new(config: ShippingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

/// Map the provider's free-form current status onto our coarse enum.
fn map_status(raw: &str) -> ShipmentStatus {
    match raw.to_uppercase().as_str() {
        "DELIVERED" => ShipmentStatus::Delivered,
        "IN TRANSIT" | "IN_TRANSIT" | "SHIPPED" | "OUT FOR DELIVERY" | "PICKED UP" => {
            ShipmentStatus::InTransit
        }
        _ => ShipmentStatus::Unknown,
    }
}

#[async_trait]
impl ShipmentTracker for HttpShipmentTracker {
    async fn track(&self, shipment_ref: &str) -> Result<ShipmentStatus, DukanError> {
        if self.config.api_token.is_empty() {
            return Err(DukanError::Provider {
                message: "shipping api token not configured".to_string(),
                source: None,
            });
        }

        let url = format!(
            "{}/courier/track/shipment/{shipment_ref}",
            self.config.api_base.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| DukanError::Provider {
                message: format!("tracking request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let json: serde_json::Value =
            response.json().await.map_err(|e| DukanError::Provider {
                message: format!("tracking response unparseable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let current = json
            .get("tracking_data")
            .and_then(|d| d.get("shipment_track"))
            .and_then(|t| t.get(0))
            .and_then(|t| t.get("current_status"))
            .and_then(|s| s.as_str())
            .unwrap_or_default();

        Ok(map_status(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(map_status("DELIVERED"), ShipmentStatus::Delivered);
        assert_eq!(map_status("delivered"), ShipmentStatus::Delivered);
        assert_eq!(map_status("In Transit"), ShipmentStatus::InTransit);
        assert_eq!(map_status("OUT FOR DELIVERY"), ShipmentStatus::InTransit);
        assert_eq!(map_status("RTO INITIATED"), ShipmentStatus::Unknown);
        assert_eq!(map_status(""), ShipmentStatus::Unknown);
    }

    #[tokio::test]
    async fn missing_token_is_a_provider_error() {
        let tracker = HttpShipmentTracker::new(ShippingConfig {
            api_base: "https://track.example".into(),
            api_token: String::new(),
        });
        assert!(matches!(
            tracker.track("ship-1").await,
            Err(DukanError::Provider { .. })
        ));
    }
}
