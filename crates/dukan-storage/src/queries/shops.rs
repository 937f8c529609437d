// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merchant settings reads. This orchestrator never writes shop rows;
//! `insert_shop` exists for seeding by merchant tooling and tests.

use std::str::FromStr;

use dukan_core::DukanError;
use dukan_core::types::{PaymentMethodSetting, PlanTier, ShopPaymentConfig};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{NewShop, UpsellSettings};

/// Read a shop's payment configuration.
pub async fn get_payment_config(
    db: &Database,
    shop_id: i64,
) -> Result<Option<ShopPaymentConfig>, DukanError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, seller_phone, plan_tier, active_method,
                        gateway_key_id_sealed, gateway_key_secret_sealed,
                        manual_payment_address
                 FROM shops WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![shop_id], |row| {
                let plan: String = row.get(3)?;
                let method: String = row.get(4)?;
                Ok(ShopPaymentConfig {
                    shop_id: row.get(0)?,
                    shop_name: row.get(1)?,
                    seller_phone: row.get(2)?,
                    plan_tier: PlanTier::from_str(&plan).unwrap_or_default(),
                    active_method: PaymentMethodSetting::from_str(&method).unwrap_or_default(),
                    gateway_key_id_sealed: row.get(5)?,
                    gateway_key_secret_sealed: row.get(6)?,
                    manual_payment_address: row.get(7)?,
                })
            });
            match result {
                Ok(config) => Ok(Some(config)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Read a shop's upsell settings.
pub async fn get_upsell_settings(
    db: &Database,
    shop_id: i64,
) -> Result<Option<UpsellSettings>, DukanError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT upsell_enabled, upsell_item_id, upsell_discount_pct
                 FROM shops WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![shop_id], |row| {
                Ok(UpsellSettings {
                    enabled: row.get::<_, i64>(0)? != 0,
                    item_id: row.get(1)?,
                    discount_pct: row.get(2)?,
                })
            });
            match result {
                Ok(settings) => Ok(Some(settings)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Seed one shop row and return its id.
pub async fn insert_shop(db: &Database, shop: &NewShop) -> Result<i64, DukanError> {
    let shop = shop.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO shops (name, seller_phone, plan_tier, active_method,
                                    gateway_key_id_sealed, gateway_key_secret_sealed,
                                    manual_payment_address, upsell_enabled, upsell_item_id,
                                    upsell_discount_pct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    shop.name,
                    shop.seller_phone,
                    if shop.plan_tier.is_empty() {
                        "free".to_string()
                    } else {
                        shop.plan_tier
                    },
                    if shop.active_method.is_empty() {
                        "manual".to_string()
                    } else {
                        shop.active_method
                    },
                    shop.gateway_key_id_sealed,
                    shop.gateway_key_secret_sealed,
                    shop.manual_payment_address,
                    shop.upsell_enabled as i64,
                    shop.upsell_item_id,
                    shop.upsell_discount_pct,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("shops_test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn payment_config_round_trips() {
        let (db, _dir) = setup_db().await;
        let id = insert_shop(
            &db,
            &NewShop {
                name: "Pro Shop".into(),
                seller_phone: Some("918888877777".into()),
                plan_tier: "pro".into(),
                active_method: "gateway".into(),
                gateway_key_id_sealed: Some("deadbeef".into()),
                gateway_key_secret_sealed: Some("cafebabe".into()),
                manual_payment_address: Some("proshop@upi".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let config = get_payment_config(&db, id).await.unwrap().unwrap();
        assert_eq!(config.shop_name, "Pro Shop");
        assert_eq!(config.plan_tier, PlanTier::Pro);
        assert_eq!(config.active_method, PaymentMethodSetting::Gateway);
        assert_eq!(config.manual_payment_address.as_deref(), Some("proshop@upi"));
    }

    #[tokio::test]
    async fn unknown_tier_defaults_to_free() {
        let (db, _dir) = setup_db().await;
        let id = insert_shop(
            &db,
            &NewShop {
                name: "Odd Shop".into(),
                plan_tier: "platinum".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let config = get_payment_config(&db, id).await.unwrap().unwrap();
        assert_eq!(config.plan_tier, PlanTier::Free);
        assert_eq!(config.active_method, PaymentMethodSetting::Manual);
    }

    #[tokio::test]
    async fn upsell_settings_round_trip() {
        let (db, _dir) = setup_db().await;
        let id = insert_shop(
            &db,
            &NewShop {
                name: "Upsell Shop".into(),
                upsell_enabled: true,
                upsell_item_id: Some(42),
                upsell_discount_pct: 15,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let settings = get_upsell_settings(&db, id).await.unwrap().unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.item_id, Some(42));
        assert_eq!(settings.discount_pct, 15);
    }

    #[tokio::test]
    async fn missing_shop_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_payment_config(&db, 99).await.unwrap().is_none());
        assert!(get_upsell_settings(&db, 99).await.unwrap().is_none());
    }
}
