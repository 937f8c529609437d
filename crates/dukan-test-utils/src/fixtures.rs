// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-database fixture with common seed helpers.

use std::sync::Arc;

use dukan_core::DukanError;
use dukan_storage::{Database, NewItem, NewShop};
use dukan_storage::queries::{items, shops};

/// A migrated SQLite database in a temp directory, dropped with the fixture.
pub struct TestDb {
    pub db: Arc<Database>,
    _dir: tempfile::TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self, DukanError> {
        let dir = tempfile::tempdir().map_err(|e| DukanError::Storage {
            source: Box::new(e),
        })?;
        let path = dir.path().join("test.db");
        let db = Database::open(&path.to_string_lossy()).await?;
        Ok(Self {
            db: Arc::new(db),
            _dir: dir,
        })
    }

    /// Seed a free-tier shop with a manual payment address.
    pub async fn seed_manual_shop(&self) -> Result<i64, DukanError> {
        shops::insert_shop(
            &self.db,
            &NewShop {
                name: "Test Shop".into(),
                seller_phone: Some("918888877777".into()),
                manual_payment_address: Some("testshop@upi".into()),
                ..Default::default()
            },
        )
        .await
    }

    /// Seed a pro-tier shop with sealed gateway credentials.
    pub async fn seed_gateway_shop(
        &self,
        key_id_sealed: &str,
        key_secret_sealed: &str,
    ) -> Result<i64, DukanError> {
        shops::insert_shop(
            &self.db,
            &NewShop {
                name: "Pro Shop".into(),
                seller_phone: Some("918888877777".into()),
                plan_tier: "pro".into(),
                active_method: "gateway".into(),
                gateway_key_id_sealed: Some(key_id_sealed.into()),
                gateway_key_secret_sealed: Some(key_secret_sealed.into()),
                manual_payment_address: Some("proshop@upi".into()),
                ..Default::default()
            },
        )
        .await
    }

    /// Seed a plain item with the given price and stock.
    pub async fn seed_item(
        &self,
        shop_id: i64,
        name: &str,
        price: f64,
        stock: i64,
    ) -> Result<i64, DukanError> {
        items::insert_item(
            &self.db,
            &NewItem {
                shop_id,
                name: name.into(),
                price,
                stock_count: stock,
                ..Default::default()
            },
        )
        .await
    }

    /// Seed an item with variant specs and priced variants (JSON literals).
    pub async fn seed_variant_item(
        &self,
        shop_id: i64,
        name: &str,
        price: f64,
        stock: i64,
        specs_json: &str,
        variants_json: &str,
    ) -> Result<i64, DukanError> {
        items::insert_item(
            &self.db,
            &NewItem {
                shop_id,
                name: name.into(),
                price,
                stock_count: stock,
                specs_json: Some(specs_json.into()),
                variants_json: Some(variants_json.into()),
                ..Default::default()
            },
        )
        .await
    }
}
