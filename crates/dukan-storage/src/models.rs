// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Insert payloads and storage-local rows.
//!
//! The canonical entity types live in `dukan-core::types`; this module adds
//! the write-side payload structs and a few rows only the storage layer and
//! its direct callers see.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use dukan_core::types::{
    Address, Item, LineItem, Order, OrderStatus, PaymentChoice, PaymentStatus,
    ShopPaymentConfig,
};

/// Payload for inserting one order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub shopper_id: String,
    pub shop_id: i64,
    pub items: Vec<LineItem>,
    pub item_summary: String,
    pub quantity: u32,
    pub total_amount: f64,
    pub payment_choice: PaymentChoice,
    pub delivery_address: String,
    pub delivery_pincode: String,
    pub delivery_city: String,
    pub delivery_state: String,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
}

/// Payload for inserting one address row.
#[derive(Debug, Clone, Default)]
pub struct NewAddress {
    pub shopper_id: String,
    pub house_no: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Payload for seeding a shop row.
#[derive(Debug, Clone, Default)]
pub struct NewShop {
    pub name: String,
    pub seller_phone: Option<String>,
    pub plan_tier: String,
    pub active_method: String,
    pub gateway_key_id_sealed: Option<String>,
    pub gateway_key_secret_sealed: Option<String>,
    pub manual_payment_address: Option<String>,
    pub upsell_enabled: bool,
    pub upsell_item_id: Option<i64>,
    pub upsell_discount_pct: i64,
}

/// Payload for seeding an item row.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub shop_id: i64,
    pub name: String,
    pub price: f64,
    pub stock_count: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub specs_json: Option<String>,
    pub variants_json: Option<String>,
}

/// How a coupon discounts the subtotal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percent,
    Flat,
}

/// An active coupon row.
#[derive(Debug, Clone)]
pub struct Coupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: f64,
}

impl Coupon {
    /// Discount amount this coupon takes off the given subtotal.
    pub fn discount_on(&self, subtotal: f64) -> f64 {
        match self.discount_type {
            DiscountType::Percent => subtotal * self.value / 100.0,
            DiscountType::Flat => self.value,
        }
    }
}

/// Per-shop upsell settings.
#[derive(Debug, Clone)]
pub struct UpsellSettings {
    pub enabled: bool,
    pub item_id: Option<i64>,
    pub discount_pct: i64,
}
