// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Dukan workspace.
//!
//! Monetary amounts are rupees as `f64` end to end; the payment gateway
//! boundary converts to integer paise (see [`to_minor_units`]).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a shopper (phone-equivalent string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShopperId(pub String);

impl ShopperId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for web hand-off display: last four digits only.
    pub fn masked(&self) -> String {
        let len = self.0.len();
        if len <= 4 {
            "*".repeat(len)
        } else {
            format!("{}{}", "*".repeat(6), &self.0[len - 4..])
        }
    }
}

impl std::fmt::Display for ShopperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of an order. `placed -> processing -> shipped -> delivered`,
/// with `cancelled` reachable from rejection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment lifecycle. Transitions are monotonic except explicit rejection
/// (`needs_approval -> failed`); once `paid`, no other writer may change it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    NeedsApproval,
    Paid,
    Failed,
}

/// The shopper's payment-method button choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentChoice {
    Cod,
    Online,
}

impl PaymentChoice {
    /// Button id as it appears on the wire (`pay_cod` / `pay_online`).
    pub fn button_id(self) -> &'static str {
        match self {
            PaymentChoice::Cod => "pay_cod",
            PaymentChoice::Online => "pay_online",
        }
    }

    pub fn from_button_id(id: &str) -> Option<Self> {
        match id {
            "pay_cod" => Some(PaymentChoice::Cod),
            "pay_online" => Some(PaymentChoice::Online),
            _ => None,
        }
    }
}

/// Merchant subscription tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
}

/// Which payment path the merchant selected in settings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodSetting {
    Gateway,
    #[default]
    Manual,
}

/// One line of a cart or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: i64,
    pub name: String,
    pub qty: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.qty)
    }
}

/// Total value of a set of line items.
pub fn cart_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_total).sum()
}

/// Convert a rupee amount to integer paise for provider APIs.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// A delivery address snapshot. Immutable once created; corrections insert
/// a new row and "current address" is the most recent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub shopper_id: String,
    pub house_no: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub created_at: String,
}

impl Address {
    /// Single-line display form, skipping empty components.
    pub fn display_line(&self) -> String {
        let parts = [
            self.house_no.as_str(),
            self.area.as_str(),
            self.city.as_str(),
            self.pincode.as_str(),
        ];
        parts
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Per-merchant payment configuration, read-only from the orchestrator's
/// perspective. Gateway credentials are stored sealed (hex of nonce ||
/// ciphertext) and only decrypted at use time.
#[derive(Debug, Clone)]
pub struct ShopPaymentConfig {
    pub shop_id: i64,
    pub shop_name: String,
    pub seller_phone: Option<String>,
    pub plan_tier: PlanTier,
    pub active_method: PaymentMethodSetting,
    pub gateway_key_id_sealed: Option<String>,
    pub gateway_key_secret_sealed: Option<String>,
    pub manual_payment_address: Option<String>,
}

/// A durable order row. Never deleted (financial record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
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
    pub provider_payment_id: Option<String>,
    pub payment_proof_ref: Option<String>,
    pub shipment_ref: Option<String>,
    pub review_requested: bool,
    pub created_at: String,
}

/// A configurable attribute of an item with variants (e.g. Size, Colour).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecAttr {
    pub name: String,
    pub options: Vec<String>,
}

/// A concrete priced variant, titled by joining the chosen options with
/// " / " (e.g. "Red / XL").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub title: String,
    pub price: f64,
}

/// A catalog item as seen by the checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub price: f64,
    pub stock_count: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub specs: Vec<SpecAttr>,
    pub variants: Vec<Variant>,
}

impl Item {
    pub fn has_variants(&self) -> bool {
        !self.specs.is_empty()
    }
}
