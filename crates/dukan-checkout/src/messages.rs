// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message copy.
//!
//! All shopper-facing wording lives here so the engine reads as pure
//! transition logic. `*bold*` markers are the channel's formatting syntax.

use dukan_core::event::{Button, OutboundMessage};
use dukan_core::types::{Address, Item, SpecAttr};

use crate::classify::{
    CHANGE_ADDR_ID, CONFIRM_ADDR_PREFIX, RECOVER_CANCEL_ID, RECOVER_RESUME_ID,
};

/// Round rupee amounts print without a trailing `.0`.
pub fn fmt_amount(amount: f64) -> String {
    if (amount.fract()).abs() < f64::EPSILON {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

pub fn item_offer(item: &Item) -> OutboundMessage {
    let caption = format!(
        "🛍️ *{}*\n💰 Price: ₹{}\n\n{}\n\n🔢 Reply with the quantity you want (e.g. 1, 2, 5)",
        item.name,
        fmt_amount(item.price),
        item.description.as_deref().unwrap_or_default(),
    );
    match &item.image_url {
        Some(url) if url.starts_with("http") => OutboundMessage::Image {
            url: url.clone(),
            caption: Some(caption),
        },
        _ => OutboundMessage::Text(caption),
    }
}

pub fn spec_prompt(item_name: &str, spec: &SpecAttr) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🛒 *{}*\nSelect *{}*: {}",
        item_name,
        spec.name,
        spec.options.join(", ")
    ))
}

pub fn invalid_spec_choice(spec: &SpecAttr) -> OutboundMessage {
    OutboundMessage::text(format!(
        "❌ Invalid choice. Please pick one of: {}",
        spec.options.join(", ")
    ))
}

pub fn variant_resolved(variant_title: &str, price: f64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "✅ {variant_title}\n💰 Price: ₹{}\n\n🔢 How many would you like?",
        fmt_amount(price)
    ))
}

pub fn qty_not_numeric() -> OutboundMessage {
    OutboundMessage::text("🔢 Please reply with just a number (e.g. 1, 2, 5).")
}

pub fn qty_minimum() -> OutboundMessage {
    OutboundMessage::text("⚠️ Minimum quantity is 1.")
}

/// Over-stock rejection. Quotes the live count verbatim so the shopper can
/// retry with the maximum.
pub fn stock_short(stock: i64) -> OutboundMessage {
    OutboundMessage::text(format!("⚠️ Only *{stock}* left. Reply *{stock}* to take all!"))
}

pub fn sold_out(item_name: &str) -> OutboundMessage {
    OutboundMessage::text(format!("😢 Sorry, *{item_name}* is sold out."))
}

pub fn item_not_found() -> OutboundMessage {
    OutboundMessage::text("❌ This item is discontinued or no longer available.")
}

pub fn session_expired() -> OutboundMessage {
    OutboundMessage::text("⚠️ That checkout has expired. Browse the shop to start again.")
}

pub fn cart_summary(lines: &str, subtotal: f64, discount: f64, total: f64) -> String {
    let mut msg = format!("🧾 *Order Summary*\n------------------\n{lines}------------------\n");
    msg.push_str(&format!("📝 Subtotal: ₹{}\n", fmt_amount(subtotal)));
    if discount > 0.0 {
        msg.push_str(&format!("🏷️ Discount: -₹{}\n", fmt_amount(discount)));
    }
    msg.push_str(&format!("💰 *Total: ₹{}*", fmt_amount(total)));
    msg
}

pub fn confirm_address(addr: &Address) -> OutboundMessage {
    OutboundMessage::buttons(
        format!("📍 *Confirm Delivery Address:*\n\n{}", addr.display_line()),
        vec![
            Button::new(format!("{CONFIRM_ADDR_PREFIX}{}", addr.id), "✅ Yes, Ship Here"),
            Button::new(CHANGE_ADDR_ID, "✏️ Change Address"),
        ],
    )
}

pub fn handoff_link(url: &str) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🚚 *Shipping Details Needed*\nFill in your address securely here:\n\n🔗 {url}\n\n_This link expires in 10 minutes._"
    ))
}

pub fn manual_address_prompt() -> OutboundMessage {
    OutboundMessage::text(
        "🚚 *Shipping Details Needed*\n\nPlease type your address in this format:\n\n👉 *Pincode, House No, City*\n_(Example: 400050, Flat 101, Mumbai)_",
    )
}

pub fn manual_address_invalid() -> OutboundMessage {
    OutboundMessage::text("⚠️ Format: *Pincode, House No, City* (pincode is 6 digits)")
}

pub fn payment_method_prompt(total: f64) -> OutboundMessage {
    OutboundMessage::buttons(
        format!(
            "✅ Address confirmed!\n💰 *Total: ₹{}*\nSelect payment method:",
            fmt_amount(total)
        ),
        vec![
            Button::new("pay_online", "Pay Online"),
            Button::new("pay_cod", "Cash on Delivery"),
        ],
    )
}

pub fn cod_confirmed(order_id: i64, summary: &str, total: f64, city: &str) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🎉 *Order Placed!*\n🆔 Order #{order_id}\n📦 {summary}\n💰 Total: ₹{}\n📍 Ship to: {city}\n\nWe will update you when it ships! 🚚",
        fmt_amount(total)
    ))
}

pub fn gateway_link(order_id: i64, total: f64, url: &str) -> OutboundMessage {
    OutboundMessage::text(format!(
        "💳 *Complete Your Payment*\n🆔 Order #{order_id}\n💰 Amount: ₹{}\n\n👇 *Tap to pay securely:*\n{url}\n\n_(Your order confirms automatically after payment)_",
        fmt_amount(total)
    ))
}

pub fn manual_pay(total: f64, pay_address: &str) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🏦 *Direct Payment*\nAmount: ₹{}\nPay to: *{pay_address}*\n\n⚠️ After paying, send a *screenshot* here to confirm.",
        fmt_amount(total)
    ))
}

pub fn choose_cod() -> OutboundMessage {
    OutboundMessage::text(
        "❌ Online payment is not available for this shop right now. Please choose Cash on Delivery.",
    )
}

pub fn proof_received(order_id: i64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🙏 Thanks! Your payment proof for Order #{order_id} is being verified. We will confirm shortly."
    ))
}

pub fn seller_new_order(order_id: i64, total: f64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🚨 *New order!* #{order_id} — ₹{}",
        fmt_amount(total)
    ))
}

pub fn seller_proof_submitted(order_id: i64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🧾 Payment proof submitted for Order #{order_id}. Review it in your dashboard to approve or reject."
    ))
}

pub fn payment_approved(order_id: i64) -> OutboundMessage {
    OutboundMessage::text(format!("🎉 Payment verified! Order #{order_id} is confirmed."))
}

pub fn payment_rejected(order_id: i64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "⚠️ Payment for Order #{order_id} could not be verified. Please contact the seller."
    ))
}

pub fn recovery_nudge(item_count: usize, total: f64) -> OutboundMessage {
    let item_word = if item_count == 1 { "item" } else { "items" };
    OutboundMessage::buttons(
        format!(
            "👋 *You forgot something!*\nYour *{item_count} {item_word}* (₹{}) are still reserved, but stock is limited. 🏃",
            fmt_amount(total)
        ),
        vec![
            Button::new(RECOVER_RESUME_ID, "Resume Checkout"),
            Button::new(RECOVER_CANCEL_ID, "Empty Cart"),
        ],
    )
}

pub fn cart_cleared() -> OutboundMessage {
    OutboundMessage::text("❌ Cart cleared.")
}

pub fn review_prompt() -> OutboundMessage {
    OutboundMessage::text(
        "📦 *Delivered!* We hope you love your order.\n\n⭐ How would you rate your experience?\nReply with a number *1 to 5*.",
    )
}

pub fn review_thanks() -> OutboundMessage {
    OutboundMessage::text("❤️ Thank you for the rating!")
}

pub fn review_invalid() -> OutboundMessage {
    OutboundMessage::text("⭐ Please reply with a number from *1 to 5*.")
}

pub fn upsell_pitch(name: &str, original: f64, offer: f64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🔥 *One-Time Offer*\nSince you just ordered, you unlocked a deal on:\n📦 *{name}*\n❌ ₹{}\n✅ *₹{}* (only for you!)\n\n👇 Reply *YES* to add it to your shipment.",
        fmt_amount(original),
        fmt_amount(offer)
    ))
}

pub fn upsell_added(name: &str, price: f64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "🎉 Added *{name}* for ₹{} to your shipment.",
        fmt_amount(price)
    ))
}

pub fn upsell_declined() -> OutboundMessage {
    OutboundMessage::text("No problem! Your original order is on its way. ✅")
}

pub fn bulk_cart_empty() -> OutboundMessage {
    OutboundMessage::text("❌ None of those items are available any more. Please rebuild your cart.")
}

pub fn proof_reminder() -> OutboundMessage {
    OutboundMessage::text(
        "📸 Please send a *screenshot* of your payment (or paste the transaction reference).",
    )
}

pub fn gateway_pending(order_id: i64) -> OutboundMessage {
    OutboundMessage::text(format!(
        "⏳ Your payment link for Order #{order_id} is still open. Your order confirms automatically once you pay."
    ))
}

pub fn seller_upsell_converted(order_id: i64) -> OutboundMessage {
    OutboundMessage::text(format!("🔥 *Upsell converted!* Order #{order_id}"))
}

pub fn idle_help() -> OutboundMessage {
    OutboundMessage::text("👋 Hi! Browse the shop and tap *Buy* on any item to order here.")
}
