// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event normalization and intent classification.
//!
//! [`parse_envelope`] extracts a channel-agnostic [`InboundEvent`] from the
//! provider's webhook payload (status-update deliveries carry no messages
//! and yield `None`). [`classify`] maps an event onto the closed [`Intent`]
//! set the state machine dispatches on.

use std::sync::LazyLock;

use dukan_core::event::{EventKind, InboundEvent};
use dukan_core::types::{PaymentChoice, ShopperId};
use regex::Regex;

/// Marker embedded in the chat deep link a web hand-off redirects back to.
pub const HANDOFF_RETURN_MARKER: &str = "Address_Confirmed_for_";

/// Button id prefix for confirming a saved address.
pub const CONFIRM_ADDR_PREFIX: &str = "CONFIRM_ADDR_";
/// Button id for requesting an address change.
pub const CHANGE_ADDR_ID: &str = "CHANGE_ADDR";
/// Button id for resuming an abandoned checkout.
pub const RECOVER_RESUME_ID: &str = "recover_checkout";
/// Button id for emptying an abandoned cart.
pub const RECOVER_CANCEL_ID: &str = "recover_cancel";

static BUY_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"buy_item_(\d+)").expect("static regex"));
static BUY_BULK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"buy_bulk_([\d:,]+)(?:_COUPON:([A-Za-z0-9]+))?").expect("static regex"));

/// What an inbound event asks the state machine to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Storefront hand-off for a single item.
    BuyItem(i64),
    /// Storefront hand-off for a multi-item cart, optionally with a coupon.
    BuyBulk {
        entries: Vec<(i64, u32)>,
        coupon: Option<String>,
    },
    /// The shopper returned from the web address hand-off.
    HandoffReturn,
    /// Confirmed the saved address shown on a button.
    AddressConfirmed(i64),
    /// Asked to change / add a delivery address.
    ChangeAddress,
    /// Picked a payment method button.
    Payment(PaymentChoice),
    /// Resume an abandoned checkout (recovery nudge button).
    RecoverResume,
    /// Empty the abandoned cart (recovery nudge button).
    RecoverCancel,
    /// Structured address form submission.
    FormAddress(serde_json::Value),
    /// Image upload (payment proof on the manual path).
    ImageUpload(String),
    /// Free text, interpreted against the current state.
    FreeText(String),
    /// A button id we do not recognize (stale or foreign context).
    UnknownButton(String),
}

/// Map an event's content onto an [`Intent`].
pub fn classify(kind: &EventKind) -> Intent {
    match kind {
        EventKind::Text(text) => classify_text(text.trim()),
        EventKind::ButtonReply { id, .. } => classify_button(id),
        EventKind::FormReply(json) => Intent::FormAddress(json.clone()),
        EventKind::Image { media_id } => Intent::ImageUpload(media_id.clone()),
    }
}

fn classify_text(text: &str) -> Intent {
    if text.contains(HANDOFF_RETURN_MARKER) {
        return Intent::HandoffReturn;
    }
    if let Some(caps) = BUY_BULK_RE.captures(text) {
        let entries = parse_bulk_entries(&caps[1]);
        if !entries.is_empty() {
            let coupon = caps.get(2).map(|m| m.as_str().to_uppercase());
            return Intent::BuyBulk { entries, coupon };
        }
    }
    if let Some(caps) = BUY_ITEM_RE.captures(text)
        && let Ok(id) = caps[1].parse::<i64>()
    {
        return Intent::BuyItem(id);
    }
    Intent::FreeText(text.to_string())
}

fn classify_button(id: &str) -> Intent {
    if let Some(raw) = id.strip_prefix(CONFIRM_ADDR_PREFIX) {
        return match raw.parse::<i64>() {
            Ok(addr_id) => Intent::AddressConfirmed(addr_id),
            Err(_) => Intent::UnknownButton(id.to_string()),
        };
    }
    if id == CHANGE_ADDR_ID {
        return Intent::ChangeAddress;
    }
    if let Some(choice) = PaymentChoice::from_button_id(id) {
        return Intent::Payment(choice);
    }
    match id {
        RECOVER_RESUME_ID => Intent::RecoverResume,
        RECOVER_CANCEL_ID => Intent::RecoverCancel,
        _ => Intent::UnknownButton(id.to_string()),
    }
}

fn parse_bulk_entries(raw: &str) -> Vec<(i64, u32)> {
    raw.split(',')
        .filter_map(|entry| {
            let (id, qty) = entry.split_once(':')?;
            let id = id.parse::<i64>().ok()?;
            let qty = qty.parse::<u32>().ok()?;
            (qty > 0).then_some((id, qty))
        })
        .collect()
}

/// Parse the provider webhook envelope into a normalized event.
///
/// Returns `None` for payloads that carry no actionable message (delivery
/// receipts, read statuses, unsupported content types) -- those are
/// acknowledged and dropped at the ingestion boundary.
pub fn parse_envelope(payload: &serde_json::Value) -> Option<InboundEvent> {
    let value = payload
        .get("entry")?
        .get(0)?
        .get("changes")?
        .get(0)?
        .get("value")?;

    // Status updates (sent/delivered/read) have no "messages" array.
    let msg = value.get("messages")?.get(0)?;
    let sender = ShopperId(msg.get("from")?.as_str()?.to_string());

    let kind = match msg.get("type")?.as_str()? {
        "text" => EventKind::Text(msg.get("text")?.get("body")?.as_str()?.to_string()),
        "image" => EventKind::Image {
            media_id: msg.get("image")?.get("id")?.as_str()?.to_string(),
        },
        "interactive" => {
            let interactive = msg.get("interactive")?;
            match interactive.get("type")?.as_str()? {
                "button_reply" => {
                    let reply = interactive.get("button_reply")?;
                    EventKind::ButtonReply {
                        id: reply.get("id")?.as_str()?.to_string(),
                        title: reply
                            .get("title")
                            .and_then(|t| t.as_str())
                            .unwrap_or_default()
                            .to_string(),
                    }
                }
                "nfm_reply" => {
                    let raw = interactive.get("nfm_reply")?.get("response_json")?.as_str()?;
                    EventKind::FormReply(serde_json::from_str(raw).ok()?)
                }
                _ => return None,
            }
        }
        _ => return None,
    };

    Some(InboundEvent { sender, kind })
}
