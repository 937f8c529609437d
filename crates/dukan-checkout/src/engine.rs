// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The checkout state machine.
//!
//! Given (current session state, classified intent), produces a new session
//! state plus side effects: outbound messages, order writes, and payment
//! routing. The whole read-decide-write cycle for one event runs under the
//! shopper's session lock, so duplicate webhook deliveries and rapid
//! double-taps serialize instead of interleaving.
//!
//! Errors never propagate to the ingestion boundary: [`CheckoutEngine::process`]
//! degrades every failure to acknowledge-and-log, because the upstream
//! channel has no way to display one and would retry indefinitely.

use std::sync::Arc;

use dukan_core::event::{InboundEvent, OutboundMessage};
use dukan_core::types::{Address, Item, LineItem, PaymentChoice, ShopperId};
use dukan_core::{DukanError, MessageSender, PaymentGateway};
use dukan_session::{CheckoutContext, Session, SessionState, SessionStore, TokenIssuer};
use dukan_storage::Database;
use dukan_storage::queries::{addresses, coupons, items, orders, reviews, shops};
use tracing::{debug, info, warn};

use crate::classify::{Intent, classify};
use crate::finalize;
use crate::messages;
use crate::route::{self, PaymentRoute};
use crate::upsell;

/// Engine-level configuration.
#[derive(Clone, Default)]
pub struct EngineConfig {
    /// Public base URL for checkout hand-off links. Empty disables the web
    /// hand-off and falls back to manual free-text address capture.
    pub public_base_url: String,
    /// Master key for unsealing merchant gateway credentials.
    pub master_key: Option<[u8; 32]>,
}

/// The session/state orchestrator.
pub struct CheckoutEngine {
    store: Arc<SessionStore>,
    tokens: Arc<TokenIssuer>,
    db: Arc<Database>,
    sender: Arc<dyn MessageSender>,
    gateway: Arc<dyn PaymentGateway>,
    config: EngineConfig,
}

impl CheckoutEngine {
    pub fn new(
        store: Arc<SessionStore>,
        tokens: Arc<TokenIssuer>,
        db: Arc<Database>,
        sender: Arc<dyn MessageSender>,
        gateway: Arc<dyn PaymentGateway>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            db,
            sender,
            gateway,
            config,
        }
    }

    pub fn store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.store)
    }

    /// Handle one inbound event. Always acknowledges: failures are logged
    /// and the event is dropped rather than surfaced upstream.
    pub async fn process(&self, event: InboundEvent) {
        let shopper = event.sender.clone();
        let intent = classify(&event.kind);
        debug!(shopper = %shopper, ?intent, "dispatching inbound event");

        let _guard = self.store.lock(&shopper).await;
        if let Err(e) = self.dispatch(&shopper, intent).await {
            warn!(shopper = %shopper, error = %e, "event handling degraded to no-op");
        }
    }

    async fn dispatch(&self, shopper: &ShopperId, intent: Intent) -> Result<(), DukanError> {
        match intent {
            Intent::BuyItem(item_id) => self.start_single(shopper, item_id).await,
            Intent::BuyBulk { entries, coupon } => {
                self.start_bulk(shopper, entries, coupon).await
            }
            Intent::HandoffReturn => self.resume_after_handoff(shopper).await,
            Intent::AddressConfirmed(addr_id) => {
                self.confirm_saved_address(shopper, addr_id).await
            }
            Intent::ChangeAddress => self.request_address_change(shopper).await,
            Intent::Payment(choice) => self.handle_payment_choice(shopper, choice).await,
            Intent::RecoverResume => self.resume_checkout(shopper).await,
            Intent::RecoverCancel => {
                self.store.clear(shopper);
                self.send(shopper, messages::cart_cleared()).await;
                Ok(())
            }
            Intent::FormAddress(json) => self.handle_form_address(shopper, json).await,
            Intent::ImageUpload(media_id) => self.handle_proof(shopper, media_id).await,
            Intent::FreeText(text) => self.handle_free_text(shopper, &text).await,
            Intent::UnknownButton(id) => {
                debug!(shopper = %shopper, button = %id, "stale or unknown button id");
                self.reprompt(shopper).await
            }
        }
    }

    // --- Entry points -----------------------------------------------------

    async fn start_single(&self, shopper: &ShopperId, item_id: i64) -> Result<(), DukanError> {
        let Some(item) = items::get_item(&self.db, item_id).await? else {
            self.send(shopper, messages::item_not_found()).await;
            return Ok(());
        };
        if item.stock_count <= 0 {
            self.send(shopper, messages::sold_out(&item.name)).await;
            return Ok(());
        }

        if item.has_variants() {
            let first_spec = item.specs[0].clone();
            let prompt = messages::spec_prompt(&item.name, &first_spec);
            self.store.set(
                shopper,
                Session::with_state(SessionState::AwaitingSelection {
                    item,
                    step_index: 0,
                    chosen: Vec::new(),
                }),
            );
            self.send(shopper, prompt).await;
        } else {
            let offer = messages::item_offer(&item);
            let unit_price = item.price;
            self.store.set(
                shopper,
                Session::with_state(SessionState::AwaitingQty {
                    item,
                    unit_price,
                    variant_title: None,
                }),
            );
            self.send(shopper, offer).await;
        }
        Ok(())
    }

    async fn start_bulk(
        &self,
        shopper: &ShopperId,
        entries: Vec<(i64, u32)>,
        coupon: Option<String>,
    ) -> Result<(), DukanError> {
        let mut cart = Vec::new();
        let mut subtotal = 0.0;
        let mut shop_id = None;
        let mut lines = String::new();

        for (item_id, qty) in entries {
            let Some(item) = items::get_item(&self.db, item_id).await? else {
                continue;
            };
            subtotal += item.price * f64::from(qty);
            shop_id = Some(item.shop_id);
            lines.push_str(&format!("• {} x{qty}\n", item.name));
            cart.push(LineItem {
                item_id,
                name: item.name,
                qty,
                unit_price: item.price,
            });
        }

        let Some(shop_id) = shop_id else {
            self.send(shopper, messages::bulk_cart_empty()).await;
            return Ok(());
        };

        let mut discount = 0.0;
        if let Some(code) = coupon {
            match coupons::find_active(&self.db, shop_id, &code).await? {
                Some(coupon) => {
                    discount = coupon.discount_on(subtotal);
                    info!(shop_id, code = %coupon.code, discount, "coupon applied");
                }
                None => debug!(shop_id, code = %code, "coupon invalid or inactive"),
            }
        }
        let total = (subtotal - discount).max(0.0);

        self.send(
            shopper,
            OutboundMessage::Text(messages::cart_summary(&lines, subtotal, discount, total)),
        )
        .await;

        let checkout = CheckoutContext {
            shop_id,
            cart,
            total,
            address_id: None,
        };
        self.address_checkpoint(shopper, checkout).await
    }

    // --- Variant drilldown ------------------------------------------------

    async fn drilldown_step(
        &self,
        shopper: &ShopperId,
        item: Item,
        step_index: usize,
        mut chosen: Vec<(String, String)>,
        reply: &str,
    ) -> Result<(), DukanError> {
        let Some(spec) = item.specs.get(step_index) else {
            // The item's attribute list shrank (catalog edited mid-conversation).
            self.store.clear(shopper);
            self.send(shopper, messages::session_expired()).await;
            return Ok(());
        };

        let normalized = reply.trim().to_lowercase();
        let Some(value) = spec
            .options
            .iter()
            .find(|option| option.trim().to_lowercase() == normalized)
            .cloned()
        else {
            self.send(shopper, messages::invalid_spec_choice(spec)).await;
            return Ok(());
        };

        chosen.push((spec.name.clone(), value));

        if step_index + 1 < item.specs.len() {
            let next = item.specs[step_index + 1].clone();
            let prompt = messages::spec_prompt(&item.name, &next);
            self.store.set(
                shopper,
                Session::with_state(SessionState::AwaitingSelection {
                    item,
                    step_index: step_index + 1,
                    chosen,
                }),
            );
            self.send(shopper, prompt).await;
        } else {
            let title = chosen
                .iter()
                .map(|(_, value)| value.as_str())
                .collect::<Vec<_>>()
                .join(" / ");
            // Exact variant match or fall back to the base price.
            let price = item
                .variants
                .iter()
                .find(|variant| variant.title == title && variant.price > 0.0)
                .map(|variant| variant.price)
                .unwrap_or(item.price);

            let prompt = messages::variant_resolved(&title, price);
            self.store.set(
                shopper,
                Session::with_state(SessionState::AwaitingQty {
                    item,
                    unit_price: price,
                    variant_title: Some(title),
                }),
            );
            self.send(shopper, prompt).await;
        }
        Ok(())
    }

    // --- Quantity ---------------------------------------------------------

    async fn qty_step(
        &self,
        shopper: &ShopperId,
        item: Item,
        unit_price: f64,
        variant_title: Option<String>,
        reply: &str,
    ) -> Result<(), DukanError> {
        let Ok(qty) = reply.trim().parse::<u32>() else {
            self.send(shopper, messages::qty_not_numeric()).await;
            return Ok(());
        };
        if qty < 1 {
            self.send(shopper, messages::qty_minimum()).await;
            return Ok(());
        }

        // Re-read live stock; the cached item may be stale.
        let Some(live) = items::get_item(&self.db, item.id).await? else {
            self.store.clear(shopper);
            self.send(shopper, messages::session_expired()).await;
            return Ok(());
        };
        if live.stock_count == 0 {
            self.store.clear(shopper);
            self.send(shopper, messages::sold_out(&live.name)).await;
            return Ok(());
        }
        if i64::from(qty) > live.stock_count {
            self.send(shopper, messages::stock_short(live.stock_count)).await;
            return Ok(());
        }

        let display_name = match &variant_title {
            Some(title) => format!("{} ({title})", item.name),
            None => item.name.clone(),
        };
        let checkout = CheckoutContext {
            shop_id: item.shop_id,
            cart: vec![LineItem {
                item_id: item.id,
                name: display_name,
                qty,
                unit_price,
            }],
            total: unit_price * f64::from(qty),
            address_id: None,
        };
        self.address_checkpoint(shopper, checkout).await
    }

    // --- Address collection -----------------------------------------------

    /// The address checkpoint: confirm a saved address or start capture.
    async fn address_checkpoint(
        &self,
        shopper: &ShopperId,
        checkout: CheckoutContext,
    ) -> Result<(), DukanError> {
        match addresses::latest_for_shopper(&self.db, shopper.as_str()).await? {
            Some(addr) => {
                let prompt = messages::confirm_address(&addr);
                self.store.set(
                    shopper,
                    Session::with_state(SessionState::AwaitingAddress { checkout }),
                );
                self.send(shopper, prompt).await;
            }
            None => self.begin_address_capture(shopper, checkout).await,
        }
        Ok(())
    }

    /// Start address capture: web hand-off when a public base URL is
    /// configured, manual free-text fallback otherwise.
    async fn begin_address_capture(&self, shopper: &ShopperId, checkout: CheckoutContext) {
        if self.config.public_base_url.is_empty() {
            self.store.set(
                shopper,
                Session::with_state(SessionState::AwaitingManualAddress { checkout }),
            );
            self.send(shopper, messages::manual_address_prompt()).await;
        } else {
            let token = self.tokens.issue(shopper).await;
            let url = format!(
                "{}/checkout/{token}",
                self.config.public_base_url.trim_end_matches('/')
            );
            self.store.set(
                shopper,
                Session::with_state(SessionState::AwaitingAddress { checkout }),
            );
            self.send(shopper, messages::handoff_link(&url)).await;
        }
    }

    async fn confirm_saved_address(
        &self,
        shopper: &ShopperId,
        addr_id: i64,
    ) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        let SessionState::AwaitingAddress { checkout } = session.state else {
            self.send(shopper, messages::session_expired()).await;
            return Ok(());
        };

        // Button ids can outlive the data they reference; validate against
        // the current persisted address, never trust the id blindly.
        match addresses::latest_for_shopper(&self.db, shopper.as_str()).await? {
            Some(addr) if addr.id == addr_id => {
                self.advance_to_payment(shopper, checkout, addr.id).await
            }
            Some(current) => {
                debug!(shopper = %shopper, stale = addr_id, current = current.id, "stale address confirmation");
                let prompt = messages::confirm_address(&current);
                self.store.set(
                    shopper,
                    Session::with_state(SessionState::AwaitingAddress { checkout }),
                );
                self.send(shopper, prompt).await;
                Ok(())
            }
            None => {
                self.begin_address_capture(shopper, checkout).await;
                Ok(())
            }
        }
    }

    async fn request_address_change(&self, shopper: &ShopperId) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        match session.state {
            SessionState::AwaitingAddress { checkout }
            | SessionState::AwaitingManualAddress { checkout }
            | SessionState::AwaitingPaymentMethod { checkout } => {
                self.begin_address_capture(shopper, checkout).await;
                Ok(())
            }
            _ => {
                self.send(shopper, messages::session_expired()).await;
                Ok(())
            }
        }
    }

    /// The shopper came back from the web hand-off with the confirmation
    /// marker; the new address row is already persisted.
    async fn resume_after_handoff(&self, shopper: &ShopperId) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        let checkout = match session.state {
            SessionState::AwaitingAddress { checkout }
            | SessionState::AwaitingManualAddress { checkout }
            | SessionState::AwaitingPaymentMethod { checkout } => checkout,
            _ => {
                self.send(shopper, messages::session_expired()).await;
                return Ok(());
            }
        };

        match addresses::latest_for_shopper(&self.db, shopper.as_str()).await? {
            Some(addr) => self.advance_to_payment(shopper, checkout, addr.id).await,
            None => {
                // Marker without a stored address; restart capture.
                self.begin_address_capture(shopper, checkout).await;
                Ok(())
            }
        }
    }

    async fn handle_form_address(
        &self,
        shopper: &ShopperId,
        form: serde_json::Value,
    ) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        let checkout = match session.state {
            SessionState::AwaitingAddress { checkout }
            | SessionState::AwaitingManualAddress { checkout } => checkout,
            _ => {
                self.send(shopper, messages::session_expired()).await;
                return Ok(());
            }
        };

        let field = |name: &str| {
            form.get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let pincode = field("pincode");
        if !is_valid_pincode(&pincode) {
            // Stored state is untouched; just re-prompt.
            self.send(shopper, messages::manual_address_invalid()).await;
            return Ok(());
        }

        let addr_id = addresses::insert_address(
            &self.db,
            &dukan_storage::NewAddress {
                shopper_id: shopper.0.clone(),
                house_no: field("house_no"),
                area: field("area"),
                city: field("city"),
                state: field("state"),
                pincode,
            },
        )
        .await?;

        self.advance_to_payment(shopper, checkout, addr_id).await
    }

    async fn manual_address_step(
        &self,
        shopper: &ShopperId,
        checkout: CheckoutContext,
        reply: &str,
    ) -> Result<(), DukanError> {
        let parts: Vec<&str> = reply.split(',').map(str::trim).collect();
        if parts.len() < 2 || !is_valid_pincode(parts[0]) {
            // Re-prompt in place; stored state unchanged.
            self.send(shopper, messages::manual_address_invalid()).await;
            return Ok(());
        }

        let addr_id = addresses::insert_address(
            &self.db,
            &dukan_storage::NewAddress {
                shopper_id: shopper.0.clone(),
                house_no: parts[1].to_string(),
                area: String::new(),
                city: parts.get(2).copied().unwrap_or_default().to_string(),
                state: String::new(),
                pincode: parts[0].to_string(),
            },
        )
        .await?;

        self.advance_to_payment(shopper, checkout, addr_id).await
    }

    async fn advance_to_payment(
        &self,
        shopper: &ShopperId,
        mut checkout: CheckoutContext,
        addr_id: i64,
    ) -> Result<(), DukanError> {
        checkout.address_id = Some(addr_id);
        let total = checkout.display_total();
        self.store.set(
            shopper,
            Session::with_state(SessionState::AwaitingPaymentMethod { checkout }),
        );
        self.send(shopper, messages::payment_method_prompt(total)).await;
        Ok(())
    }

    // --- Finalization -----------------------------------------------------

    async fn handle_payment_choice(
        &self,
        shopper: &ShopperId,
        choice: PaymentChoice,
    ) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        let SessionState::AwaitingPaymentMethod { checkout } = session.state else {
            // Duplicate tap after the transition already fired, or a stale
            // button from an older conversation.
            return self.reprompt(shopper).await;
        };

        let Some(address) = self.resolve_address(shopper, &checkout).await? else {
            self.begin_address_capture(shopper, checkout).await;
            return Ok(());
        };

        let Some(shop) = shops::get_payment_config(&self.db, checkout.shop_id).await? else {
            warn!(shop_id = checkout.shop_id, "shop configuration missing at finalize");
            self.store.clear(shopper);
            self.send(shopper, messages::session_expired()).await;
            return Ok(());
        };

        let order_id =
            finalize::create_order(&self.db, shopper, &checkout, choice, &address).await?;
        let total = checkout.display_total();
        let (summary, _) = finalize::summarize(&checkout.cart);

        let routed = route::select_route(
            self.gateway.as_ref(),
            self.config.master_key.as_ref(),
            &shop,
            choice,
            order_id,
            total,
            shopper,
        )
        .await;

        match routed {
            PaymentRoute::CodConfirmed => {
                self.store.clear(shopper);
                self.send(
                    shopper,
                    messages::cod_confirmed(order_id, &summary, total, &address.city),
                )
                .await;
                self.notify_seller(&shop, messages::seller_new_order(order_id, total))
                    .await;
                upsell::maybe_trigger(
                    &self.db,
                    &self.store,
                    self.sender.as_ref(),
                    shopper,
                    checkout.shop_id,
                    order_id,
                )
                .await?;
            }
            PaymentRoute::GatewayLink(link) => {
                self.store.set(
                    shopper,
                    Session::with_state(SessionState::AwaitingGatewayConfirm {
                        order_id,
                        shop_id: checkout.shop_id,
                    }),
                );
                self.send(shopper, messages::gateway_link(order_id, total, &link.short_url))
                    .await;
            }
            PaymentRoute::ManualProof { pay_address } => {
                self.store.set(
                    shopper,
                    Session::with_state(SessionState::AwaitingScreenshot {
                        order_id,
                        shop_id: checkout.shop_id,
                    }),
                );
                self.send(shopper, messages::manual_pay(total, &pay_address)).await;
            }
            PaymentRoute::NoPathAvailable => {
                // The provisional order has no usable payment path; void it
                // and steer the shopper back to COD.
                orders::reject_payment(&self.db, order_id).await?;
                self.store.set(
                    shopper,
                    Session::with_state(SessionState::AwaitingPaymentMethod { checkout }),
                );
                self.send(shopper, messages::choose_cod()).await;
            }
        }
        Ok(())
    }

    /// Resolve the delivery address for a finalize call: the id captured in
    /// context (validated against ownership) or the shopper's current row.
    async fn resolve_address(
        &self,
        shopper: &ShopperId,
        checkout: &CheckoutContext,
    ) -> Result<Option<Address>, DukanError> {
        if let Some(addr_id) = checkout.address_id
            && let Some(addr) = addresses::get_address(&self.db, addr_id).await?
            && addr.shopper_id == shopper.as_str()
        {
            return Ok(Some(addr));
        }
        addresses::latest_for_shopper(&self.db, shopper.as_str()).await
    }

    // --- Proof, review, recovery, fallthrough ------------------------------

    async fn handle_proof(&self, shopper: &ShopperId, proof_ref: String) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        let SessionState::AwaitingScreenshot { order_id, shop_id } = session.state else {
            return self.reprompt(shopper).await;
        };

        let recorded = orders::mark_needs_approval(&self.db, order_id, proof_ref).await?;
        if !recorded {
            debug!(order_id, "proof arrived after the payment was already decided");
        }
        self.store.clear(shopper);
        self.send(shopper, messages::proof_received(order_id)).await;

        if let Some(shop) = shops::get_payment_config(&self.db, shop_id).await? {
            self.notify_seller(&shop, messages::seller_proof_submitted(order_id))
                .await;
        }
        Ok(())
    }

    async fn review_step(
        &self,
        shopper: &ShopperId,
        order_id: i64,
        shop_id: i64,
        reply: &str,
    ) -> Result<(), DukanError> {
        let rating = reply.trim().parse::<u8>().ok().filter(|r| (1..=5).contains(r));
        let Some(rating) = rating else {
            self.send(shopper, messages::review_invalid()).await;
            return Ok(());
        };

        reviews::insert_review(&self.db, order_id, shop_id, shopper.as_str(), rating).await?;
        info!(order_id, rating, "review captured");
        self.store.clear(shopper);
        self.send(shopper, messages::review_thanks()).await;
        Ok(())
    }

    /// Recovery "resume" button: put the shopper back at the right prompt.
    async fn resume_checkout(&self, shopper: &ShopperId) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        match session.state {
            SessionState::AwaitingAddress { checkout }
            | SessionState::AwaitingManualAddress { checkout }
            | SessionState::AwaitingPaymentMethod { checkout } => {
                self.address_checkpoint(shopper, checkout).await
            }
            SessionState::AwaitingQty { item, .. } => {
                let offer = messages::item_offer(&item);
                self.send(shopper, offer).await;
                Ok(())
            }
            _ => {
                self.send(shopper, messages::session_expired()).await;
                Ok(())
            }
        }
    }

    async fn handle_free_text(&self, shopper: &ShopperId, text: &str) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        match session.state {
            SessionState::AwaitingSelection {
                item,
                step_index,
                chosen,
            } => self.drilldown_step(shopper, item, step_index, chosen, text).await,
            SessionState::AwaitingQty {
                item,
                unit_price,
                variant_title,
            } => self.qty_step(shopper, item, unit_price, variant_title, text).await,
            SessionState::AwaitingManualAddress { checkout } => {
                self.manual_address_step(shopper, checkout, text).await
            }
            SessionState::AwaitingUpsellDecision {
                shop_id,
                linked_order_id,
                offer,
            } => {
                upsell::handle_decision(
                    &self.db,
                    &self.store,
                    self.sender.as_ref(),
                    shopper,
                    shop_id,
                    linked_order_id,
                    &offer,
                    text,
                )
                .await
            }
            SessionState::AwaitingReviewRating { order_id, shop_id } => {
                self.review_step(shopper, order_id, shop_id, text).await
            }
            SessionState::AwaitingScreenshot { .. } => {
                // A transaction reference pasted as text counts as proof.
                if text.trim().len() >= 20 {
                    self.handle_proof(shopper, text.trim().to_string()).await
                } else {
                    self.send(shopper, messages::proof_reminder()).await;
                    Ok(())
                }
            }
            _ => self.reprompt(shopper).await,
        }
    }

    /// Corrective prompt for the current state; never silently drops a reply.
    async fn reprompt(&self, shopper: &ShopperId) -> Result<(), DukanError> {
        let session = self.store.get(shopper);
        match session.state {
            SessionState::Idle => {
                self.send(shopper, messages::idle_help()).await;
                Ok(())
            }
            SessionState::AwaitingSelection {
                item, step_index, ..
            } => {
                if let Some(spec) = item.specs.get(step_index) {
                    let prompt = messages::spec_prompt(&item.name, spec);
                    self.send(shopper, prompt).await;
                }
                Ok(())
            }
            SessionState::AwaitingQty { .. } => {
                self.send(shopper, messages::qty_not_numeric()).await;
                Ok(())
            }
            SessionState::AwaitingAddress { checkout } => {
                self.address_checkpoint(shopper, checkout).await
            }
            SessionState::AwaitingManualAddress { .. } => {
                self.send(shopper, messages::manual_address_prompt()).await;
                Ok(())
            }
            SessionState::AwaitingPaymentMethod { checkout } => {
                let total = checkout.display_total();
                self.send(shopper, messages::payment_method_prompt(total)).await;
                Ok(())
            }
            SessionState::AwaitingGatewayConfirm { order_id, .. } => {
                self.send(shopper, messages::gateway_pending(order_id)).await;
                Ok(())
            }
            SessionState::AwaitingScreenshot { .. } => {
                self.send(shopper, messages::proof_reminder()).await;
                Ok(())
            }
            SessionState::AwaitingUpsellDecision { offer, .. } => {
                let prompt = messages::upsell_pitch(&offer.name, offer.price, offer.price);
                self.send(shopper, prompt).await;
                Ok(())
            }
            SessionState::AwaitingReviewRating { .. } => {
                self.send(shopper, messages::review_invalid()).await;
                Ok(())
            }
        }
    }

    // --- Helpers ----------------------------------------------------------

    async fn send(&self, to: &ShopperId, msg: OutboundMessage) {
        if let Err(e) = self.sender.send(to, msg).await {
            warn!(to = %to, error = %e, "outbound send failed");
        }
    }

    async fn notify_seller(
        &self,
        shop: &dukan_core::types::ShopPaymentConfig,
        msg: OutboundMessage,
    ) {
        if let Some(phone) = &shop.seller_phone {
            self.send(&ShopperId(phone.clone()), msg).await;
        }
    }
}

fn is_valid_pincode(raw: &str) -> bool {
    raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pincode_validation() {
        assert!(is_valid_pincode("400050"));
        assert!(!is_valid_pincode("4000"));
        assert!(!is_valid_pincode("40005a"));
        assert!(!is_valid_pincode("4000501"));
    }
}
