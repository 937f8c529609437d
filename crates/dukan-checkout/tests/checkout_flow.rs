// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end checkout flows driven through the state machine.

use std::sync::Arc;

use dukan_checkout::{CheckoutEngine, EngineConfig, Reconciler};
use dukan_core::event::{EventKind, InboundEvent};
use dukan_core::types::{OrderStatus, PaymentStatus, ShopperId};
use dukan_session::{SessionState, SessionStore, TokenIssuer};
use dukan_storage::NewAddress;
use dukan_storage::queries::{addresses, orders};
use dukan_test_utils::{RecordingSender, StubGateway, TestDb};

const SHOPPER: &str = "919876543210";

struct Rig {
    fixture: TestDb,
    engine: Arc<CheckoutEngine>,
    store: Arc<SessionStore>,
    tokens: Arc<TokenIssuer>,
    sender: Arc<RecordingSender>,
}

impl Rig {
    async fn new(config: EngineConfig) -> Self {
        let fixture = TestDb::new().await.unwrap();
        let store = Arc::new(SessionStore::new());
        let tokens = Arc::new(TokenIssuer::with_defaults());
        let sender = Arc::new(RecordingSender::new());
        let gateway = Arc::new(StubGateway::new());
        let engine = Arc::new(CheckoutEngine::new(
            Arc::clone(&store),
            Arc::clone(&tokens),
            Arc::clone(&fixture.db),
            sender.clone(),
            gateway,
            config,
        ));
        Self {
            fixture,
            engine,
            store,
            tokens,
            sender,
        }
    }

    fn shopper(&self) -> ShopperId {
        ShopperId(SHOPPER.to_string())
    }

    async fn text(&self, body: &str) {
        self.engine
            .process(InboundEvent {
                sender: self.shopper(),
                kind: EventKind::Text(body.to_string()),
            })
            .await;
    }

    async fn button(&self, id: &str) {
        self.engine
            .process(InboundEvent {
                sender: self.shopper(),
                kind: EventKind::ButtonReply {
                    id: id.to_string(),
                    title: String::new(),
                },
            })
            .await;
    }

    async fn image(&self, media_id: &str) {
        self.engine
            .process(InboundEvent {
                sender: self.shopper(),
                kind: EventKind::Image {
                    media_id: media_id.to_string(),
                },
            })
            .await;
    }

    fn state(&self) -> SessionState {
        self.store.get(&self.shopper()).state
    }
}

#[tokio::test]
async fn single_item_cod_happy_path() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();

    // Select item A (stock 5, price 100), reply quantity 3: total becomes
    // 300 and the machine moves to address collection.
    rig.text(&format!("buy_item_{item_id}")).await;
    assert!(matches!(rig.state(), SessionState::AwaitingQty { .. }));

    rig.text("3").await;
    // No saved address and no public base URL: manual capture.
    match rig.state() {
        SessionState::AwaitingManualAddress { checkout } => {
            assert_eq!(checkout.total, 300.0);
            assert_eq!(checkout.cart[0].qty, 3);
        }
        other => panic!("expected manual address capture, got {other:?}"),
    }

    rig.text("400050, Flat 101, Mumbai").await;
    assert!(matches!(rig.state(), SessionState::AwaitingPaymentMethod { .. }));
    assert!(rig.sender.all_text().await.contains("₹300"));

    rig.button("pay_cod").await;
    assert_eq!(rig.state(), SessionState::Idle, "session cleared on success");

    let order = orders::get_order(&rig.fixture.db, 1).await.unwrap().unwrap();
    assert_eq!(order.total_amount, 300.0);
    assert_eq!(order.quantity, 3);
    assert_eq!(order.order_status, OrderStatus::Placed);
    assert_eq!(order.delivery_city, "Mumbai");
}

#[tokio::test]
async fn over_stock_quantity_rejected_with_live_count() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("9").await;

    assert!(
        matches!(rig.state(), SessionState::AwaitingQty { .. }),
        "state must stay at quantity collection"
    );
    let text = rig.sender.all_text().await;
    assert!(text.contains("*5*"), "rejection must quote the live stock: {text}");
}

#[tokio::test]
async fn zero_stock_clears_session_before_address_stage() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 1).await.unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    // Stock sells out while the shopper is deciding.
    rig.fixture
        .db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE items SET stock_count = 0 WHERE id = ?1",
                rusqlite::params![item_id],
            )?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .unwrap();

    rig.text("1").await;
    assert_eq!(rig.state(), SessionState::Idle);
    assert!(rig.sender.all_text().await.contains("sold out"));
    assert!(orders::get_order(&rig.fixture.db, 1).await.unwrap().is_none());
}

#[tokio::test]
async fn non_numeric_quantity_reprompts_in_place() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("a couple").await;
    assert!(matches!(rig.state(), SessionState::AwaitingQty { .. }));

    rig.text("0").await;
    assert!(matches!(rig.state(), SessionState::AwaitingQty { .. }));
}

#[tokio::test]
async fn variant_drilldown_resolves_priced_variant() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig
        .fixture
        .seed_variant_item(
            shop_id,
            "Tee",
            250.0,
            10,
            r#"[{"name":"Size","options":["S","M"]},{"name":"Colour","options":["Red","Blue"]}]"#,
            r#"[{"title":"M / Red","price":275.0}]"#,
        )
        .await
        .unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    assert!(matches!(
        rig.state(),
        SessionState::AwaitingSelection { step_index: 0, .. }
    ));

    // Out-of-set reply re-prompts without advancing the step.
    rig.text("XL").await;
    assert!(matches!(
        rig.state(),
        SessionState::AwaitingSelection { step_index: 0, .. }
    ));

    rig.text("m").await;
    assert!(matches!(
        rig.state(),
        SessionState::AwaitingSelection { step_index: 1, .. }
    ));

    rig.text("red").await;
    match rig.state() {
        SessionState::AwaitingQty {
            unit_price,
            variant_title,
            ..
        } => {
            assert_eq!(unit_price, 275.0, "exact variant price wins");
            assert_eq!(variant_title.as_deref(), Some("M / Red"));
        }
        other => panic!("expected quantity stage, got {other:?}"),
    }
}

#[tokio::test]
async fn unmatched_variant_falls_back_to_base_price() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig
        .fixture
        .seed_variant_item(
            shop_id,
            "Tee",
            250.0,
            10,
            r#"[{"name":"Size","options":["S","M"]}]"#,
            r#"[{"title":"XL","price":300.0}]"#,
        )
        .await
        .unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("S").await;
    match rig.state() {
        SessionState::AwaitingQty { unit_price, .. } => assert_eq!(unit_price, 250.0),
        other => panic!("expected quantity stage, got {other:?}"),
    }
}

#[tokio::test]
async fn saved_address_confirm_advances_to_payment() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();
    let addr_id = addresses::insert_address(
        &rig.fixture.db,
        &NewAddress {
            shopper_id: SHOPPER.into(),
            house_no: "Flat 101".into(),
            city: "Mumbai".into(),
            pincode: "400050".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("2").await;
    assert!(matches!(rig.state(), SessionState::AwaitingAddress { .. }));

    rig.button(&format!("CONFIRM_ADDR_{addr_id}")).await;
    match rig.state() {
        SessionState::AwaitingPaymentMethod { checkout } => {
            assert_eq!(checkout.address_id, Some(addr_id));
            assert_eq!(checkout.total, 200.0);
        }
        other => panic!("expected payment method stage, got {other:?}"),
    }
}

#[tokio::test]
async fn stale_address_button_is_revalidated_against_current_row() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();
    let old_addr = addresses::insert_address(
        &rig.fixture.db,
        &NewAddress {
            shopper_id: SHOPPER.into(),
            house_no: "Old House".into(),
            city: "Pune".into(),
            pincode: "411001".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("1").await;

    // A newer address supersedes the one on the rendered button.
    addresses::insert_address(
        &rig.fixture.db,
        &NewAddress {
            shopper_id: SHOPPER.into(),
            house_no: "New Flat".into(),
            city: "Mumbai".into(),
            pincode: "400050".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    rig.button(&format!("CONFIRM_ADDR_{old_addr}")).await;
    assert!(
        matches!(rig.state(), SessionState::AwaitingAddress { .. }),
        "stale id must re-present the current address, not advance"
    );
    assert!(rig.sender.all_text().await.contains("New Flat"));
}

#[tokio::test]
async fn web_handoff_round_trip_resumes_at_payment_with_total_intact() {
    let rig = Rig::new(EngineConfig {
        public_base_url: "https://shop.example".into(),
        master_key: None,
    })
    .await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("3").await;

    // No saved address: the machine sends a hand-off link and waits.
    assert!(matches!(rig.state(), SessionState::AwaitingAddress { .. }));
    let text = rig.sender.all_text().await;
    assert!(text.contains("https://shop.example/checkout/"), "{text}");

    // The web collaborator consumes the token and stores the address.
    let token = text
        .split("/checkout/")
        .nth(1)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .trim()
        .to_string();
    let bound = rig.tokens.consume(&token).await.unwrap();
    assert_eq!(bound, rig.shopper());
    addresses::insert_address(
        &rig.fixture.db,
        &NewAddress {
            shopper_id: SHOPPER.into(),
            house_no: "Flat 101".into(),
            city: "Mumbai".into(),
            pincode: "400050".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Deep link back into chat carries the confirmation marker.
    rig.text(&format!("Address_Confirmed_for_{token}")).await;
    match rig.state() {
        SessionState::AwaitingPaymentMethod { checkout } => {
            assert_eq!(checkout.total, 300.0, "total survives the hand-off");
            assert!(checkout.address_id.is_some());
        }
        other => panic!("expected payment method stage, got {other:?}"),
    }
}

#[tokio::test]
async fn manual_proof_path_and_admin_rejection() {
    let rig = Rig::new(EngineConfig::default()).await;
    // Gateway disabled: free tier, manual payment address only.
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("2").await;
    rig.text("400050, Flat 101, Mumbai").await;
    rig.button("pay_online").await;

    let order_id = match rig.state() {
        SessionState::AwaitingScreenshot { order_id, .. } => order_id,
        other => panic!("router should fall to manual proof, got {other:?}"),
    };
    assert!(rig.sender.all_text().await.contains("testshop@upi"));

    rig.image("media-123").await;
    assert_eq!(rig.state(), SessionState::Idle);
    let order = orders::get_order(&rig.fixture.db, order_id).await.unwrap().unwrap();
    assert_eq!(order.payment_status, PaymentStatus::NeedsApproval);
    assert_eq!(order.payment_proof_ref.as_deref(), Some("media-123"));

    // Admin rejects the proof.
    let reconciler = Reconciler::new(
        Arc::clone(&rig.fixture.db),
        rig.store.clone(),
        rig.sender.clone(),
    );
    assert!(reconciler.reject(order_id).await.unwrap());
    let order = orders::get_order(&rig.fixture.db, order_id).await.unwrap().unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Failed);
    assert_eq!(order.order_status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn double_tapped_pay_button_creates_one_order() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("1").await;
    rig.text("400050, Flat 101, Mumbai").await;

    // Two identical taps race; per-key serialization admits exactly one
    // finalize transition.
    let first = {
        let engine = Arc::clone(&rig.engine);
        tokio::spawn(async move {
            engine
                .process(InboundEvent {
                    sender: ShopperId(SHOPPER.into()),
                    kind: EventKind::ButtonReply {
                        id: "pay_cod".into(),
                        title: String::new(),
                    },
                })
                .await;
        })
    };
    let second = {
        let engine = Arc::clone(&rig.engine);
        tokio::spawn(async move {
            engine
                .process(InboundEvent {
                    sender: ShopperId(SHOPPER.into()),
                    kind: EventKind::ButtonReply {
                        id: "pay_cod".into(),
                        title: String::new(),
                    },
                })
                .await;
        })
    };
    first.await.unwrap();
    second.await.unwrap();

    assert!(orders::get_order(&rig.fixture.db, 1).await.unwrap().is_some());
    assert!(
        orders::get_order(&rig.fixture.db, 2).await.unwrap().is_none(),
        "the duplicate tap must not finalize a second order"
    );
}

#[tokio::test]
async fn bulk_handoff_applies_coupon_and_reaches_address_stage() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let mug = rig.fixture.seed_item(shop_id, "Mug", 100.0, 10).await.unwrap();
    let tee = rig.fixture.seed_item(shop_id, "Tee", 250.0, 10).await.unwrap();
    dukan_storage::queries::coupons::insert_coupon(
        &rig.fixture.db,
        shop_id,
        "SALE20",
        dukan_storage::DiscountType::Percent,
        20.0,
        true,
    )
    .await
    .unwrap();

    rig.text(&format!("buy_bulk_{mug}:2,{tee}:1_COUPON:SALE20")).await;

    match rig.state() {
        SessionState::AwaitingManualAddress { checkout } => {
            assert_eq!(checkout.cart.len(), 2);
            // subtotal 450, 20% off -> 360
            assert_eq!(checkout.total, 360.0);
        }
        other => panic!("expected address capture, got {other:?}"),
    }
    let text = rig.sender.all_text().await;
    assert!(text.contains("Subtotal: ₹450"));
    assert!(text.contains("*Total: ₹360*"));
}

#[tokio::test]
async fn recovery_cancel_button_empties_cart() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let item_id = rig.fixture.seed_item(shop_id, "Mug", 100.0, 5).await.unwrap();

    rig.text(&format!("buy_item_{item_id}")).await;
    rig.text("2").await;
    assert!(matches!(rig.state(), SessionState::AwaitingManualAddress { .. }));

    rig.button("recover_cancel").await;
    assert_eq!(rig.state(), SessionState::Idle);
    assert!(rig.sender.all_text().await.contains("Cart cleared"));
}

#[tokio::test]
async fn review_rating_is_recorded_and_session_cleared() {
    let rig = Rig::new(EngineConfig::default()).await;
    let shop_id = rig.fixture.seed_manual_shop().await.unwrap();
    let order_id = orders::insert_order(
        &rig.fixture.db,
        &dukan_storage::NewOrder {
            shopper_id: SHOPPER.into(),
            shop_id,
            items: vec![],
            item_summary: "Mug".into(),
            quantity: 1,
            total_amount: 100.0,
            payment_choice: dukan_core::types::PaymentChoice::Cod,
            delivery_address: String::new(),
            delivery_pincode: String::new(),
            delivery_city: String::new(),
            delivery_state: String::new(),
            order_status: OrderStatus::Delivered,
            payment_status: PaymentStatus::Paid,
        },
    )
    .await
    .unwrap();

    // Watchdog-seeded state.
    rig.store.set(
        &rig.shopper(),
        dukan_session::Session::with_state(SessionState::AwaitingReviewRating {
            order_id,
            shop_id,
        }),
    );

    rig.text("6").await;
    assert!(matches!(rig.state(), SessionState::AwaitingReviewRating { .. }));

    rig.text("5").await;
    assert_eq!(rig.state(), SessionState::Idle);
    assert!(rig.sender.all_text().await.contains("Thank you"));
}

#[tokio::test]
async fn unexpected_reply_never_silently_dropped() {
    let rig = Rig::new(EngineConfig::default()).await;
    rig.text("hello?").await;
    assert!(rig.sender.count().await > 0, "idle free text gets a help prompt");
}
