// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway surface tests driven through the router with `tower::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dukan_checkout::{CheckoutEngine, EngineConfig, Reconciler};
use dukan_core::types::{OrderStatus, PaymentChoice, PaymentStatus};
use dukan_gateway::{GatewayConfig, GatewayState, router};
use dukan_session::{SessionStore, TokenIssuer};
use dukan_storage::NewOrder;
use dukan_storage::queries::orders;
use dukan_test_utils::{RecordingSender, StubGateway, TestDb};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

const WEBHOOK_SECRET: &str = "whsec_test";
const ADMIN_SECRET: &str = "admin_s3cret";

struct Rig {
    fixture: TestDb,
    app: Router,
}

async fn rig() -> Rig {
    let fixture = TestDb::new().await.unwrap();
    let store = Arc::new(SessionStore::new());
    let tokens = Arc::new(TokenIssuer::with_defaults());
    let sender = Arc::new(RecordingSender::new());
    let engine = Arc::new(CheckoutEngine::new(
        Arc::clone(&store),
        Arc::clone(&tokens),
        Arc::clone(&fixture.db),
        sender.clone(),
        Arc::new(StubGateway::new()),
        EngineConfig::default(),
    ));
    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&fixture.db),
        Arc::clone(&store),
        sender,
    ));

    let state = GatewayState {
        engine,
        reconciler,
        tokens,
        db: Arc::clone(&fixture.db),
        config: GatewayConfig {
            host: "127.0.0.1".into(),
            port: 0,
            verify_token: "hub-token".into(),
            admin_secret: ADMIN_SECRET.into(),
            webhook_secret: WEBHOOK_SECRET.into(),
            chat_deep_link_base: "https://wa.me/919999999999".into(),
            public_base_url: "https://shop.example".into(),
        },
    };
    Rig {
        fixture,
        app: router(state),
    }
}

fn sign(body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn seed_pending_order(fixture: &TestDb) -> i64 {
    let shop_id = fixture.seed_manual_shop().await.unwrap();
    orders::insert_order(
        &fixture.db,
        &NewOrder {
            shopper_id: "919876543210".into(),
            shop_id,
            items: vec![],
            item_summary: "Mug".into(),
            quantity: 1,
            total_amount: 100.0,
            payment_choice: PaymentChoice::Online,
            delivery_address: String::new(),
            delivery_pincode: String::new(),
            delivery_city: String::new(),
            delivery_state: String::new(),
            order_status: OrderStatus::Placed,
            payment_status: PaymentStatus::Pending,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn verification_challenge_round_trip() {
    let rig = rig().await;

    let ok = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/webhook?hub.mode=subscribe&hub.verify_token=hub-token&hub.challenge=12345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(ok.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"12345");

    let bad = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=12345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn inbound_webhook_always_acknowledges() {
    let rig = rig().await;

    // Garbage body still gets a 200.
    let response = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A status-update delivery (no messages) is also acknowledged.
    let response = rig
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/webhook",
            serde_json::json!({
                "entry": [{"changes": [{"value": {"statuses": [{"status": "read"}]}}]}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn payment_webhook_rejects_bad_signature() {
    let rig = rig().await;
    let body = serde_json::json!({
        "event": "payment.captured",
        "payment_id": "pay_1",
        "correlation": {"order_id": 1, "shop_id": 1}
    })
    .to_string();

    let response = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/payment")
                .header("x-payment-signature", "deadbeef")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_webhook_confirms_order_and_tolerates_duplicates() {
    let rig = rig().await;
    let order_id = seed_pending_order(&rig.fixture).await;

    let body = serde_json::json!({
        "event": "payment.captured",
        "payment_id": "pay_42",
        "correlation": {"order_id": order_id, "shop_id": 1}
    })
    .to_string();
    let signature = sign(&body);

    for _ in 0..2 {
        let response = rig
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhooks/payment")
                    .header("x-payment-signature", signature.clone())
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "retries must succeed");
    }

    let order = orders::get_order(&rig.fixture.db, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.order_status, OrderStatus::Processing);
}

#[tokio::test]
async fn payment_webhook_acknowledges_unknown_order() {
    let rig = rig().await;
    let body = serde_json::json!({
        "event": "payment.captured",
        "payment_id": "pay_404",
        "correlation": {"order_id": 9999, "shop_id": 1}
    })
    .to_string();

    let response = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/payment")
                .header("x-payment-signature", sign(&body))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn checkout_handoff_rest_round_trip() {
    let rig = rig().await;

    // Issue a link.
    let response = rig
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/generate-link",
            serde_json::json!({"shopper_id": "919876543210"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let url = json["url"].as_str().unwrap();
    let token = url.rsplit('/').next().unwrap().to_string();
    assert!(url.starts_with("https://shop.example/checkout/"));
    assert!(!url.contains("919876543210"), "identity must not leak into the URL");

    // Inspect the session: masked identity, no saved address yet.
    let response = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/session/{token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["masked_identity"], "******3210");
    assert!(json["saved_address"].is_null());

    // Confirm an address; the token self-destructs.
    let response = rig
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/confirm-address",
            serde_json::json!({
                "token": token,
                "address": {"house_no": "Flat 101", "city": "Mumbai", "pincode": "400050"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let redirect = json["redirect_url"].as_str().unwrap();
    assert!(redirect.contains("Address_Confirmed_for_"));

    // The address row exists now.
    let addr = dukan_storage::queries::addresses::latest_for_shopper(
        &rig.fixture.db,
        "919876543210",
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(addr.city, "Mumbai");

    // Second consume attempt: single use.
    let response = rig
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/confirm-address",
            serde_json::json!({
                "token": token,
                "address": {"house_no": "Other", "city": "Pune", "pincode": "411001"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And the session endpoint agrees it is gone.
    let response = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/session/{token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn confirm_address_validates_pincode() {
    let rig = rig().await;
    let response = rig
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/confirm-address",
            serde_json::json!({
                "token": "whatever",
                "address": {"house_no": "Flat 101", "pincode": "12"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_session_token_is_404() {
    let rig = rig().await;
    let response = rig
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/no-such-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_verify_order_requires_secret() {
    let rig = rig().await;
    let order_id = seed_pending_order(&rig.fixture).await;
    orders::mark_needs_approval(&rig.fixture.db, order_id, "media-1".into())
        .await
        .unwrap();

    // Missing header.
    let response = rig
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/verify-order",
            serde_json::json!({"order_id": order_id, "decision": "approve"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct secret approves.
    let mut request = json_request(
        "POST",
        "/verify-order",
        serde_json::json!({"order_id": order_id, "decision": "approve"}),
    );
    request
        .headers_mut()
        .insert("x-admin-secret", ADMIN_SECRET.parse().unwrap());
    let response = rig.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let order = orders::get_order(&rig.fixture.db, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.order_status, OrderStatus::Processing);
}

#[tokio::test]
async fn admin_verify_order_unknown_order_is_404() {
    let rig = rig().await;
    let mut request = json_request(
        "POST",
        "/verify-order",
        serde_json::json!({"order_id": 424242, "decision": "reject"}),
    );
    request
        .headers_mut()
        .insert("x-admin-secret", ADMIN_SECRET.parse().unwrap());
    let response = rig.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
