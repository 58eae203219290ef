//! Integration tests for the `/functions/v1` payment endpoints.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use std::time::Duration;

use common::{
    body_json, build_test_app, build_test_app_failing_attach, build_test_app_with,
    build_test_app_with_timeout, get, post_json, post_raw, token_for, FakeGateway, TestApp,
    FAKE_KEY_ID,
};
use rentify_core::payment::PaymentStatus;
use rentify_core::types::DbId;
use rentify_db::store::PaymentStore;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

const CREATE: &str = "/functions/v1/create-order";
const VERIFY: &str = "/functions/v1/verify-payment";
const RELEASE: &str = "/functions/v1/release-payment";

/// Create an order for `rental_id` as `user_id`, returning the order id.
async fn create_order(app: &TestApp, user_id: DbId, rental_id: DbId) -> String {
    let token = token_for(user_id);
    let response = post_json(
        &app.router,
        CREATE,
        Some(&token),
        json!({ "amount": 2500, "rentalId": rental_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["orderId"]
        .as_str()
        .expect("orderId is a string")
        .to_string()
}

async fn verify(app: &TestApp, user_id: DbId, order_id: &str, signature: &str) -> (StatusCode, serde_json::Value) {
    let token = token_for(user_id);
    let response = post_json(
        &app.router,
        VERIFY,
        Some(&token),
        json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_test_1",
            "razorpay_signature": signature,
        }),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn release(app: &TestApp, user_id: DbId, rental_id: DbId) -> (StatusCode, serde_json::Value) {
    let token = token_for(user_id);
    let response = post_json(
        &app.router,
        RELEASE,
        Some(&token),
        json!({ "rentalId": rental_id }),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn status_of(app: &TestApp, order_id: &str) -> Option<PaymentStatus> {
    app.store
        .find_by_order_id(order_id)
        .await
        .unwrap()
        .and_then(|p| p.status())
}

// ---------------------------------------------------------------------------
// create-order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_order_opens_gateway_order_and_records_pending_payment() {
    let app = build_test_app();
    let user_id = Uuid::new_v4();
    let rental_id = Uuid::new_v4();
    let token = token_for(user_id);

    let response = post_json(
        &app.router,
        CREATE,
        Some(&token),
        json!({ "amount": 1500.5, "rentalId": rental_id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["orderId"], "order_fake1");
    assert_eq!(json["amount"], 150050);
    assert_eq!(json["currency"], "INR");
    assert_eq!(json["keyId"], FAKE_KEY_ID);

    let payment = app
        .store
        .find_by_order_id("order_fake1")
        .await
        .unwrap()
        .expect("payment recorded under the order id");
    assert_eq!(payment.status(), Some(PaymentStatus::Pending));
    assert_eq!(payment.user_id, user_id);
    assert_eq!(payment.rental_id, rental_id);
    assert_eq!(payment.amount.to_string(), "1500.5");
    assert_eq!(app.gateway.calls(), 1);
}

#[tokio::test]
async fn create_order_rejects_non_positive_amount() {
    let app = build_test_app();
    let token = token_for(Uuid::new_v4());

    for amount in [json!(0), json!(-100)] {
        let response = post_json(
            &app.router,
            CREATE,
            Some(&token),
            json!({ "amount": amount, "rentalId": Uuid::new_v4() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("Amount must be greater than zero"),
            "unexpected error: {json}"
        );
    }

    assert_eq!(app.gateway.calls(), 0);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn create_order_rejects_lowercase_currency() {
    let app = build_test_app();
    let token = token_for(Uuid::new_v4());

    let response = post_json(
        &app.router,
        CREATE,
        Some(&token),
        json!({ "amount": 100, "rentalId": Uuid::new_v4(), "currency": "inr" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn gateway_failure_marks_payment_failed_and_surfaces_body() {
    let app = build_test_app_with(Some(FakeGateway::failing()));
    let user_id = Uuid::new_v4();
    let rental_id = Uuid::new_v4();
    let token = token_for(user_id);

    let response = post_json(
        &app.router,
        CREATE,
        Some(&token),
        json!({ "amount": 500, "rentalId": rental_id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        r#"Razorpay API error: {"error":{"code":"BAD_REQUEST_ERROR"}}"#
    );

    let payments = app.store.list_for_rental(rental_id, user_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status(), Some(PaymentStatus::Failed));
    assert!(payments[0].razorpay_order_id.is_none());
}

#[tokio::test]
async fn missing_gateway_credentials_fail_before_recording_anything() {
    let app = build_test_app_with(None);
    let token = token_for(Uuid::new_v4());

    let response = post_json(
        &app.router,
        CREATE,
        Some(&token),
        json!({ "amount": 500, "rentalId": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Razorpay credentials not configured" })
    );
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn order_id_write_failure_marks_payment_failed() {
    let app = build_test_app_failing_attach();
    let user_id = Uuid::new_v4();
    let rental_id = Uuid::new_v4();
    let token = token_for(user_id);

    let response = post_json(
        &app.router,
        CREATE,
        Some(&token),
        json!({ "amount": 500, "rentalId": rental_id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "An internal error occurred" })
    );
    assert_eq!(app.gateway.calls(), 1);

    let payments = app.store.list_for_rental(rental_id, user_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status(), Some(PaymentStatus::Failed));
    assert!(payments[0].razorpay_order_id.is_none());
}

#[tokio::test]
async fn slow_gateway_times_out_with_function_error_and_fails_payment() {
    let app = build_test_app_with_timeout(1, FakeGateway::slow(Duration::from_secs(3)));
    let user_id = Uuid::new_v4();
    let rental_id = Uuid::new_v4();
    let token = token_for(user_id);

    let response = post_json(
        &app.router,
        CREATE,
        Some(&token),
        json!({ "amount": 500, "rentalId": rental_id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Request timed out" })
    );

    let payments = app.store.list_for_rental(rental_id, user_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status(), Some(PaymentStatus::Failed));
}

#[tokio::test]
async fn legacy_function_path_is_served() {
    let app = build_test_app();
    let token = token_for(Uuid::new_v4());

    let response = post_json(
        &app.router,
        "/functions/v1/create-razorpay-order",
        Some(&token),
        json!({ "amount": 10, "rentalId": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Authentication and request shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthenticated_requests_are_rejected_before_side_effects() {
    let app = build_test_app();
    let bodies = [
        (CREATE, json!({ "amount": 100, "rentalId": Uuid::new_v4() })),
        (
            VERIFY,
            json!({
                "razorpay_order_id": "order_x",
                "razorpay_payment_id": "pay_x",
                "razorpay_signature": "00",
            }),
        ),
        (RELEASE, json!({ "rentalId": Uuid::new_v4() })),
    ];

    for (uri, body) in bodies {
        let response = post_json(&app.router, uri, None, body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }), "{uri}");
    }

    assert_eq!(app.gateway.calls(), 0);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let app = build_test_app();
    let forged = rentify_api::auth::jwt::generate_access_token(
        Uuid::new_v4(),
        &rentify_api::auth::jwt::JwtConfig {
            secret: "some-other-secret".to_string(),
            ..common::jwt_config()
        },
    )
    .unwrap();

    let response = post_json(
        &app.router,
        CREATE,
        Some(&forged),
        json!({ "amount": 100, "rentalId": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Unauthorized");
    assert_eq!(app.gateway.calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_an_error_response() {
    let app = build_test_app();
    let token = token_for(Uuid::new_v4());

    let response = post_raw(&app.router, CREATE, &token, "{not json").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().is_some_and(|m| !m.is_empty()));
    assert_eq!(app.gateway.calls(), 0);
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let app = build_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(CREATE)
        .header("origin", "https://checkout.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

// ---------------------------------------------------------------------------
// verify-payment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_signature_captures_payment() {
    let app = build_test_app();
    let user_id = Uuid::new_v4();
    let order_id = create_order(&app, user_id, Uuid::new_v4()).await;

    let signature = FakeGateway::sign(&order_id, "pay_test_1");
    let (status, json) = verify(&app, user_id, &order_id, &signature).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "success": true, "message": "Payment verified successfully" })
    );

    let payment = app.store.find_by_order_id(&order_id).await.unwrap().unwrap();
    assert_eq!(payment.status(), Some(PaymentStatus::Captured));
    assert_eq!(payment.razorpay_payment_id.as_deref(), Some("pay_test_1"));
    assert_eq!(payment.razorpay_signature.as_deref(), Some(signature.as_str()));
    assert_eq!(payment.payment_method.as_deref(), Some("razorpay"));
}

#[tokio::test]
async fn tampered_signature_leaves_payment_pending() {
    let app = build_test_app();
    let user_id = Uuid::new_v4();
    let order_id = create_order(&app, user_id, Uuid::new_v4()).await;

    let mut signature = FakeGateway::sign(&order_id, "pay_test_1");
    let last = if signature.ends_with('0') { "1" } else { "0" };
    signature.replace_range(signature.len() - 1.., last);

    let (status, json) = verify(&app, user_id, &order_id, &signature).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Payment verification failed: Invalid signature");
    assert_eq!(status_of(&app, &order_id).await, Some(PaymentStatus::Pending));
}

#[tokio::test]
async fn second_verification_finds_nothing_to_capture() {
    let app = build_test_app();
    let user_id = Uuid::new_v4();
    let order_id = create_order(&app, user_id, Uuid::new_v4()).await;
    let signature = FakeGateway::sign(&order_id, "pay_test_1");

    let (first, _) = verify(&app, user_id, &order_id, &signature).await;
    assert_eq!(first, StatusCode::OK);

    let (second, json) = verify(&app, user_id, &order_id, &signature).await;
    assert_eq!(second, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Payment not found or already verified");
}

#[tokio::test]
async fn another_user_cannot_capture_the_payment() {
    let app = build_test_app();
    let owner = Uuid::new_v4();
    let order_id = create_order(&app, owner, Uuid::new_v4()).await;
    let signature = FakeGateway::sign(&order_id, "pay_test_1");

    let (status, json) = verify(&app, Uuid::new_v4(), &order_id, &signature).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Payment not found or already verified");
    assert_eq!(status_of(&app, &order_id).await, Some(PaymentStatus::Pending));
}

#[tokio::test]
async fn verification_without_gateway_credentials_is_refused() {
    let app = build_test_app_with(None);
    let user_id = Uuid::new_v4();
    let signature = FakeGateway::sign("order_any", "pay_test_1");

    let (status, json) = verify(&app, user_id, "order_any", &signature).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Razorpay credentials not configured" }));
}

// ---------------------------------------------------------------------------
// release-payment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn release_succeeds_exactly_once() {
    let app = build_test_app();
    let user_id = Uuid::new_v4();
    let rental_id = Uuid::new_v4();
    let order_id = create_order(&app, user_id, rental_id).await;
    let signature = FakeGateway::sign(&order_id, "pay_test_1");
    verify(&app, user_id, &order_id, &signature).await;

    let (status, json) = release(&app, user_id, rental_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "success": true, "message": "Payment released successfully" })
    );

    let payment = app.store.find_by_order_id(&order_id).await.unwrap().unwrap();
    assert_eq!(payment.status(), Some(PaymentStatus::Released));
    assert!(payment.released_at.is_some());

    let (status, json) = release(&app, user_id, rental_id).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Payment not found or already released");
}

#[tokio::test]
async fn release_requires_captured_payment() {
    let app = build_test_app();
    let user_id = Uuid::new_v4();
    let rental_id = Uuid::new_v4();
    let order_id = create_order(&app, user_id, rental_id).await;

    let (status, json) = release(&app, user_id, rental_id).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Payment not found or already released");
    assert_eq!(status_of(&app, &order_id).await, Some(PaymentStatus::Pending));
}

// ---------------------------------------------------------------------------
// Payment history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn payment_history_lists_only_the_callers_payments() {
    let app = build_test_app();
    let user_id = Uuid::new_v4();
    let rental_id = Uuid::new_v4();
    create_order(&app, user_id, rental_id).await;
    create_order(&app, user_id, rental_id).await;
    create_order(&app, Uuid::new_v4(), rental_id).await;

    let token = token_for(user_id);
    let response = get(
        &app.router,
        &format!("/api/v1/rentals/{rental_id}/payments"),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let payments = json["data"].as_array().expect("data is an array");
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p["status"] == "pending"));
}

#[tokio::test]
async fn payment_history_requires_auth_with_api_error_envelope() {
    let app = build_test_app();

    let response = get(
        &app.router,
        &format!("/api/v1/rentals/{}/payments", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}
