//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use checkout::{InMemoryMailer, InMemoryPaymentGateway, SignatureVerifier};
use metrics_exporter_prometheus::PrometheusHandle;
use store::InMemoryStore;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> (
    axum::Router,
    InMemoryStore,
    InMemoryPaymentGateway,
    InMemoryMailer,
) {
    let (state, store, gateway, mailer) = api::create_default_state(TEST_SECRET);
    let app = api::create_app(state, get_metrics_handle());
    (app, store, gateway, mailer)
}

fn pet_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Bruno",
        "category": "dog",
        "age": "young",
        "sex": "male",
        "location": "Bangalore",
        "health_status": "Healthy",
        "vaccinated": true,
        "personality": "playful, gentle",
        "adoption_type": "Paid",
        "price_rupees": 500,
        "main_image": "https://storage.example.com/bruno.jpg",
        "extra_images": ["https://storage.example.com/bruno-2.jpg"],
        "owner_name": "Ravi Kumar",
        "owner_phone": "9888877776",
        "owner_email": "ravi@example.com",
        "description": "Loves long walks."
    })
}

fn intake_body(pet_id: &str) -> serde_json::Value {
    serde_json::json!({
        "pet_id": pet_id,
        "full_name": "Asha Rao",
        "email": "asha@example.com",
        "phone": "9999999999",
        "state": "KA",
        "location": "Bangalore",
        "landmark": "Near Park"
    })
}

async fn post_json(app: &axum::Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_pet(app: &axum::Router) -> String {
    let response = post_json(app, "/pets", pet_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let pet = json_body(response).await;
    pet["id"].as_str().unwrap().to_string()
}

async fn begin_checkout(app: &axum::Router, pet_id: &str) -> serde_json::Value {
    let response = post_json(app, "/adoptions", intake_body(pet_id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

fn sign(order_id: &str, payment_id: &str) -> String {
    SignatureVerifier::new(TEST_SECRET)
        .sign(order_id, payment_id)
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _, _) = setup();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_pet_crud() {
    let (app, _, _, _) = setup();

    // Create
    let pet_id = create_pet(&app).await;

    // Get
    let response = get(&app, &format!("/pets/{pet_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let pet = json_body(response).await;
    assert_eq!(pet["name"], "Bruno");
    assert_eq!(pet["category"], "dog");
    assert_eq!(pet["price_rupees"], 500);
    assert_eq!(pet["adopted"], false);

    // List
    let response = get(&app, "/pets").await;
    assert_eq!(response.status(), StatusCode::OK);
    let pets = json_body(response).await;
    assert_eq!(pets.as_array().unwrap().len(), 1);

    // Update
    let mut updated = pet_body();
    updated["name"] = serde_json::json!("Sheru");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/pets/{pet_id}"))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&updated).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let pet = json_body(response).await;
    assert_eq!(pet["name"], "Sheru");

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/pets/{pet_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/pets/{pet_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_pet_paid_without_price_is_rejected() {
    let (app, _, _, _) = setup();

    let mut body = pet_body();
    body["price_rupees"] = serde_json::Value::Null;

    let response = post_json(&app, "/pets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_pet_with_invalid_id_format() {
    let (app, _, _, _) = setup();
    let response = get(&app, "/pets/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_checkout_confirms_and_notifies_once() {
    let (app, _, _, mailer) = setup();
    let pet_id = create_pet(&app).await;

    // Intake saved, order opened
    let session = begin_checkout(&app, &pet_id).await;
    let adoption_id = session["adoption_id"].as_str().unwrap();
    let order_id = session["order_id"].as_str().unwrap();
    assert_eq!(session["amount_paise"], 50000);
    assert_eq!(session["currency"], "INR");
    assert_eq!(session["state"], "AwaitingPayment");

    // Provider callback with a valid signature
    let response = post_json(
        &app,
        "/payments/verify",
        serde_json::json!({
            "adoption_id": adoption_id,
            "order_id": order_id,
            "payment_id": "pay_1",
            "signature": sign(order_id, "pay_1"),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let verdict = json_body(response).await;
    assert_eq!(verdict["valid"], true);

    // The confirmation view re-reads the records
    let response = get(&app, &format!("/adoptions/{adoption_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let adoption = json_body(response).await;
    assert_eq!(adoption["status"], "paid");
    assert_eq!(adoption["payment_id"], "pay_1");

    let response = get(&app, &format!("/pets/{pet_id}")).await;
    let pet = json_body(response).await;
    assert_eq!(pet["adopted"], true);

    // First notify dispatches both e-mails
    let response = post_json(
        &app,
        &format!("/adoptions/{adoption_id}/notify"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let notify = json_body(response).await;
    assert_eq!(notify["ok"], true);
    assert_eq!(notify["already_notified"], false);
    assert_eq!(mailer.sent_count(), 2);

    // A reload does not dispatch again
    let response = post_json(
        &app,
        &format!("/adoptions/{adoption_id}/notify"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let notify = json_body(response).await;
    assert_eq!(notify["already_notified"], true);
    assert_eq!(mailer.sent_count(), 2);
}

#[tokio::test]
async fn test_tampered_signature_fails_the_attempt() {
    let (app, _, _, mailer) = setup();
    let pet_id = create_pet(&app).await;

    let session = begin_checkout(&app, &pet_id).await;
    let adoption_id = session["adoption_id"].as_str().unwrap();
    let order_id = session["order_id"].as_str().unwrap();

    let mut signature = sign(order_id, "pay_1");
    // Flip one character
    let replacement = if signature.starts_with('0') { "1" } else { "0" };
    signature.replace_range(0..1, replacement);

    let response = post_json(
        &app,
        "/payments/verify",
        serde_json::json!({
            "adoption_id": adoption_id,
            "order_id": order_id,
            "payment_id": "pay_1",
            "signature": signature,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let verdict = json_body(response).await;
    assert_eq!(verdict["valid"], false);

    // The request persists, failed, and no e-mails went out
    let response = get(&app, &format!("/adoptions/{adoption_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let adoption = json_body(response).await;
    assert_eq!(adoption["status"], "failed");
    assert_eq!(mailer.sent_count(), 0);

    // Notification is refused for a failed attempt
    let response = post_json(
        &app,
        &format!("/adoptions/{adoption_id}/notify"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_gateway_failure_leaves_saved_request() {
    let (app, store, gateway, _) = setup();
    let pet_id = create_pet(&app).await;
    gateway.set_fail_on_create(true);

    let response = post_json(&app, "/adoptions", intake_body(&pet_id)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The save preceded the order attempt
    assert_eq!(store.adoption_count().await, 1);
}

#[tokio::test]
async fn test_verify_with_missing_field_is_a_bad_request() {
    let (app, _, _, _) = setup();
    let pet_id = create_pet(&app).await;

    let session = begin_checkout(&app, &pet_id).await;
    let adoption_id = session["adoption_id"].as_str().unwrap();
    let order_id = session["order_id"].as_str().unwrap();

    let response = post_json(
        &app,
        "/payments/verify",
        serde_json::json!({
            "adoption_id": adoption_id,
            "order_id": order_id,
            "payment_id": "pay_1",
            "signature": "",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verify_unknown_adoption_is_not_found() {
    let (app, _, _, _) = setup();

    let response = post_json(
        &app,
        "/payments/verify",
        serde_json::json!({
            "adoption_id": uuid::Uuid::new_v4().to_string(),
            "order_id": "order_1",
            "payment_id": "pay_1",
            "signature": sign("order_1", "pay_1"),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_intake_validation_rejects_bad_email() {
    let (app, store, _, _) = setup();
    let pet_id = create_pet(&app).await;

    let mut body = intake_body(&pet_id);
    body["email"] = serde_json::json!("not-an-email");

    let response = post_json(&app, "/adoptions", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Validation happens before persistence
    assert_eq!(store.adoption_count().await, 0);
}

#[tokio::test]
async fn test_client_amount_mismatch_is_rejected() {
    let (app, _, gateway, _) = setup();
    let pet_id = create_pet(&app).await;

    let mut body = intake_body(&pet_id);
    body["amount_rupees"] = serde_json::json!(1);

    let response = post_json(&app, "/adoptions", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.order_count(), 0);
}

#[tokio::test]
async fn test_second_adopter_conflicts_after_claim() {
    let (app, _, _, _) = setup();
    let pet_id = create_pet(&app).await;

    let first = begin_checkout(&app, &pet_id).await;
    let second = begin_checkout(&app, &pet_id).await;

    let first_order = first["order_id"].as_str().unwrap();
    let response = post_json(
        &app,
        "/payments/verify",
        serde_json::json!({
            "adoption_id": first["adoption_id"],
            "order_id": first_order,
            "payment_id": "pay_1",
            "signature": sign(first_order, "pay_1"),
        }),
    )
    .await;
    assert_eq!(json_body(response).await["valid"], true);

    let second_order = second["order_id"].as_str().unwrap();
    let response = post_json(
        &app,
        "/payments/verify",
        serde_json::json!({
            "adoption_id": second["adoption_id"],
            "order_id": second_order,
            "payment_id": "pay_2",
            "signature": sign(second_order, "pay_2"),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_adoption_for_unknown_pet_is_not_found() {
    let (app, _, _, _) = setup();

    let response = post_json(
        &app,
        "/adoptions",
        intake_body(&uuid::Uuid::new_v4().to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
