//! End-to-end API tests over the full router, with the in-memory store
//! and a stub payment gateway injected in place of MongoDB and Stripe.

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use bistro_api::{create_router, AppConfig, AppState};
use bistro_core::{
    ApiResult, Currency, Identity, MemoryStore, PaymentGateway, PaymentIntent, Review, Role,
    Store, TokenService,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Gateway stub that records the last requested amount and bakes it into
/// the client secret so tests can assert on the wire value.
#[derive(Default)]
struct RecordingGateway {
    last_amount: AtomicI64,
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_intent(&self, amount: i64, currency: Currency) -> ApiResult<PaymentIntent> {
        self.last_amount.store(amount, Ordering::SeqCst);
        Ok(PaymentIntent {
            intent_id: format!("pi_test_{amount}"),
            client_secret: format!("pi_test_secret_{amount}"),
            amount,
            currency,
            status: Some("requires_payment_method".to_string()),
        })
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

fn test_app() -> (TestServer, Arc<MemoryStore>, Arc<RecordingGateway>) {
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(RecordingGateway::default());
    let state = AppState::with_parts(
        store.clone(),
        gateway.clone(),
        TokenService::new("test-secret"),
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            mongodb_uri: String::new(),
            db_name: String::new(),
        },
    );

    let server = TestServer::new(create_router(state)).expect("router should start");
    (server, store, gateway)
}

fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

async fn token_for(server: &TestServer, email: &str) -> String {
    let res = server.post("/jwt").json(&json!({ "email": email })).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    res.json::<Value>()["token"].as_str().unwrap().to_string()
}

async fn add_cart_item(server: &TestServer, email: &str, name: &str, price: f64) -> String {
    let res = server
        .post("/carts")
        .json(&json!({
            "email": email,
            "menuId": "m1",
            "name": name,
            "price": price
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    res.json::<Value>()["insertedId"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn seed_admin(store: &MemoryStore, email: &str) {
    store
        .insert_user(&Identity::new(email, None).with_role(Role::Admin))
        .await
        .unwrap();
}

#[tokio::test]
async fn health_is_open() {
    let (server, _store, _gateway) = test_app();
    let res = server.get("/health").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn token_round_trip_gates_self_scoped_routes() {
    let (server, _store, _gateway) = test_app();

    server
        .post("/users")
        .json(&json!({ "email": "amy@example.com", "name": "Amy" }))
        .await
        .assert_status_ok();

    let token = token_for(&server, "amy@example.com").await;
    let (name, value) = bearer(&token);

    // Own email: allowed, not an admin.
    let res = server
        .get("/users/admin/amy@example.com")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["admin"], false);

    // Someone else's email: forbidden, even though it does not exist.
    let res = server
        .get("/users/admin/nobody@example.com")
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_header_halts_before_the_handler() {
    let (server, store, _gateway) = test_app();

    let res = server
        .post("/menu")
        .json(&json!({
            "name": "Caesar Salad",
            "category": "salad",
            "price": 10.5
        }))
        .await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>()["error"], "unauthorized access");

    // The guarded handler never executed: nothing was written.
    assert!(store.list_menu().await.unwrap().is_empty());
}

#[tokio::test]
async fn unverifiable_token_is_forbidden_access() {
    let (server, _store, _gateway) = test_app();

    let res = server
        .get("/users")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer not-a-real-token"),
        )
        .await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>()["error"], "forbidden access");
}

#[tokio::test]
async fn reviews_are_listed_without_a_token() {
    let (server, store, _gateway) = test_app();
    store.add_review(Review {
        id: None,
        name: "Amy".into(),
        details: "Best pasta in town.".into(),
        rating: 5.0,
    });
    store.add_review(Review {
        id: None,
        name: "Bob".into(),
        details: "Solid soup, slow service.".into(),
        rating: 3.5,
    });

    let res = server.get("/reviews").await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let reviews = res.json::<Value>();
    assert_eq!(reviews.as_array().unwrap().len(), 2);
    let names: Vec<&str> = reviews
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Amy"));
    assert!(names.contains(&"Bob"));
}

#[tokio::test]
async fn non_admin_cannot_reach_admin_routes() {
    let (server, store, _gateway) = test_app();

    server
        .post("/users")
        .json(&json!({ "email": "amy@example.com" }))
        .await
        .assert_status_ok();
    let token = token_for(&server, "amy@example.com").await;
    let (name, value) = bearer(&token);

    let res = server
        .post("/menu")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "Caesar Salad",
            "category": "salad",
            "price": 10.5
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    assert!(store.list_menu().await.unwrap().is_empty());

    let res = server.get("/users").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_manage_the_menu() {
    let (server, store, _gateway) = test_app();
    seed_admin(&store, "boss@example.com").await;

    let token = token_for(&server, "boss@example.com").await;
    let (name, value) = bearer(&token);

    let res = server
        .post("/menu")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "Caesar Salad",
            "category": "salad",
            "price": 10.5
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let id = res.json::<Value>()["insertedId"]
        .as_str()
        .unwrap()
        .to_string();

    let res = server
        .patch(&format!("/menu/{id}"))
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "Caesar Salad",
            "category": "salad",
            "price": 11.0
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["matchedCount"], 1);

    let res = server.get(&format!("/menu/{id}")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["price"], 11.0);

    let res = server
        .delete(&format!("/menu/{id}"))
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["deletedCount"], 1);

    let res = server.get(&format!("/menu/{id}")).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn intent_amount_is_exact_integer_truncation() {
    let (server, _store, gateway) = test_app();

    let token = token_for(&server, "amy@example.com").await;
    let (name, value) = bearer(&token);

    let res = server
        .post("/create-payment-intent")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "price": 19.99 }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    // 1999 exactly: not 1998 (naive truncation of the decimal literal)
    // and not 2000 (rounding).
    assert_eq!(gateway.last_amount.load(Ordering::SeqCst), 1999);

    let res2 = server
        .post("/create-payment-intent")
        .add_header(name, value)
        .json(&json!({ "price": 25.50 }))
        .await;
    assert_eq!(res2.status_code(), StatusCode::OK);
    assert_eq!(
        res2.json::<Value>()["clientSecret"],
        "pi_test_secret_2550"
    );
    assert_eq!(gateway.last_amount.load(Ordering::SeqCst), 2550);

    assert_eq!(res.json::<Value>()["clientSecret"], "pi_test_secret_1999");
}

#[tokio::test]
async fn settlement_end_to_end() {
    let (server, _store, gateway) = test_app();

    server
        .post("/users")
        .json(&json!({ "email": "amy@example.com" }))
        .await
        .assert_status_ok();
    let token = token_for(&server, "amy@example.com").await;
    let (name, value) = bearer(&token);

    let c1 = add_cart_item(&server, "amy@example.com", "Salad", 10.50).await;
    let c2 = add_cart_item(&server, "amy@example.com", "Pasta", 15.00).await;

    let res = server
        .post("/create-payment-intent")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "price": 25.50 }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(gateway.last_amount.load(Ordering::SeqCst), 2550);

    let res = server
        .post("/payments")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "email": "amy@example.com",
            "amount": 2550,
            "currency": "usd",
            "transactionId": "pi_test_2550",
            "cartIds": [c1, c2]
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let outcome = res.json::<Value>();
    assert_eq!(outcome["requested"], 2);
    assert_eq!(outcome["deleted"], 2);

    // Both settled items are gone from the cart listing.
    let res = server.get("/carts?email=amy@example.com").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>().as_array().unwrap().len(), 0);

    // And the payment shows up in the owner's history.
    let res = server
        .get("/payments/amy@example.com")
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let history = res.json::<Value>();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["amount"], 2550);
}

#[tokio::test]
async fn partial_settlement_reports_the_shortfall() {
    let (server, store, _gateway) = test_app();

    server
        .post("/users")
        .json(&json!({ "email": "amy@example.com" }))
        .await
        .assert_status_ok();
    let token = token_for(&server, "amy@example.com").await;
    let (name, value) = bearer(&token);

    let valid = add_cart_item(&server, "amy@example.com", "Salad", 10.50).await;

    let res = server
        .post("/payments")
        .add_header(name, value)
        .json(&json!({
            "email": "amy@example.com",
            "amount": 1050,
            "transactionId": "pi_partial",
            "cartIds": [valid, "already-deleted"]
        }))
        .await;

    // Record created, shortfall reported, no error raised.
    assert_eq!(res.status_code(), StatusCode::OK);
    let outcome = res.json::<Value>();
    assert_eq!(outcome["requested"], 2);
    assert_eq!(outcome["deleted"], 1);
    assert_eq!(store.list_payments("amy@example.com").await.unwrap().len(), 1);
}

#[tokio::test]
async fn settling_someone_elses_payment_is_forbidden() {
    let (server, store, _gateway) = test_app();

    let token = token_for(&server, "amy@example.com").await;
    let (name, value) = bearer(&token);
    let bobs = add_cart_item(&server, "bob@example.com", "Soup", 7.00).await;

    let res = server
        .post("/payments")
        .add_header(name, value)
        .json(&json!({
            "email": "bob@example.com",
            "amount": 700,
            "transactionId": "pi_nope",
            "cartIds": [bobs]
        }))
        .await;

    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    assert!(store.list_payments("bob@example.com").await.unwrap().is_empty());
    assert_eq!(
        store.list_cart_items("bob@example.com").await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn role_change_applies_without_a_new_token() {
    let (server, store, _gateway) = test_app();

    server
        .post("/users")
        .json(&json!({ "email": "amy@example.com" }))
        .await
        .assert_status_ok();
    let token = token_for(&server, "amy@example.com").await;
    let (name, value) = bearer(&token);

    let res = server
        .get("/users")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    // Promote mid-session; the token is unchanged.
    let id = store
        .find_user("amy@example.com")
        .await
        .unwrap()
        .unwrap()
        .id
        .unwrap();
    store.set_user_role(&id, Role::Admin).await.unwrap();

    let res = server.get("/users").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_is_a_noop() {
    let (server, store, _gateway) = test_app();

    server
        .post("/users")
        .json(&json!({ "email": "amy@example.com" }))
        .await
        .assert_status_ok();

    let res = server
        .post("/users")
        .json(&json!({ "email": "amy@example.com" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["message"], "user already exists");
    assert!(res.json::<Value>()["insertedId"].is_null());
    assert_eq!(store.list_users().await.unwrap().len(), 1);
}
