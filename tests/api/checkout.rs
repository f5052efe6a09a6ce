use crate::helpers::TestApp;
use axum::http::{Method, StatusCode};
use bigdecimal::BigDecimal;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn wallet_checkout_debits_and_empties_the_cart(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let (customer, address_id) = app.ready_cart(&restaurant, 1000, 10000).await;

    let (status, body) = app.checkout(&customer, &address_id, "WALLET").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["is_paid"], json!(true));
    assert_eq!(body["order"]["status"], json!("PENDING"));
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["url"], json!(null));
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(9000));

    let (_, cart) = app.call(Method::GET, "/api/cart", &customer.token, None).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[sqlx::test]
async fn insufficient_balance_places_nothing(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let (customer, address_id) = app.ready_cart(&restaurant, 1000, 500).await;

    let (status, body) = app.checkout(&customer, &address_id, "WALLET").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Insufficient wallet balance"));
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(500));
    assert_eq!(
        app.count("SELECT COUNT(*) FROM orders WHERE customer_id = $1", &customer.id)
            .await,
        0
    );

    let (_, cart) = app.call(Method::GET, "/api/cart", &customer.token, None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[sqlx::test]
async fn empty_cart_cannot_be_checked_out(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer().await;
    let address_id = app.address(&customer.id).await;

    let (status, body) = app.checkout(&customer, &address_id, "CASH").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Cart is empty"));
}

#[sqlx::test]
async fn a_cart_is_checked_out_once_under_double_submit(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let (customer, address_id) = app.ready_cart(&restaurant, 1000, 10000).await;

    let ((first, _), (second, _)) = tokio::join!(
        app.checkout(&customer, &address_id, "WALLET"),
        app.checkout(&customer, &address_id, "WALLET"),
    );

    let mut statuses = vec![first.as_u16(), second.as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![201, 400]);
    assert_eq!(
        app.count("SELECT COUNT(*) FROM orders WHERE customer_id = $1", &customer.id)
            .await,
        1
    );
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(9000));
}
