use crate::helpers::{TestApp, TestRestaurant, TestUser};
use axum::http::{Method, StatusCode};
use bigdecimal::BigDecimal;
use serde_json::json;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::time::Duration;

async fn place_order(
    app: &TestApp,
    restaurant: &TestRestaurant,
    price: i64,
    payment_method: &str,
) -> (TestUser, String) {
    let (customer, address_id) = app.ready_cart(restaurant, price, 10000).await;

    let (status, body) = app.checkout(&customer, &address_id, payment_method).await;
    assert_eq!(status, StatusCode::CREATED);

    (customer, body["order"]["id"].as_str().unwrap().to_string())
}

async fn completed_order(app: &TestApp, restaurant: &TestRestaurant) -> (TestUser, String) {
    let (customer, order_id) = place_order(app, restaurant, 2000, "CASH").await;

    for status in ["ACCEPTED", "COMPLETED"] {
        let (code, _) = app.set_status(&restaurant.owner, &order_id, status).await;
        assert_eq!(code, StatusCode::OK, "{}", status);
    }

    (customer, order_id)
}

#[sqlx::test]
async fn cancelling_a_paid_order_refunds_the_wallet(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let (customer, order_id) = place_order(&app, &restaurant, 1000, "WALLET").await;
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(9000));

    let (status, order) = app.set_status(&customer, &order_id, "CANCELLED").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], json!("CANCELLED"));
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(10000));
}

#[sqlx::test]
async fn denying_a_paid_order_refunds_the_wallet(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let (customer, order_id) = place_order(&app, &restaurant, 1000, "WALLET").await;

    let (status, _) = app.set_status(&restaurant.owner, &order_id, "DENIED").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(10000));

    let (status, _) = app.set_status(&customer, &order_id, "CANCELLED").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn shipping_pays_the_restaurant_and_the_delivery_man(pool: PgPool) {
    let app = TestApp::new(pool);
    app.set_fees(500, 10).await;
    let restaurant = app.restaurant().await;
    let delivery_man = app.delivery_man().await;
    let (customer, order_id) = completed_order(&app, &restaurant).await;

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/orders/{}/claim", order_id),
            &delivery_man.user.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.set_status(&delivery_man.user, &order_id, "SHIPPING").await;
    assert_eq!(status, StatusCode::OK);

    let (status, order) = app.set_status(&delivery_man.user, &order_id, "SHIPPED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["is_paid"], json!(true));

    assert_eq!(app.balance(&restaurant.owner.id).await, BigDecimal::from(1800));
    assert_eq!(app.balance(&delivery_man.user.id).await, BigDecimal::from(500));
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(10000));
}

#[sqlx::test]
async fn an_order_is_claimed_once(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let first = app.delivery_man().await;
    let second = app.delivery_man().await;
    let (_, order_id) = completed_order(&app, &restaurant).await;
    let uri = format!("/api/orders/{}/claim", order_id);

    let (status, order) = app.call(Method::POST, &uri, &first.user.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["delivery_man_id"], json!(first.id));

    let (status, _) = app.call(Method::POST, &uri, &second.user.token, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test]
async fn unrelated_restaurants_cannot_move_an_order(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let other = app.restaurant().await;
    let (_, order_id) = place_order(&app, &restaurant, 1000, "CASH").await;

    let (status, _) = app.set_status(&other.owner, &order_id, "ACCEPTED").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn status_updates_run_on_a_single_connection(
    pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let pool = pool_options
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options)
        .await
        .unwrap();
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let (_, order_id) = place_order(&app, &restaurant, 1000, "CASH").await;

    let (status, order) = tokio::time::timeout(
        Duration::from_secs(10),
        app.set_status(&restaurant.owner, &order_id, "ACCEPTED"),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], json!("ACCEPTED"));
}
