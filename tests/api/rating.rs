use crate::helpers::TestApp;
use axum::http::{Method, StatusCode};
use food_market_backend::modules::order::repository::OrderStatus;
use serde_json::json;
use sqlx::PgPool;
use ulid::Ulid;

async fn order_with_status(
    app: &TestApp,
    customer_id: &str,
    restaurant_id: &str,
    status: OrderStatus,
) -> String {
    let id = Ulid::new().to_string();

    sqlx::query(
        "
        INSERT INTO orders (
            id,
            customer_id,
            restaurant_id,
            delivery_address,
            status,
            payment_method,
            is_paid,
            sub_total,
            delivery_fee,
            service_fee,
            total
        )
        VALUES (
            $1, $2, $3, '12 Marina Road, Lagos', $4,
            'CASH', TRUE, 2000, 0, 0, 2000
        )
        ",
    )
    .bind(id.clone())
    .bind(customer_id)
    .bind(restaurant_id)
    .bind(status)
    .execute(&app.pool)
    .await
    .unwrap();

    id
}

#[sqlx::test]
async fn a_delivered_order_is_rated_once(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let order_id = order_with_status(&app, &customer.id, &restaurant.id, OrderStatus::Shipped).await;
    let rate = json!({ "order_id": order_id, "rating": 4, "comment": "Still warm" });

    let (status, body) = app
        .call(Method::POST, "/api/ratings", &customer.token, Some(rate.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], json!(4));

    let (status, _) = app
        .call(Method::POST, "/api/ratings", &customer.token, Some(rate))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(
        app.count(
            "SELECT rating_count::BIGINT FROM restaurants WHERE id = $1",
            &restaurant.id,
        )
        .await,
        1
    );
}

#[sqlx::test]
async fn undelivered_orders_cannot_be_rated(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let order_id = order_with_status(&app, &customer.id, &restaurant.id, OrderStatus::Pending).await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/ratings",
            &customer.token,
            Some(json!({ "order_id": order_id, "rating": 5 })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
