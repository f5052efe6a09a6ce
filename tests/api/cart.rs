use crate::helpers::TestApp;
use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn identical_lines_are_merged(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let product_id = app.product(&restaurant.id, 1500).await;
    let customer = app.customer().await;

    let (status, _) = app.add_to_cart(&customer, &product_id, 2).await;
    assert_eq!(status, StatusCode::OK);

    let (status, cart) = app.add_to_cart(&customer, &product_id, 3).await;
    assert_eq!(status, StatusCode::OK);

    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], json!(3));
    assert_eq!(cart["restaurant_id"], json!(restaurant.id));
}

#[sqlx::test]
async fn items_from_another_restaurant_conflict(pool: PgPool) {
    let app = TestApp::new(pool);
    let first = app.restaurant().await;
    let second = app.restaurant().await;
    let first_product = app.product(&first.id, 1500).await;
    let second_product = app.product(&second.id, 2000).await;
    let customer = app.customer().await;

    let (status, _) = app.add_to_cart(&customer, &first_product, 1).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.add_to_cart(&customer, &second_product, 1).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, cart) = app
        .call(
            Method::PUT,
            "/api/cart/items",
            &customer.token,
            Some(json!({ "product_id": second_product, "quantity": 1, "replace": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], json!(second_product));
    assert_eq!(cart["restaurant_id"], json!(second.id));
}

#[sqlx::test]
async fn an_emptied_cart_accepts_any_restaurant(pool: PgPool) {
    let app = TestApp::new(pool);
    let first = app.restaurant().await;
    let second = app.restaurant().await;
    let first_product = app.product(&first.id, 1500).await;
    let second_product = app.product(&second.id, 2000).await;
    let customer = app.customer().await;

    app.add_to_cart(&customer, &first_product, 1).await;

    let (status, _) = app
        .call(Method::DELETE, "/api/cart", &customer.token, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, cart) = app.add_to_cart(&customer, &second_product, 1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["restaurant_id"], json!(second.id));
}
