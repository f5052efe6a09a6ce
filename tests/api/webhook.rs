use crate::helpers::{send, webhook, TestApp, SECRET_KEY};
use axum::http::StatusCode;
use bigdecimal::BigDecimal;
use food_market_backend::utils::payment;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn charge(
    app: &TestApp,
    reference: &str,
    amount: i64,
    metadata: Value,
) -> (StatusCode, Value) {
    let raw = json!({
        "event": "charge.success",
        "data": { "reference": reference, "amount": amount, "metadata": metadata },
    })
    .to_string();
    let signature = payment::sign(SECRET_KEY, raw.as_bytes()).unwrap();

    send(app.router.clone(), webhook(&raw, Some(signature))).await
}

#[sqlx::test]
async fn top_up_is_credited_once_per_reference(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer().await;
    let metadata = json!({ "user_id": customer.id });

    let (status, body) = charge(&app, "topup_1", 500000, metadata.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Event processed"));

    let (status, body) = charge(&app, "topup_1", 500000, metadata).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Event ignored"));

    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(5000));
    assert_eq!(
        app.count(
            "
            SELECT COUNT(*) FROM wallet_transactions
            WHERE wallet_id = (SELECT id FROM wallets WHERE owner_id = $1)
            ",
            &customer.id,
        )
        .await,
        1
    );
}

#[sqlx::test]
async fn online_order_is_marked_paid_once(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let (customer, address_id) = app.ready_cart(&restaurant, 1000, 0).await;

    let (status, body) = app.checkout(&customer, &address_id, "ONLINE").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["is_paid"], json!(false));
    let order_id = body["order"]["id"].as_str().unwrap().to_string();
    let metadata = json!({ "order_id": order_id });

    let (status, body) = charge(&app, "order_1", 100000, metadata.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Event processed"));

    let (status, body) = charge(&app, "order_1", 100000, metadata).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Event ignored"));

    assert_eq!(
        app.count(
            "SELECT COUNT(*) FROM orders WHERE id = $1 AND is_paid = TRUE",
            &order_id,
        )
        .await,
        1
    );
    assert_eq!(app.balance(&customer.id).await, BigDecimal::from(0));
}
