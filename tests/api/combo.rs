use crate::helpers::TestApp;
use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn combo_is_created_with_its_items(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let rice = app.product(&restaurant.id, 1500).await;
    let chicken = app.product(&restaurant.id, 2500).await;

    let (status, combo) = app
        .call(
            Method::POST,
            "/api/combos",
            &restaurant.owner.token,
            Some(json!({
                "name": "Sunday Special",
                "price": "3500",
                "items": [
                    { "product_id": rice, "quantity": 2 },
                    { "product_id": chicken, "quantity": 1 },
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, combo) = app
        .call(
            Method::GET,
            &format!("/api/combos/{}", combo["id"].as_str().unwrap()),
            &restaurant.owner.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(combo["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test]
async fn combo_items_are_validated(pool: PgPool) {
    let app = TestApp::new(pool);
    let restaurant = app.restaurant().await;
    let rice = app.product(&restaurant.id, 1500).await;

    for items in [json!([]), json!([{ "product_id": rice, "quantity": 0 }])] {
        let (status, body) = app
            .call(
                Method::POST,
                "/api/combos",
                &restaurant.owner.token,
                Some(json!({ "name": "Sunday Special", "price": "3500", "items": items })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", items);
        assert!(body["errors"].get("items").is_some(), "{}", body);
    }
}
