use crate::helpers::TestApp;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_address(app: &TestApp, token: &str, label: &str) -> Value {
    let (status, body) = app
        .call(
            Method::POST,
            "/api/addresses",
            token,
            Some(json!({ "label": label, "street": "12 Marina Road", "city": "Lagos" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    body
}

fn default_label(addresses: &Value) -> Vec<String> {
    addresses
        .as_array()
        .unwrap()
        .iter()
        .filter(|address| address["is_default"] == json!(true))
        .map(|address| address["label"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test]
async fn first_address_becomes_the_default(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer().await;

    let home = create_address(&app, &customer.token, "Home").await;
    let work = create_address(&app, &customer.token, "Work").await;

    assert_eq!(home["is_default"], json!(true));
    assert_eq!(work["is_default"], json!(false));
}

#[sqlx::test]
async fn deleting_the_default_promotes_the_newest_address(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer().await;

    let home = create_address(&app, &customer.token, "Home").await;
    create_address(&app, &customer.token, "Work").await;
    create_address(&app, &customer.token, "Gym").await;

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/addresses/{}", home["id"].as_str().unwrap()),
            &customer.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, addresses) = app
        .call(Method::GET, "/api/addresses", &customer.token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(addresses.as_array().unwrap().len(), 2);
    assert_eq!(default_label(&addresses), vec!["Gym".to_string()]);
}

#[sqlx::test]
async fn setting_a_default_moves_the_flag(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer().await;

    create_address(&app, &customer.token, "Home").await;
    let work = create_address(&app, &customer.token, "Work").await;

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/addresses/{}/default", work["id"].as_str().unwrap()),
            &customer.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, addresses) = app
        .call(Method::GET, "/api/addresses", &customer.token, None)
        .await;
    assert_eq!(default_label(&addresses), vec!["Work".to_string()]);
}

#[sqlx::test]
async fn another_customers_address_is_not_found(pool: PgPool) {
    let app = TestApp::new(pool);
    let owner = app.customer().await;
    let stranger = app.customer().await;

    let home = create_address(&app, &owner.token, "Home").await;

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/addresses/{}", home["id"].as_str().unwrap()),
            &stranger.token,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
