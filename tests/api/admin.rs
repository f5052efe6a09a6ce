use crate::helpers::TestApp;
use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn reaching_max_warnings_bans_the_user(pool: PgPool) {
    let app = TestApp::new(pool);
    sqlx::query("UPDATE configs SET max_warnings = 2 WHERE id = 1")
        .execute(&app.pool)
        .await
        .unwrap();
    let admin = app.admin().await;
    let customer = app.customer().await;
    let uri = format!("/api/admin/users/{}/warnings", customer.id);

    let (status, body) = app
        .call(
            Method::POST,
            &uri,
            &admin.token,
            Some(json!({ "reason": "Abusive messages to a rider" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["warning_count"], json!(1));
    assert_eq!(body["banned"], json!(false));

    let (status, body) = app
        .call(
            Method::POST,
            &uri,
            &admin.token,
            Some(json!({ "reason": "Repeated no-show" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["warning_count"], json!(2));
    assert_eq!(body["banned"], json!(true));

    assert_eq!(
        app.count(
            "SELECT COUNT(*) FROM users WHERE id = $1 AND status = 'BANNED'",
            &customer.id,
        )
        .await,
        1
    );

    let (status, _) = app
        .call(Method::GET, "/api/profile", &customer.token, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn only_admins_warn_users(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer().await;
    let other = app.customer().await;

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/admin/users/{}/warnings", other.id),
            &customer.token,
            Some(json!({ "reason": "Spam" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
