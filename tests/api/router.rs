use crate::helpers::{lazy_app, request, send, webhook, SECRET_KEY};
use axum::http::{header, Method, Request, StatusCode};
use food_market_backend::utils::payment;
use serde_json::json;

#[tokio::test]
async fn health_check_greets() {
    let (status, body) = send(lazy_app(), request(Method::GET, "/api", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to Food Market API" }));
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    for uri in ["/api/cart", "/api/profile", "/api/wallet", "/api/admin/dashboard"] {
        let (status, _) = send(lazy_app(), request(Method::GET, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/orders")
        .header(header::AUTHORIZATION, "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, _) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_pagination_is_a_bad_request() {
    let (status, body) = send(
        lazy_app(),
        request(Method::GET, "/api/products?page=0", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid pagination options"));

    let (status, _) = send(
        lazy_app(),
        request(Method::GET, "/api/restaurants?per_page=1000", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_without_signature_is_rejected() {
    let (status, _) = send(lazy_app(), webhook(r#"{"event":"charge.success"}"#, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_with_wrong_signature_is_rejected() {
    let raw = r#"{"event":"charge.success"}"#;
    let signature = payment::sign("sk_someone_else", raw.as_bytes()).unwrap();

    let (status, body) = send(lazy_app(), webhook(raw, Some(signature))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid signature"));
}

#[tokio::test]
async fn signed_unknown_events_are_acknowledged() {
    let raw = r#"{"event":"transfer.success","data":{}}"#;
    let signature = payment::sign(SECRET_KEY, raw.as_bytes()).unwrap();

    let (status, body) = send(lazy_app(), webhook(raw, Some(signature))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Event ignored"));
}

#[tokio::test]
async fn charges_with_foreign_metadata_are_acknowledged() {
    for metadata in [json!(""), json!({ "cart_id": "c" })] {
        let raw = json!({
            "event": "charge.success",
            "data": { "reference": "ref_1", "amount": 500000, "metadata": metadata },
        })
        .to_string();
        let signature = payment::sign(SECRET_KEY, raw.as_bytes()).unwrap();

        let (status, body) = send(lazy_app(), webhook(&raw, Some(signature))).await;

        assert_eq!(status, StatusCode::OK, "{}", raw);
        assert_eq!(body["message"], json!("Event ignored"));
    }
}
