use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use super::{
    addon, address, admin, auth, cart, category, combo, config, delivery_man, favorite, home_ad,
    offer, order, payment, product, rating, restaurant, section, user, wallet, warning,
};
use crate::types::Context;
use std::sync::Arc;

async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "message": "Welcome to Food Market API" })),
    )
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(health_check))
        .nest("/auth", auth::get_router())
        .nest("/profile", user::get_router())
        .nest("/addresses", address::get_router())
        .nest("/categories", category::get_router())
        .nest("/restaurants", restaurant::get_router())
        .nest("/products", product::get_router())
        .nest("/addons", addon::get_router())
        .nest("/combos", combo::get_router())
        .nest("/offers", offer::get_router())
        .nest("/cart", cart::get_router())
        .nest("/orders", order::get_router())
        .nest("/delivery-men", delivery_man::get_router())
        .nest("/favorites", favorite::get_router())
        .nest("/ratings", rating::get_router())
        .nest("/sections", section::get_router())
        .nest("/config", config::get_router())
        .nest("/home-ads", home_ad::get_router())
        .nest("/wallet", wallet::get_router())
        .nest("/payments", payment::get_router())
        .nest("/admin", admin::get_router())
        .nest("/warnings", warning::get_router())
}
