use super::repository;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    modules::auth::middleware::{AdminAuth, DeliveryManAuth},
    types::Context,
    utils::pagination::Pagination,
};

async fn get_delivery_men(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    pagination: Pagination,
    Query(filters): Query<repository::Filters>,
) -> impl IntoResponse {
    match repository::find_many(&ctx.db_conn.pool, pagination, filters).await {
        Ok(delivery_men) => (StatusCode::OK, Json(json!(delivery_men))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch delivery men" })),
        ),
    }
}

async fn get_own_profile(auth: DeliveryManAuth) -> impl IntoResponse {
    (StatusCode::OK, Json(auth.delivery_man))
}

#[derive(Deserialize)]
struct AvailabilityPayload {
    is_available: bool,
}

async fn set_availability(
    State(ctx): State<Arc<Context>>,
    auth: DeliveryManAuth,
    Json(payload): Json<AvailabilityPayload>,
) -> impl IntoResponse {
    match repository::set_availability(
        &ctx.db_conn.pool,
        auth.delivery_man.id,
        payload.is_available,
    )
    .await
    {
        Ok(delivery_man) => (StatusCode::OK, Json(json!(delivery_man))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to update availability" })),
        ),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_delivery_men))
        .route("/me", get(get_own_profile))
        .route("/me/availability", put(set_availability))
}
