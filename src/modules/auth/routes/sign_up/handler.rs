use super::{service, types::request};
use crate::types::Context;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn customer(
    State(ctx): State<Arc<Context>>,
    Json(payload): Json<request::CustomerPayload>,
) -> impl IntoResponse {
    service::customer(ctx, payload).await
}

pub async fn restaurant(
    State(ctx): State<Arc<Context>>,
    Json(payload): Json<request::RestaurantPayload>,
) -> impl IntoResponse {
    service::restaurant(ctx, payload).await
}

pub async fn delivery_man(
    State(ctx): State<Arc<Context>>,
    Json(payload): Json<request::DeliveryManPayload>,
) -> impl IntoResponse {
    service::delivery_man(ctx, payload).await
}
