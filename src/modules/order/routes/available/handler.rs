use super::service::service;
use crate::{
    modules::auth::middleware::DeliveryManAuth, types::Context, utils::pagination::Pagination,
};
use axum::{extract::State, response::IntoResponse};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    _: DeliveryManAuth,
    pagination: Pagination,
) -> impl IntoResponse {
    service(ctx, pagination).await
}
