use super::service::service;
use crate::{modules::auth::middleware::CustomerAuth, types::Context};
use axum::{extract::State, response::IntoResponse};
use std::sync::Arc;

pub async fn handler(State(ctx): State<Arc<Context>>, auth: CustomerAuth) -> impl IntoResponse {
    service(ctx, auth).await
}
