use super::service::service;
use crate::{modules::auth::middleware::CustomerAuth, types::Context};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    service(ctx, auth, id).await
}
