use crate::{
    modules::auth::{middleware::Auth, service},
    types::Context,
};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;

pub async fn handler(State(ctx): State<Arc<Context>>, auth: Auth) -> impl IntoResponse {
    match service::auth::revoke_session(ctx, auth.session.id).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "message": "Signed out" }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to sign out" })),
        ),
    }
}
