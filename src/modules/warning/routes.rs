use super::repository;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::{modules::auth::middleware::Auth, types::Context};

async fn get_own_warnings(State(ctx): State<Arc<Context>>, auth: Auth) -> Response {
    match repository::find_many_by_user_id(&ctx.db_conn.pool, auth.user.id).await {
        Ok(warnings) => (StatusCode::OK, Json(json!(warnings))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch warnings" })),
        )
            .into_response(),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(get_own_warnings))
}
