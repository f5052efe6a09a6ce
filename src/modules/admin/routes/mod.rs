mod update_user_status;
mod warn_user;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    modules::{
        auth::middleware::AdminAuth,
        order::{self, repository::StatusCount},
        restaurant,
        user::{self, repository::RoleCount},
        warning,
    },
    types::Context,
    utils::pagination::Pagination,
};

fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

async fn get_users(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    pagination: Pagination,
    Query(filters): Query<user::repository::Filters>,
) -> Response {
    match user::repository::find_many(&ctx.db_conn.pool, pagination, filters).await {
        Ok(users) => (StatusCode::OK, Json(json!(users))).into_response(),
        Err(_) => server_error("Failed to fetch users"),
    }
}

async fn get_user_warnings(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
) -> Response {
    match warning::repository::find_many_by_user_id(&ctx.db_conn.pool, id).await {
        Ok(warnings) => (StatusCode::OK, Json(json!(warnings))).into_response(),
        Err(_) => server_error("Failed to fetch warnings"),
    }
}

#[derive(Serialize)]
struct Dashboard {
    users: Vec<RoleCount>,
    restaurants: i64,
    orders: Vec<StatusCount>,
    revenue: BigDecimal,
}

async fn get_dashboard(State(ctx): State<Arc<Context>>, _: AdminAuth) -> Response {
    let pool = &ctx.db_conn.pool;

    let (users, restaurants, orders, revenue) = match tokio::try_join!(
        async { user::repository::count_by_role(pool).await.map_err(|_| ()) },
        async { restaurant::repository::count(pool).await.map_err(|_| ()) },
        async { order::repository::count_by_status(pool).await.map_err(|_| ()) },
        async { order::repository::shipped_revenue(pool).await.map_err(|_| ()) },
    ) {
        Ok(stats) => stats,
        Err(_) => return server_error("Failed to fetch dashboard"),
    };

    (
        StatusCode::OK,
        Json(json!(Dashboard {
            users,
            restaurants,
            orders,
            revenue,
        })),
    )
        .into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/users", get(get_users))
        .route("/users/:id/warnings", get(get_user_warnings))
        .route("/dashboard", get(get_dashboard))
        .merge(update_user_status::get_router())
        .merge(warn_user::get_router())
}
