use super::repository;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    modules::{
        auth::middleware::CustomerAuth,
        product::{self, repository::ProductView},
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

async fn get_favorites(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    pagination: Pagination,
) -> Response {
    match product::repository::find_favorites(&ctx.db_conn.pool, auth.user.id, pagination).await {
        Ok(products) => (StatusCode::OK, Json(json!(products.map(ProductView::from)))).into_response(),
        Err(_) => server_error("Failed to fetch favorites"),
    }
}

async fn add_favorite(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Path(product_id): Path<String>,
) -> Response {
    match product::repository::find_listing_by_id(&ctx.db_conn.pool, product_id.clone()).await {
        Ok(Some(_)) => (),
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Product not found" })),
            )
                .into_response()
        }
        Err(_) => return server_error("Failed to add favorite"),
    };

    match repository::add(&ctx.db_conn.pool, auth.user.id, product_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Product added to favorites" })),
        )
            .into_response(),
        Err(_) => server_error("Failed to add favorite"),
    }
}

async fn remove_favorite(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Path(product_id): Path<String>,
) -> Response {
    match repository::remove(&ctx.db_conn.pool, auth.user.id, product_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Product removed from favorites" })),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Product is not a favorite" })),
        )
            .into_response(),
        Err(_) => server_error("Failed to remove favorite"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_favorites))
        .route("/:product_id", put(add_favorite).delete(remove_favorite))
}
