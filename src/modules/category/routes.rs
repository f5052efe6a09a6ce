use super::repository;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    modules::auth::middleware::AdminAuth,
    types::Context,
    utils::{pagination::Pagination, validation},
};

fn failure(err: repository::Error, message: &str) -> Response {
    match err {
        repository::Error::DuplicateName => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Category name already in use" })),
        )
            .into_response(),
        repository::Error::UnexpectedError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Category not found" })),
    )
        .into_response()
}

async fn get_categories(
    State(ctx): State<Arc<Context>>,
    pagination: Pagination,
    Query(filters): Query<repository::Filters>,
) -> Response {
    match repository::find_many(&ctx.db_conn.pool, pagination, filters).await {
        Ok(categories) => (StatusCode::OK, Json(json!(categories))).into_response(),
        Err(err) => failure(err, "Failed to fetch categories"),
    }
}

async fn get_category_by_id(State(ctx): State<Arc<Context>>, Path(id): Path<String>) -> Response {
    match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(category)) => (StatusCode::OK, Json(json!(category))).into_response(),
        Ok(None) => not_found(),
        Err(err) => failure(err, "Failed to fetch category"),
    }
}

#[derive(Deserialize, Validate)]
struct CreateCategoryPayload {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(url)]
    image: Option<String>,
}

async fn create_category(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Json(payload): Json<CreateCategoryPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::create(
        &ctx.db_conn.pool,
        repository::CreateCategoryPayload {
            name: payload.name.trim().to_string(),
            image: payload.image,
        },
    )
    .await
    {
        Ok(category) => (StatusCode::CREATED, Json(json!(category))).into_response(),
        Err(err) => failure(err, "Category creation failed"),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateCategoryPayload {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    #[validate(url)]
    image: Option<String>,
    is_active: Option<bool>,
}

async fn update_category(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_by_id(
        &ctx.db_conn.pool,
        id,
        repository::UpdateCategoryPayload {
            name: payload.name.map(|name| name.trim().to_string()),
            image: payload.image,
            is_active: payload.is_active,
        },
    )
    .await
    {
        Ok(Some(category)) => (StatusCode::OK, Json(json!(category))).into_response(),
        Ok(None) => not_found(),
        Err(err) => failure(err, "Failed to update category"),
    }
}

async fn delete_category(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
) -> Response {
    match repository::soft_delete_by_id(&ctx.db_conn.pool, id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Category deleted successfully" })),
        )
            .into_response(),
        Ok(false) => not_found(),
        Err(err) => failure(err, "Failed to delete category"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_categories).post(create_category))
        .route(
            "/:id",
            get(get_category_by_id)
                .patch(update_category)
                .delete(delete_category),
        )
}
