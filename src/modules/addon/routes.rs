use super::repository;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    modules::auth::middleware::RestaurantAuth,
    types::Context,
    utils::validation::{self, validate_money},
};

fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Addon not found" })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct Filters {
    restaurant_id: String,
}

async fn get_addons(State(ctx): State<Arc<Context>>, Query(filters): Query<Filters>) -> Response {
    match repository::find_many_by_restaurant_id(&ctx.db_conn.pool, filters.restaurant_id).await {
        Ok(addons) => (StatusCode::OK, Json(json!(addons))).into_response(),
        Err(_) => server_error("Failed to fetch addons"),
    }
}

#[derive(Deserialize, Validate)]
struct CreateAddonPayload {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(custom(code = "INVALID_PRICE", function = "validate_money"))]
    price: BigDecimal,
}

async fn create_addon(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Json(payload): Json<CreateAddonPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::create(
        &ctx.db_conn.pool,
        repository::CreateAddonPayload {
            restaurant_id: auth.restaurant.id,
            name: payload.name,
            price: payload.price,
        },
    )
    .await
    {
        Ok(addon) => (StatusCode::CREATED, Json(json!(addon))).into_response(),
        Err(_) => server_error("Addon creation failed"),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateAddonPayload {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    #[validate(custom(code = "INVALID_PRICE", function = "validate_money"))]
    price: Option<BigDecimal>,
    is_active: Option<bool>,
}

async fn update_addon(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAddonPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_owned(
        &ctx.db_conn.pool,
        id,
        auth.restaurant.id,
        repository::UpdateAddonPayload {
            name: payload.name,
            price: payload.price,
            is_active: payload.is_active,
        },
    )
    .await
    {
        Ok(Some(addon)) => (StatusCode::OK, Json(json!(addon))).into_response(),
        Ok(None) => not_found(),
        Err(_) => server_error("Failed to update addon"),
    }
}

async fn delete_addon(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Path(id): Path<String>,
) -> Response {
    match repository::soft_delete_owned(&ctx.db_conn.pool, id, auth.restaurant.id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Addon deleted successfully" })),
        )
            .into_response(),
        Ok(false) => not_found(),
        Err(_) => server_error("Failed to delete addon"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_addons).post(create_addon))
        .route("/:id", patch(update_addon).delete(delete_addon))
}
