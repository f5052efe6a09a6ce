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
    modules::auth::middleware::RestaurantAuth,
    types::Context,
    utils::{
        pagination::Pagination,
        validation::{self, validate_phone_number},
    },
};

async fn get_restaurants(
    State(ctx): State<Arc<Context>>,
    pagination: Pagination,
    Query(filters): Query<repository::Filters>,
) -> impl IntoResponse {
    match repository::find_many(&ctx.db_conn.pool, pagination, filters).await {
        Ok(restaurants) => (StatusCode::OK, Json(json!(restaurants))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch restaurants" })),
        ),
    }
}

async fn get_restaurant_by_id(
    State(ctx): State<Arc<Context>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match repository::find_visible_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(restaurant)) => (StatusCode::OK, Json(json!(restaurant))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Restaurant not found" })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch restaurant" })),
        ),
    }
}

async fn get_own_restaurant(auth: RestaurantAuth) -> impl IntoResponse {
    (StatusCode::OK, Json(auth.restaurant))
}

#[derive(Deserialize, Validate)]
struct UpdateRestaurantPayload {
    #[validate(length(min = 1, max = 150))]
    name: Option<String>,
    description: Option<String>,
    #[validate(url)]
    logo: Option<String>,
    #[validate(length(min = 1))]
    address: Option<String>,
    #[validate(custom(code = "INVALID_PHONE_NUMBER", function = "validate_phone_number"))]
    phone_number: Option<String>,
    is_open: Option<bool>,
}

async fn update_own_restaurant(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Json(payload): Json<UpdateRestaurantPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_by_id(
        &ctx.db_conn.pool,
        auth.restaurant.id,
        repository::UpdateRestaurantPayload {
            name: payload.name,
            description: payload.description,
            logo: payload.logo,
            address: payload.address,
            phone_number: payload.phone_number,
            is_open: payload.is_open,
        },
    )
    .await
    {
        Ok(restaurant) => (StatusCode::OK, Json(json!(restaurant))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to update restaurant" })),
        )
            .into_response(),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_restaurants))
        .route("/me", get(get_own_restaurant).patch(update_own_restaurant))
        .route("/:id", get(get_restaurant_by_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_updates_validate_only_present_fields() {
        let payload: UpdateRestaurantPayload =
            serde_json::from_value(json!({ "is_open": true })).unwrap();
        assert!(payload.validate().is_ok());

        let payload: UpdateRestaurantPayload =
            serde_json::from_value(json!({ "logo": "not a url", "name": "" })).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("logo"));
        assert!(errors.field_errors().contains_key("name"));
    }
}
