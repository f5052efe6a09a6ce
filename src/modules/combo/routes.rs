use super::repository::{self, ComboItemPayload};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bigdecimal::BigDecimal;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::{
    modules::{auth::middleware::RestaurantAuth, product},
    types::Context,
    utils::{
        pagination::Pagination,
        validation::{self, validate_positive_money},
    },
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
        Json(json!({ "error": "Combo not found" })),
    )
        .into_response()
}

fn validate_items(items: &[ComboItemPayload]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::new("empty_combo"));
    }

    if items.iter().any(|item| item.quantity < 1) {
        return Err(ValidationError::new("invalid_quantity"));
    }

    if !items.iter().map(|item| &item.product_id).all_unique() {
        return Err(ValidationError::new("duplicate_product"));
    }

    Ok(())
}

/// Every product referenced by the items belongs to the restaurant.
async fn owns_products(
    ctx: &Context,
    restaurant_id: String,
    items: &[ComboItemPayload],
) -> Result<bool, Response> {
    let ids = items
        .iter()
        .map(|item| item.product_id.clone())
        .collect::<Vec<_>>();
    let expected = ids.len() as i64;

    product::repository::count_owned(&ctx.db_conn.pool, restaurant_id, ids)
        .await
        .map(|count| count == expected)
        .map_err(|_| server_error("Failed to verify combo products"))
}

async fn get_combos(
    State(ctx): State<Arc<Context>>,
    pagination: Pagination,
    Query(filters): Query<repository::Filters>,
) -> Response {
    match repository::find_many(&ctx.db_conn.pool, pagination, filters).await {
        Ok(combos) => (StatusCode::OK, Json(json!(combos))).into_response(),
        Err(_) => server_error("Failed to fetch combos"),
    }
}

async fn get_combo_by_id(State(ctx): State<Arc<Context>>, Path(id): Path<String>) -> Response {
    let combo = match repository::find_visible_by_id(&ctx.db_conn.pool, id.clone()).await {
        Ok(Some(combo)) => combo,
        Ok(None) => return not_found(),
        Err(_) => return server_error("Failed to fetch combo"),
    };

    match repository::find_items_by_combo_id(&ctx.db_conn.pool, id).await {
        Ok(items) => {
            let mut combo = json!(combo);
            combo["items"] = json!(items);
            (StatusCode::OK, Json(combo)).into_response()
        }
        Err(_) => server_error("Failed to fetch combo items"),
    }
}

#[derive(Deserialize, Validate)]
struct CreateComboPayload {
    #[validate(length(min = 1, max = 150))]
    name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    description: String,
    #[validate(url)]
    image: Option<String>,
    #[validate(custom(code = "INVALID_PRICE", function = "validate_positive_money"))]
    price: BigDecimal,
    #[validate(custom(code = "INVALID_ITEMS", function = "validate_items"))]
    items: Vec<ComboItemPayload>,
}

async fn create_combo(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Json(payload): Json<CreateComboPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match owns_products(&ctx, auth.restaurant.id.clone(), &payload.items).await {
        Ok(true) => (),
        Ok(false) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Every product must belong to your restaurant" })),
            )
                .into_response()
        }
        Err(res) => return res,
    };

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Combo creation failed");
        }
    };

    let combo = match repository::create(
        &mut *tx,
        repository::CreateComboPayload {
            restaurant_id: auth.restaurant.id,
            name: payload.name,
            description: payload.description,
            image: payload.image,
            price: payload.price,
        },
    )
    .await
    {
        Ok(combo) => combo,
        Err(_) => return server_error("Combo creation failed"),
    };

    if repository::set_items(&mut *tx, combo.id.clone(), payload.items)
        .await
        .is_err()
    {
        return server_error("Combo creation failed");
    }

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit combo {}: {}", combo.id, err);
        return server_error("Combo creation failed");
    }

    (StatusCode::CREATED, Json(json!(combo))).into_response()
}

#[derive(Deserialize, Validate)]
struct UpdateComboPayload {
    #[validate(length(min = 1, max = 150))]
    name: Option<String>,
    #[validate(length(max = 2000))]
    description: Option<String>,
    #[validate(url)]
    image: Option<String>,
    #[validate(custom(code = "INVALID_PRICE", function = "validate_positive_money"))]
    price: Option<BigDecimal>,
    is_active: Option<bool>,
    #[validate(custom(code = "INVALID_ITEMS", function = "validate_items"))]
    items: Option<Vec<ComboItemPayload>>,
}

async fn update_combo(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateComboPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    if let Some(items) = &payload.items {
        match owns_products(&ctx, auth.restaurant.id.clone(), items).await {
            Ok(true) => (),
            Ok(false) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Every product must belong to your restaurant" })),
                )
                    .into_response()
            }
            Err(res) => return res,
        };
    }

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Failed to update combo");
        }
    };

    let combo = match repository::update_owned(
        &mut *tx,
        id.clone(),
        auth.restaurant.id,
        repository::UpdateComboPayload {
            name: payload.name,
            description: payload.description,
            image: payload.image,
            price: payload.price,
            is_active: payload.is_active,
        },
    )
    .await
    {
        Ok(Some(combo)) => combo,
        Ok(None) => return not_found(),
        Err(_) => return server_error("Failed to update combo"),
    };

    if let Some(items) = payload.items {
        if repository::set_items(&mut *tx, id.clone(), items).await.is_err() {
            return server_error("Failed to update combo");
        }
    }

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit combo {}: {}", id, err);
        return server_error("Failed to update combo");
    }

    (StatusCode::OK, Json(json!(combo))).into_response()
}

async fn delete_combo(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Path(id): Path<String>,
) -> Response {
    match repository::soft_delete_owned(&ctx.db_conn.pool, id, auth.restaurant.id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Combo deleted successfully" })),
        )
            .into_response(),
        Ok(false) => not_found(),
        Err(_) => server_error("Failed to delete combo"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_combos).post(create_combo))
        .route(
            "/:id",
            get(get_combo_by_id)
                .patch(update_combo)
                .delete(delete_combo),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, quantity: i32) -> ComboItemPayload {
        ComboItemPayload {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn combo_needs_at_least_one_item() {
        assert!(validate_items(&[]).is_err());
        assert!(validate_items(&[item("rice", 1)]).is_ok());
    }

    #[test]
    fn combo_items_are_unique_with_positive_quantities() {
        assert!(validate_items(&[item("rice", 1), item("rice", 2)]).is_err());
        assert!(validate_items(&[item("rice", 0)]).is_err());
        assert!(validate_items(&[item("rice", 2), item("chicken", 1)]).is_ok());
    }
}
