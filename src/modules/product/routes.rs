use super::repository::{self, ProductView};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use bigdecimal::BigDecimal;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    modules::{addon, auth::middleware::RestaurantAuth},
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
        Json(json!({ "error": "Product not found" })),
    )
        .into_response()
}

async fn get_products(
    State(ctx): State<Arc<Context>>,
    pagination: Pagination,
    Query(filters): Query<repository::Filters>,
) -> Response {
    match repository::find_many(&ctx.db_conn.pool, pagination, filters).await {
        Ok(products) => (StatusCode::OK, Json(json!(products.map(ProductView::from)))).into_response(),
        Err(_) => server_error("Failed to fetch products"),
    }
}

async fn get_product_by_id(State(ctx): State<Arc<Context>>, Path(id): Path<String>) -> Response {
    let listing = match repository::find_listing_by_id(&ctx.db_conn.pool, id.clone()).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return not_found(),
        Err(_) => return server_error("Failed to fetch product"),
    };

    let addons = match addon::repository::find_many_by_product_id(&ctx.db_conn.pool, id).await {
        Ok(addons) => addons,
        Err(_) => return server_error("Failed to fetch product addons"),
    };

    let mut product = json!(ProductView::from(listing));
    product["addons"] = json!(addons);

    (StatusCode::OK, Json(product)).into_response()
}

#[derive(Deserialize, Validate)]
struct CreateProductPayload {
    category_id: Option<String>,
    #[validate(length(min = 1, max = 150))]
    name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    description: String,
    #[validate(url)]
    image: Option<String>,
    #[validate(custom(code = "INVALID_PRICE", function = "validate_positive_money"))]
    price: BigDecimal,
}

async fn create_product(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Json(payload): Json<CreateProductPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::create(
        &ctx.db_conn.pool,
        repository::CreateProductPayload {
            restaurant_id: auth.restaurant.id,
            category_id: payload.category_id,
            name: payload.name,
            description: payload.description,
            image: payload.image,
            price: payload.price,
        },
    )
    .await
    {
        Ok(product) => (StatusCode::CREATED, Json(json!(product))).into_response(),
        Err(_) => server_error("Product creation failed"),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateProductPayload {
    category_id: Option<String>,
    #[validate(length(min = 1, max = 150))]
    name: Option<String>,
    #[validate(length(max = 2000))]
    description: Option<String>,
    #[validate(url)]
    image: Option<String>,
    #[validate(custom(code = "INVALID_PRICE", function = "validate_positive_money"))]
    price: Option<BigDecimal>,
    is_active: Option<bool>,
}

async fn update_product(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_owned(
        &ctx.db_conn.pool,
        id,
        auth.restaurant.id,
        repository::UpdateProductPayload {
            category_id: payload.category_id,
            name: payload.name,
            description: payload.description,
            image: payload.image,
            price: payload.price,
            is_active: payload.is_active,
        },
    )
    .await
    {
        Ok(Some(product)) => (StatusCode::OK, Json(json!(product))).into_response(),
        Ok(None) => not_found(),
        Err(_) => server_error("Failed to update product"),
    }
}

async fn delete_product(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Path(id): Path<String>,
) -> Response {
    match repository::soft_delete_owned(&ctx.db_conn.pool, id, auth.restaurant.id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Product deleted successfully" })),
        )
            .into_response(),
        Ok(false) => not_found(),
        Err(_) => server_error("Failed to delete product"),
    }
}

#[derive(Deserialize)]
struct SetAddonsPayload {
    addon_ids: Vec<String>,
}

async fn set_product_addons(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Path(id): Path<String>,
    Json(payload): Json<SetAddonsPayload>,
) -> Response {
    let addon_ids = payload.addon_ids.into_iter().unique().collect::<Vec<_>>();

    match repository::find_owned(&ctx.db_conn.pool, id.clone(), auth.restaurant.id.clone()).await {
        Ok(Some(_)) => (),
        Ok(None) => return not_found(),
        Err(_) => return server_error("Failed to fetch product"),
    };

    match addon::repository::count_owned(
        &ctx.db_conn.pool,
        auth.restaurant.id.clone(),
        addon_ids.clone(),
    )
    .await
    {
        Ok(count) if count == addon_ids.len() as i64 => (),
        Ok(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Every addon must belong to your restaurant" })),
            )
                .into_response()
        }
        Err(_) => return server_error("Failed to verify addons"),
    };

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Failed to update product addons");
        }
    };

    if repository::set_addons(&mut *tx, id.clone(), addon_ids).await.is_err() {
        return server_error("Failed to update product addons");
    }

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit addons of product {}: {}", id, err);
        return server_error("Failed to update product addons");
    }

    match addon::repository::find_many_by_product_id(&ctx.db_conn.pool, id).await {
        Ok(addons) => (StatusCode::OK, Json(json!(addons))).into_response(),
        Err(_) => server_error("Failed to fetch product addons"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_products).post(create_product))
        .route(
            "/:id",
            get(get_product_by_id)
                .patch(update_product)
                .delete(delete_product),
        )
        .route("/:id/addons", put(set_product_addons))
}
