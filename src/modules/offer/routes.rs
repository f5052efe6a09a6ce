use super::{repository, service};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    modules::{
        auth::middleware::{Auth, RestaurantAuth},
        product, restaurant,
        user::repository::Role,
    },
    types::Context,
    utils::validation,
};

fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

async fn get_running_offers(
    State(ctx): State<Arc<Context>>,
    Query(filters): Query<repository::Filters>,
) -> Response {
    match repository::find_running(&ctx.db_conn.pool, filters).await {
        Ok(offers) => (StatusCode::OK, Json(json!(offers))).into_response(),
        Err(_) => server_error("Failed to fetch offers"),
    }
}

#[derive(Deserialize, Validate)]
struct CreateOfferPayload {
    product_id: String,
    #[validate(range(min = 1, max = 100))]
    discount_percentage: i32,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
}

async fn create_offer(
    State(ctx): State<Arc<Context>>,
    auth: RestaurantAuth,
    Json(payload): Json<CreateOfferPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    if let Err(err) =
        service::validate_window(payload.starts_at, payload.ends_at, Utc::now().naive_utc())
    {
        let message = match err {
            service::WindowError::EndsBeforeStart => "Offer must end after it starts",
            service::WindowError::AlreadyEnded => "Offer must end in the future",
        };
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response();
    }

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Offer creation failed");
        }
    };

    match product::repository::find_owned(
        &mut *tx,
        payload.product_id.clone(),
        auth.restaurant.id.clone(),
    )
    .await
    {
        Ok(Some(_)) => (),
        Ok(None) => return not_found("Product not found"),
        Err(_) => return server_error("Offer creation failed"),
    };

    if product::repository::lock_by_id(&mut *tx, payload.product_id.clone())
        .await
        .is_err()
    {
        return server_error("Offer creation failed");
    }

    match repository::has_overlapping(
        &mut *tx,
        payload.product_id.clone(),
        payload.starts_at,
        payload.ends_at,
    )
    .await
    {
        Ok(false) => (),
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Product already has an offer in this window" })),
            )
                .into_response()
        }
        Err(_) => return server_error("Offer creation failed"),
    };

    let offer = match repository::create(
        &mut *tx,
        repository::CreateOfferPayload {
            product_id: payload.product_id,
            discount_percentage: payload.discount_percentage,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
        },
    )
    .await
    {
        Ok(offer) => offer,
        Err(_) => return server_error("Offer creation failed"),
    };

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit offer {}: {}", offer.id, err);
        return server_error("Offer creation failed");
    }

    (StatusCode::CREATED, Json(json!(offer))).into_response()
}

async fn deactivate_offer(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
) -> Response {
    let offer = match repository::find_by_id(&ctx.db_conn.pool, id.clone()).await {
        Ok(Some(offer)) => offer,
        Ok(None) => return not_found("Offer not found"),
        Err(_) => return server_error("Failed to deactivate offer"),
    };

    match auth.user.role {
        Role::Admin => (),
        Role::Restaurant => {
            let restaurant = match restaurant::repository::find_by_owner_id(
                &ctx.db_conn.pool,
                auth.user.id.clone(),
            )
            .await
            {
                Ok(Some(restaurant)) => restaurant,
                Ok(None) => return not_found("Offer not found"),
                Err(_) => return server_error("Failed to deactivate offer"),
            };

            match product::repository::find_owned(
                &ctx.db_conn.pool,
                offer.product_id.clone(),
                restaurant.id,
            )
            .await
            {
                Ok(Some(_)) => (),
                Ok(None) => return not_found("Offer not found"),
                Err(_) => return server_error("Failed to deactivate offer"),
            }
        }
        _ => {
            return (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" }))).into_response()
        }
    };

    match repository::deactivate_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(offer)) => (StatusCode::OK, Json(json!(offer))).into_response(),
        Ok(None) => not_found("Offer not found"),
        Err(_) => server_error("Failed to deactivate offer"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_running_offers).post(create_offer))
        .route("/:id", delete(deactivate_offer))
}
