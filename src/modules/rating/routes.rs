use super::repository;
use axum::{
    extract::{Json, Query, State},
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
    modules::{auth::middleware::CustomerAuth, order, restaurant},
    types::Context,
    utils::{pagination::Pagination, validation},
};

fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct RatesQuery {
    restaurant_id: String,
}

async fn get_rates(
    State(ctx): State<Arc<Context>>,
    pagination: Pagination,
    Query(query): Query<RatesQuery>,
) -> Response {
    match repository::find_many_by_restaurant_id(&ctx.db_conn.pool, query.restaurant_id, pagination)
        .await
    {
        Ok(rates) => (StatusCode::OK, Json(json!(rates))).into_response(),
        Err(_) => server_error("Failed to fetch ratings"),
    }
}

#[derive(Deserialize, Validate)]
struct CreateRatePayload {
    #[validate(length(min = 1))]
    order_id: String,
    #[validate(range(min = 1, max = 5))]
    rating: i32,
    #[validate(length(max = 1000))]
    comment: Option<String>,
}

async fn create_rate(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Json(payload): Json<CreateRatePayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    let order = match order::repository::find_shipped_by_customer(
        &ctx.db_conn.pool,
        payload.order_id.clone(),
        auth.user.id.clone(),
    )
    .await
    {
        Ok(Some(order)) => order,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "No delivered order to rate" })),
            )
                .into_response()
        }
        Err(_) => return server_error("Failed to rate order"),
    };

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Failed to rate order");
        }
    };

    let rate = match repository::create(
        &mut *tx,
        repository::CreateRatePayload {
            order_id: order.id,
            customer_id: auth.user.id,
            restaurant_id: order.restaurant_id.clone(),
            rating: payload.rating,
            comment: payload.comment,
        },
    )
    .await
    {
        Ok(rate) => rate,
        Err(repository::Error::AlreadyRated) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Order has already been rated" })),
            )
                .into_response()
        }
        Err(_) => return server_error("Failed to rate order"),
    };

    if restaurant::repository::refresh_rating(&mut *tx, order.restaurant_id)
        .await
        .is_err()
    {
        return server_error("Failed to rate order");
    }

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit rate {}: {}", rate.id, err);
        return server_error("Failed to rate order");
    }

    (StatusCode::CREATED, Json(json!(rate))).into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(get_rates).post(create_rate))
}
