use super::repository;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    modules::auth::middleware::CustomerAuth, types::Context, utils::validation,
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
        Json(json!({ "error": "Address not found" })),
    )
        .into_response()
}

async fn get_addresses(State(ctx): State<Arc<Context>>, auth: CustomerAuth) -> Response {
    match repository::find_many_by_customer_id(&ctx.db_conn.pool, auth.user.id).await {
        Ok(addresses) => (StatusCode::OK, Json(json!(addresses))).into_response(),
        Err(_) => server_error("Failed to fetch addresses"),
    }
}

#[derive(Deserialize, Validate)]
struct CreateAddressPayload {
    #[validate(length(min = 1, max = 50))]
    label: String,
    #[validate(length(min = 1, max = 255))]
    street: String,
    #[validate(length(min = 1, max = 100))]
    city: String,
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: Option<f64>,
}

async fn create_address(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Json(payload): Json<CreateAddressPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Failed to create address");
        }
    };

    let address = match repository::create(
        &mut tx,
        repository::CreateAddressPayload {
            customer_id: auth.user.id,
            label: payload.label,
            street: payload.street,
            city: payload.city,
            latitude: payload.latitude,
            longitude: payload.longitude,
        },
    )
    .await
    {
        Ok(address) => address,
        Err(_) => return server_error("Failed to create address"),
    };

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit address {}: {}", address.id, err);
        return server_error("Failed to create address");
    }

    (StatusCode::CREATED, Json(json!(address))).into_response()
}

#[derive(Deserialize, Validate)]
struct UpdateAddressPayload {
    #[validate(length(min = 1, max = 50))]
    label: Option<String>,
    #[validate(length(min = 1, max = 255))]
    street: Option<String>,
    #[validate(length(min = 1, max = 100))]
    city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: Option<f64>,
}

async fn update_address(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAddressPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_owned(
        &ctx.db_conn.pool,
        id,
        auth.user.id,
        repository::UpdateAddressPayload {
            label: payload.label,
            street: payload.street,
            city: payload.city,
            latitude: payload.latitude,
            longitude: payload.longitude,
        },
    )
    .await
    {
        Ok(Some(address)) => (StatusCode::OK, Json(json!(address))).into_response(),
        Ok(None) => not_found(),
        Err(_) => server_error("Failed to update address"),
    }
}

async fn delete_address(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Path(id): Path<String>,
) -> Response {
    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Failed to delete address");
        }
    };

    match repository::delete_owned(&mut tx, id.clone(), auth.user.id).await {
        Ok(Some(_)) => (),
        Ok(None) => return not_found(),
        Err(_) => return server_error("Failed to delete address"),
    };

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit deletion of address {}: {}", id, err);
        return server_error("Failed to delete address");
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Address deleted successfully" })),
    )
        .into_response()
}

async fn set_default_address(
    State(ctx): State<Arc<Context>>,
    auth: CustomerAuth,
    Path(id): Path<String>,
) -> Response {
    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Failed to set default address");
        }
    };

    let address = match repository::set_default(&mut tx, id.clone(), auth.user.id).await {
        Ok(Some(address)) => address,
        Ok(None) => return not_found(),
        Err(_) => return server_error("Failed to set default address"),
    };

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit default address {}: {}", id, err);
        return server_error("Failed to set default address");
    }

    (StatusCode::OK, Json(json!(address))).into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_addresses).post(create_address))
        .route("/:id", patch(update_address).delete(delete_address))
        .route("/:id/default", put(set_default_address))
}
