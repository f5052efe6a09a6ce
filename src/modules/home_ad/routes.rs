use super::repository;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::{modules::auth::middleware::AdminAuth, types::Context, utils::validation};

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
        Json(json!({ "error": "Home ad not found" })),
    )
        .into_response()
}

fn validate_future(expires_at: &NaiveDateTime) -> Result<(), ValidationError> {
    if *expires_at <= Utc::now().naive_utc() {
        return Err(ValidationError::new("expires_at_in_the_past"));
    }

    Ok(())
}

async fn get_home_ads(State(ctx): State<Arc<Context>>) -> Response {
    match repository::find_live(&ctx.db_conn.pool).await {
        Ok(ads) => (StatusCode::OK, Json(json!(ads))).into_response(),
        Err(_) => server_error("Failed to fetch home ads"),
    }
}

#[derive(Deserialize, Validate)]
struct CreateHomeAdPayload {
    #[validate(url)]
    image: String,
    #[validate(url)]
    link: Option<String>,
    #[serde(default)]
    sort_order: i32,
    #[validate(custom(code = "INVALID_EXPIRY", function = "validate_future"))]
    expires_at: Option<NaiveDateTime>,
}

async fn create_home_ad(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Json(payload): Json<CreateHomeAdPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::create(
        &ctx.db_conn.pool,
        repository::CreateHomeAdPayload {
            image: payload.image,
            link: payload.link,
            sort_order: payload.sort_order,
            expires_at: payload.expires_at,
        },
    )
    .await
    {
        Ok(ad) => (StatusCode::CREATED, Json(json!(ad))).into_response(),
        Err(_) => server_error("Home ad creation failed"),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateHomeAdPayload {
    #[validate(url)]
    image: Option<String>,
    #[validate(url)]
    link: Option<String>,
    sort_order: Option<i32>,
    #[validate(custom(code = "INVALID_EXPIRY", function = "validate_future"))]
    expires_at: Option<NaiveDateTime>,
}

async fn update_home_ad(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateHomeAdPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_by_id(
        &ctx.db_conn.pool,
        id,
        repository::UpdateHomeAdPayload {
            image: payload.image,
            link: payload.link,
            sort_order: payload.sort_order,
            expires_at: payload.expires_at,
        },
    )
    .await
    {
        Ok(Some(ad)) => (StatusCode::OK, Json(json!(ad))).into_response(),
        Ok(None) => not_found(),
        Err(_) => server_error("Failed to update home ad"),
    }
}

async fn delete_home_ad(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
) -> Response {
    match repository::delete_by_id(&ctx.db_conn.pool, id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Home ad deleted successfully" })),
        )
            .into_response(),
        Ok(false) => not_found(),
        Err(_) => server_error("Failed to delete home ad"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_home_ads).post(create_home_ad))
        .route("/:id", patch(update_home_ad).delete(delete_home_ad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn expiry_must_be_in_the_future() {
        let tomorrow = Utc::now().naive_utc() + Duration::days(1);
        let yesterday = Utc::now().naive_utc() - Duration::days(1);

        assert!(validate_future(&tomorrow).is_ok());
        assert!(validate_future(&yesterday).is_err());
    }

    #[test]
    fn image_must_be_a_url() {
        let payload: CreateHomeAdPayload =
            serde_json::from_value(json!({ "image": "not a url" })).unwrap();
        assert!(payload.validate().is_err());

        let payload: CreateHomeAdPayload =
            serde_json::from_value(json!({ "image": "https://cdn.example/banner.png" })).unwrap();
        assert!(payload.validate().is_ok());
    }
}
