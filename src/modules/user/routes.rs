use super::repository;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    modules::auth::{middleware::Auth, repository::session},
    types::Context,
    utils::{
        password,
        validation::{self, validate_phone_number},
    },
};

fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

async fn get_profile(auth: Auth) -> impl IntoResponse {
    (StatusCode::OK, Json(auth.user))
}

#[derive(Deserialize, Validate)]
struct UpdateProfilePayload {
    #[validate(custom(code = "INVALID_PHONE_NUMBER", function = "validate_phone_number"))]
    phone_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    last_name: Option<String>,
    #[validate(url)]
    profile_picture: Option<String>,
}

async fn update_profile(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(payload): Json<UpdateProfilePayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_by_id(
        &ctx.db_conn.pool,
        auth.user.id,
        repository::UpdateUserPayload {
            phone_number: payload.phone_number,
            first_name: payload.first_name,
            last_name: payload.last_name,
            profile_picture: payload.profile_picture,
        },
    )
    .await
    {
        Ok(user) => (StatusCode::OK, Json(json!(user))).into_response(),
        Err(repository::Error::Duplicate) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Phone number already in use" })),
        )
            .into_response(),
        Err(_) => server_error("Failed to update profile"),
    }
}

#[derive(Deserialize, Validate)]
struct ChangePasswordPayload {
    #[validate(length(min = 1))]
    current_password: String,
    #[validate(length(
        min = 8,
        code = "PASSWORD_TOO_SHORT",
        message = "Password must be at least 8 characters"
    ))]
    new_password: String,
}

async fn change_password(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(payload): Json<ChangePasswordPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match password::verify(payload.current_password, auth.user.password_hash.clone()).await {
        Ok(true) => (),
        Ok(false) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Current password is incorrect" })),
            )
                .into_response()
        }
        Err(_) => return server_error("Failed to change password"),
    }

    let Ok(password_hash) = password::hash(payload.new_password).await else {
        return server_error("Failed to change password");
    };

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start database transaction: {}", err);
            return server_error("Failed to change password");
        }
    };

    if repository::update_password_by_id(&mut *tx, auth.user.id.clone(), password_hash)
        .await
        .is_err()
    {
        return server_error("Failed to change password");
    }

    if session::delete_by_user_id_except(&mut *tx, auth.user.id.clone(), auth.session.id)
        .await
        .is_err()
    {
        return server_error("Failed to change password");
    }

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit database transaction: {}", err);
        return server_error("Failed to change password");
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Password changed successfully" })),
    )
        .into_response()
}

async fn delete_profile(State(ctx): State<Arc<Context>>, auth: Auth) -> Response {
    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start database transaction: {}", err);
            return server_error("Failed to delete account");
        }
    };

    if repository::soft_delete_by_id(&mut *tx, auth.user.id.clone())
        .await
        .is_err()
    {
        return server_error("Failed to delete account");
    }

    if session::delete_by_user_id(&mut *tx, auth.user.id.clone())
        .await
        .is_err()
    {
        return server_error("Failed to delete account");
    }

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit database transaction: {}", err);
        return server_error("Failed to delete account");
    }

    tracing::info!("User {} deleted their account", auth.user.id);

    (
        StatusCode::OK,
        Json(json!({ "message": "Account deleted successfully" })),
    )
        .into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route(
            "/",
            get(get_profile)
                .patch(update_profile)
                .delete(delete_profile),
        )
        .route("/password", put(change_password))
}
