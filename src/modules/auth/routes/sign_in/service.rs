use super::types::{request, response};
use crate::{
    modules::{auth::service, user},
    types::Context,
    utils::password,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let user = user::repository::find_by_identifier(&ctx.db_conn.pool, payload.identifier)
        .await
        .map_err(|_| response::Error::UnexpectedError)?
        .ok_or(response::Error::InvalidCredentials)?;

    if user.is_deleted {
        return Err(response::Error::InvalidCredentials);
    }

    let password_matches = password::verify(payload.password, user.password_hash.clone())
        .await
        .map_err(|_| response::Error::UnexpectedError)?;

    if !password_matches {
        return Err(response::Error::InvalidCredentials);
    }

    user::repository::can_sign_in(&user).map_err(|status| match status {
        user::repository::Status::Banned => response::Error::AccountBanned,
        _ => response::Error::AccountPending,
    })?;

    let tokens = service::auth::create_session(ctx.clone(), user.id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateSession)?;

    tracing::debug!("User {} signed in", user.id);

    Ok(response::Success::SignedIn(tokens.into(), user))
}
