use super::types::{request, response};
use crate::{
    modules::{
        admin::service as admin_service,
        config,
        user::{self, repository::Status},
        warning,
    },
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let user = user::repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToWarnUser)?
        .filter(|user| !user.is_deleted)
        .ok_or(response::Error::UserNotFound)?;

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToWarnUser
    })?;

    let warning = warning::repository::create(
        &mut *tx,
        warning::repository::CreateWarningPayload {
            user_id: user.id.clone(),
            issued_by: payload.auth.user.id,
            reason: payload.body.reason,
        },
    )
    .await
    .map_err(|_| response::Error::FailedToWarnUser)?;

    let warning_count = warning::repository::count_by_user_id(&mut *tx, user.id.clone())
        .await
        .map_err(|_| response::Error::FailedToWarnUser)?;

    let config = config::repository::get(&mut *tx)
        .await
        .map_err(|_| response::Error::FailedToWarnUser)?;

    let banned = user.status != Status::Banned
        && admin_service::reaches_threshold(warning_count, config.max_warnings);

    if banned {
        admin_service::ban(&mut tx, user.id.clone())
            .await
            .map_err(|_| response::Error::FailedToWarnUser)?;
    }

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToWarnUser
    })?;

    Ok(response::Success::Warned {
        warning,
        warning_count,
        banned,
    })
}
