use super::types::{request, response};
use crate::{
    modules::{
        admin::service as admin_service,
        restaurant,
        user::{
            self,
            repository::{Role, Status},
        },
    },
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToUpdateStatus
    })?;

    let user = match payload.body.status {
        Status::Active => {
            let user = user::repository::update_status_by_id(
                &mut *tx,
                payload.id.clone(),
                Status::Active,
            )
            .await
            .map_err(|_| response::Error::FailedToUpdateStatus)?
            .ok_or(response::Error::UserNotFound)?;

            if user.role == Role::Restaurant {
                restaurant::repository::set_active_by_owner_id(&mut *tx, user.id.clone(), true)
                    .await
                    .map_err(|_| response::Error::FailedToUpdateStatus)?;
            }

            user
        }
        Status::Banned => admin_service::ban(&mut tx, payload.id.clone())
            .await
            .map_err(|_| response::Error::FailedToUpdateStatus)?
            .ok_or(response::Error::UserNotFound)?,
        Status::Pending => return Err(response::Error::InvalidStatus),
    };

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToUpdateStatus
    })?;

    tracing::info!("User {} is now {:?}", user.id, user.status);

    Ok(response::Success::User(user))
}
