use super::types::response;
use crate::{
    modules::{auth::middleware::CustomerAuth, cart::repository},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: CustomerAuth) -> response::Response {
    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToClearCart
    })?;

    let cart = repository::upsert_by_customer_id(&mut *tx, auth.user.id)
        .await
        .map_err(|_| response::Error::FailedToClearCart)?;

    repository::clear(&mut tx, cart.id)
        .await
        .map_err(|_| response::Error::FailedToClearCart)?;

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToClearCart
    })?;

    Ok(response::Success::CartCleared)
}
