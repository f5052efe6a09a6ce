use super::types::response;
use crate::{
    modules::{
        auth::middleware::CustomerAuth,
        cart::{repository, service as cart_service},
    },
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: CustomerAuth, id: String) -> response::Response {
    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToRemoveItem
    })?;

    let cart = repository::upsert_by_customer_id(&mut *tx, auth.user.id.clone())
        .await
        .map_err(|_| response::Error::FailedToRemoveItem)?;

    let removed = repository::delete_item(&mut *tx, id, cart.id.clone())
        .await
        .map_err(|_| response::Error::FailedToRemoveItem)?;

    if !removed {
        return Err(response::Error::ItemNotFound);
    }

    let remaining = repository::count_items(&mut *tx, cart.id.clone())
        .await
        .map_err(|_| response::Error::FailedToRemoveItem)?;

    if remaining == 0 {
        repository::set_restaurant(&mut *tx, cart.id, None)
            .await
            .map_err(|_| response::Error::FailedToRemoveItem)?;
    }

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToRemoveItem
    })?;

    cart_service::view(&ctx, auth.user.id)
        .await
        .map(response::Success::Cart)
        .map_err(|_| response::Error::FailedToRemoveItem)
}
