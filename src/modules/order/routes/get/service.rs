use super::types::{request, response};
use crate::{
    modules::order::{repository, service as order_service},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let order = repository::find_by_id(&ctx.db_conn.pool, payload.id)
        .await
        .map_err(|_| response::Error::FailedToFetchOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    // Orders the user is not part of are reported as missing.
    order_service::resolve_actor(&ctx.db_conn.pool, &payload.auth.user, &order)
        .await
        .map_err(|_| response::Error::FailedToFetchOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    let items = repository::find_items_by_order_id(&ctx.db_conn.pool, order.id.clone())
        .await
        .map_err(|_| response::Error::FailedToFetchOrder)?;

    Ok(response::Success::Order { order, items })
}
