use super::types::{request, response};
use crate::{
    modules::{delivery_man, order::repository},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let delivery_man =
        delivery_man::repository::find_by_id(&ctx.db_conn.pool, payload.body.delivery_man_id)
            .await
            .map_err(|_| response::Error::FailedToAssignOrder)?
            .ok_or(response::Error::DeliveryManNotFound)?;

    repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToAssignOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    let order = repository::assign(&ctx.db_conn.pool, payload.id, delivery_man.id.clone())
        .await
        .map_err(|_| response::Error::FailedToAssignOrder)?
        .ok_or(response::Error::NotAwaitingDelivery)?;

    tracing::info!(
        "Order {} assigned to delivery man {} by {}",
        order.id,
        delivery_man.id,
        payload.auth.user.id
    );

    Ok(response::Success::OrderAssigned(order))
}
