use super::types::{request, response};
use crate::{modules::order::repository, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if !payload.auth.delivery_man.is_available {
        return Err(response::Error::Unavailable);
    }

    repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToClaimOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    let order = repository::claim(
        &ctx.db_conn.pool,
        payload.id,
        payload.auth.delivery_man.id.clone(),
    )
    .await
    .map_err(|_| response::Error::FailedToClaimOrder)?
    .ok_or(response::Error::AlreadyTaken)?;

    tracing::info!(
        "Order {} claimed by delivery man {}",
        order.id,
        payload.auth.delivery_man.id
    );

    Ok(response::Success::OrderClaimed(order))
}
