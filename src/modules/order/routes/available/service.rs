use super::types::response;
use crate::{modules::order::repository, types::Context, utils::pagination::Pagination};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, pagination: Pagination) -> response::Response {
    repository::find_available(&ctx.db_conn.pool, pagination)
        .await
        .map(response::Success::Orders)
        .map_err(|_| response::Error::FailedToFetchOrders)
}
