use super::types::response;
use crate::{
    modules::{auth::middleware::CustomerAuth, cart::service as cart_service},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: CustomerAuth) -> response::Response {
    cart_service::view(&ctx, auth.user.id)
        .await
        .map(response::Success::Cart)
        .map_err(|_| response::Error::FailedToFetchCart)
}
