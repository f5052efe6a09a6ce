use super::types::{request, response};
use crate::{modules::auth::service, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    service::auth::regenerate_tokens_for_session(ctx, payload.refresh_token)
        .await
        .map(|tokens| response::Success::Tokens(tokens.into()))
        .map_err(|err| match err {
            service::auth::Error::UnexpectedError => response::Error::FailedToRefreshTokens,
            _ => response::Error::InvalidRefreshToken,
        })
}
