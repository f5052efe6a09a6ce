use super::types::{request, response};
use crate::{modules::payment, types::Context};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    payment::service::create_topup_invoice(ctx, &payload.auth.user, &payload.body.amount)
        .await
        .map_err(|_| response::Error::FailedToCreateTopupInvoiceLink)
        .map(response::Success::TopupInvoiceLink)
}
