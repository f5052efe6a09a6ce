use super::types::{request, response, ChargeSuccess, Event, CHARGE_SUCCESS};
use crate::{
    modules::{
        order::{self, repository::OrderStatus},
        payment::service::{Metadata, OrderInvoiceMetadata, TopupMetadata},
        wallet,
    },
    types::Context,
    utils::{money, payment},
};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;

async fn begin(ctx: &Context) -> Result<Transaction<'static, Postgres>, response::Error> {
    ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {:?}", err);
        response::Error::ServerError
    })
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), response::Error> {
    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {:?}", err);
        response::Error::ServerError
    })
}

fn credit_outcome(
    result: Result<wallet::repository::Wallet, wallet::service::Error>,
) -> Result<bool, response::Error> {
    match result {
        Ok(_) => Ok(true),
        Err(wallet::service::Error::DuplicateReference) => Ok(false),
        Err(wallet::service::Error::WalletNotFound) => Err(response::Error::WalletNotFound),
        Err(_) => Err(response::Error::ServerError),
    }
}

async fn successful_order_payment(
    ctx: Arc<Context>,
    charge: &ChargeSuccess,
    metadata: OrderInvoiceMetadata,
) -> response::Response {
    let mut tx = begin(&ctx).await?;

    let order = order::repository::find_by_id_for_update(&mut tx, metadata.order_id.clone())
        .await
        .map_err(|_| response::Error::ServerError)?
        .ok_or_else(|| {
            tracing::error!(
                "Order not found for successful transaction: {}",
                &metadata.order_id
            );
            response::Error::OrderNotFound
        })?;

    if order.is_paid {
        return Ok(response::Success::Ignored);
    }

    let expected = money::to_minor_units(&order.total).ok_or(response::Error::ServerError)?;
    if charge.amount < expected {
        tracing::error!(
            "Paid amount {} is less than the total of order {}",
            charge.amount,
            &order.id
        );
        return Err(response::Error::InvalidPayload);
    }

    if matches!(order.status, OrderStatus::Denied | OrderStatus::Cancelled) {
        // The order closed before the money arrived; keep it in the customer's wallet.
        let credited = credit_outcome(
            wallet::service::credit(
                &mut tx,
                wallet::service::MovementPayload {
                    owner_id: order.customer_id.clone(),
                    amount: money::from_minor_units(charge.amount),
                    note: format!("Refund for closed order {}", order.id),
                    reference: Some(charge.reference.clone()),
                },
            )
            .await,
        )?;

        if !credited {
            return Ok(response::Success::Ignored);
        }

        commit(tx).await?;
        tracing::info!("Late payment for closed order {} refunded", order.id);
        return Ok(response::Success::Processed);
    }

    let paid = order::repository::mark_as_paid(&mut *tx, order.id.clone())
        .await
        .map_err(|_| response::Error::ServerError)?;

    if paid.is_none() {
        return Ok(response::Success::Ignored);
    }

    commit(tx).await?;

    tracing::info!("Transaction successful for order {}", order.id);

    Ok(response::Success::Processed)
}

async fn successful_topup(
    ctx: Arc<Context>,
    charge: &ChargeSuccess,
    metadata: TopupMetadata,
) -> response::Response {
    let mut tx = begin(&ctx).await?;

    let credited = credit_outcome(
        wallet::service::credit(
            &mut tx,
            wallet::service::MovementPayload {
                owner_id: metadata.user_id.clone(),
                amount: money::from_minor_units(charge.amount),
                note: "Wallet top-up".to_string(),
                reference: Some(charge.reference.clone()),
            },
        )
        .await,
    )?;

    if !credited {
        tracing::debug!("Top-up {} was already processed", charge.reference);
        return Ok(response::Success::Ignored);
    }

    commit(tx).await?;

    tracing::info!("Top-up transaction successful for {}", metadata.user_id);

    Ok(response::Success::Processed)
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if !payment::verify_signature(
        &ctx.payment.secret_key,
        &payload.signature.0,
        payload.body.as_ref(),
    ) {
        tracing::warn!("Rejected webhook with an invalid signature");
        return Err(response::Error::InvalidSignature);
    }

    let event = serde_json::from_slice::<Event>(payload.body.as_ref()).map_err(|err| {
        tracing::error!("Failed to decode webhook event: {}", err);
        response::Error::InvalidPayload
    })?;

    if event.event != CHARGE_SUCCESS {
        tracing::debug!("Ignoring webhook event {}", event.event);
        return Ok(response::Success::Ignored);
    }

    let charge = serde_json::from_value::<ChargeSuccess>(event.data).map_err(|err| {
        tracing::error!("Failed to decode charge event: {}", err);
        response::Error::InvalidPayload
    })?;

    if charge.amount <= 0 {
        return Err(response::Error::InvalidPayload);
    }

    match charge.metadata() {
        Some(Metadata::Order(metadata)) => successful_order_payment(ctx, &charge, metadata).await,
        Some(Metadata::Topup(metadata)) => successful_topup(ctx, &charge, metadata).await,
        None => {
            tracing::warn!("Charge {} carries no known metadata", charge.reference);
            Ok(response::Success::Ignored)
        }
    }
}
