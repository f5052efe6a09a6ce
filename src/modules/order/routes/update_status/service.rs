use super::types::{request, response};
use crate::{
    modules::{
        config, delivery_man,
        order::{
            repository::{self, Order, OrderStatus, PaymentMethod},
            service::{self as order_service, TransitionError},
        },
        restaurant, wallet,
    },
    types::Context,
};
use bigdecimal::BigDecimal;
use sqlx::PgConnection;
use std::sync::Arc;

async fn credit(
    conn: &mut PgConnection,
    owner_id: String,
    amount: BigDecimal,
    note: String,
) -> Result<(), response::Error> {
    if amount <= BigDecimal::from(0) {
        return Ok(());
    }

    wallet::service::credit(
        conn,
        wallet::service::MovementPayload {
            owner_id,
            amount,
            note,
            reference: None,
        },
    )
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!("Failed to credit wallet while settling an order: {:?}", err);
        response::Error::FailedToUpdateOrderStatus
    })
}

async fn refund(conn: &mut PgConnection, order: &Order) -> Result<(), response::Error> {
    credit(
        conn,
        order.customer_id.clone(),
        order.total.clone(),
        format!("Refund for order {}", order.id),
    )
    .await
}

/// Pays out the restaurant and the delivery man once the order reaches the customer.
async fn settle(conn: &mut PgConnection, order: Order) -> Result<Order, response::Error> {
    let config = config::repository::get(&mut *conn)
        .await
        .map_err(|_| response::Error::FailedToUpdateOrderStatus)?;

    let restaurant = restaurant::repository::find_by_id(&mut *conn, order.restaurant_id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateOrderStatus)?
        .ok_or(response::Error::FailedToUpdateOrderStatus)?;

    credit(
        &mut *conn,
        restaurant.owner_id,
        order_service::restaurant_share(&order.sub_total, &config.commission_percentage),
        format!("Earnings for order {}", order.id),
    )
    .await?;

    if let Some(delivery_man_id) = order.delivery_man_id.clone() {
        let delivery_man = delivery_man::repository::find_by_id(&mut *conn, delivery_man_id)
            .await
            .map_err(|_| response::Error::FailedToUpdateOrderStatus)?
            .ok_or(response::Error::FailedToUpdateOrderStatus)?;

        credit(
            &mut *conn,
            delivery_man.user_id,
            order.delivery_fee.clone(),
            format!("Delivery fee for order {}", order.id),
        )
        .await?;
    }

    if order.payment_method == PaymentMethod::Cash && !order.is_paid {
        return repository::mark_as_paid(&mut *conn, order.id.clone())
            .await
            .map_err(|_| response::Error::FailedToUpdateOrderStatus)?
            .ok_or(response::Error::FailedToUpdateOrderStatus);
    }

    Ok(order)
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let to = payload.body.status;

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToUpdateOrderStatus
    })?;

    let order = repository::find_by_id_for_update(&mut tx, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateOrderStatus)?
        .ok_or(response::Error::OrderNotFound)?;

    let actor = order_service::resolve_actor(&mut *tx, &payload.auth.user, &order)
        .await
        .map_err(|_| response::Error::FailedToUpdateOrderStatus)?
        .ok_or(response::Error::NotInvolved)?;

    order_service::transition(actor, &order, to).map_err(|err| match err {
        TransitionError::NotAllowed => response::Error::InvalidStatusTransition,
        TransitionError::PaymentRequired => response::Error::PaymentRequired,
    })?;

    let mut updated = repository::transition_status(&mut *tx, order.id.clone(), order.status, to)
        .await
        .map_err(|_| response::Error::FailedToUpdateOrderStatus)?
        .ok_or(response::Error::StatusChanged)?;

    if order_service::refunds(to) && updated.is_paid {
        refund(&mut tx, &updated).await?;
    }

    if to == OrderStatus::Shipped {
        updated = settle(&mut tx, updated).await?;
    }

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToUpdateOrderStatus
    })?;

    tracing::info!(
        "Order {} moved from {:?} to {:?} by {}",
        updated.id,
        order.status,
        to,
        payload.auth.user.id
    );

    Ok(response::Success::OrderStatusUpdated(updated))
}
