use super::types::{request, response};
use crate::{
    modules::{
        order::repository::{self, OrderStatus, PaymentMethod},
        payment,
    },
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let order = repository::find_by_id(&ctx.db_conn.pool, payload.id)
        .await
        .map_err(|_| response::Error::FailedToCreateInvoice)?
        .filter(|order| order.customer_id == payload.auth.user.id)
        .ok_or(response::Error::OrderNotFound)?;

    if order.payment_method != PaymentMethod::Online {
        return Err(response::Error::NotAnOnlineOrder);
    }

    if order.is_paid {
        return Err(response::Error::AlreadyPaid);
    }

    if order.status != OrderStatus::Pending {
        return Err(response::Error::OrderClosed);
    }

    payment::service::create_order_invoice(ctx, &order, &payload.auth.user)
        .await
        .map(|invoice| response::Success::InvoiceCreated {
            order_id: order.id,
            invoice,
        })
        .map_err(|_| response::Error::FailedToCreateInvoice)
}
