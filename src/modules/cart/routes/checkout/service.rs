use super::types::{request, response};
use crate::{
    modules::{
        address,
        cart::{
            repository,
            service::{self as cart_service, CheckoutError},
        },
        config,
        order::{self, repository::PaymentMethod},
        payment, restaurant,
        wallet::{self, service::MovementPayload},
    },
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

impl From<CheckoutError> for response::Error {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::EmptyCart,
            CheckoutError::NotAcceptingOrders => Self::NotAcceptingOrders,
            CheckoutError::RestaurantUnavailable => Self::RestaurantUnavailable,
            CheckoutError::BelowMinimum => Self::BelowMinimum,
        }
    }
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let customer = payload.auth.user;
    let body = payload.body;

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToPlaceOrder
    })?;

    let cart = repository::find_by_customer_id_for_update(&mut tx, customer.id.clone())
        .await
        .map_err(|_| response::Error::FailedToPlaceOrder)?
        .ok_or(response::Error::EmptyCart)?;

    let items = repository::find_items_by_cart_id(&mut *tx, cart.id.clone())
        .await
        .map_err(|_| response::Error::FailedToPlaceOrder)?;

    let restaurant_id = match (&cart.restaurant_id, items.is_empty()) {
        (Some(restaurant_id), false) => restaurant_id.clone(),
        _ => return Err(response::Error::EmptyCart),
    };

    let address =
        address::repository::find_owned(&mut *tx, body.address_id.clone(), customer.id.clone())
            .await
            .map_err(|_| response::Error::FailedToPlaceOrder)?
            .ok_or(response::Error::AddressNotFound)?;

    let restaurant = restaurant::repository::find_by_id(&mut *tx, restaurant_id.clone())
        .await
        .map_err(|_| response::Error::FailedToPlaceOrder)?
        .ok_or(response::Error::RestaurantUnavailable)?;

    let config = config::repository::get(&mut *tx)
        .await
        .map_err(|_| response::Error::FailedToPlaceOrder)?;

    let resolved = cart_service::resolve(&mut tx, items)
        .await
        .map_err(|_| response::Error::FailedToPlaceOrder)?;

    if !resolved.unavailable_item_ids.is_empty() {
        return Err(response::Error::UnavailableItems(
            resolved.unavailable_item_ids,
        ));
    }

    let quote = cart_service::quote(&resolved.lines, &config);
    cart_service::check_checkout(&quote, resolved.lines.len(), &restaurant, &config)?;

    let order = order::repository::create(
        &mut *tx,
        order::repository::CreateOrderPayload {
            customer_id: customer.id.clone(),
            restaurant_id,
            delivery_address: address.one_line(),
            delivery_latitude: address.latitude,
            delivery_longitude: address.longitude,
            payment_method: body.payment_method,
            is_paid: body.payment_method == PaymentMethod::Wallet,
            sub_total: quote.sub_total,
            delivery_fee: quote.delivery_fee,
            service_fee: quote.service_fee,
            total: quote.total,
            note: body.note,
        },
    )
    .await
    .map_err(|_| response::Error::FailedToPlaceOrder)?;

    order::repository::create_items(
        &mut tx,
        order.id.clone(),
        resolved
            .lines
            .into_iter()
            .map(|line| order::repository::CreateOrderItemPayload {
                product_id: line.product_id,
                combo_id: line.combo_id,
                name: line.name,
                unit_price: line.unit_price,
                quantity: line.quantity,
                addons: line.addons,
                total: line.line_total,
            })
            .collect(),
    )
    .await
    .map_err(|_| response::Error::FailedToPlaceOrder)?;

    if order.payment_method == PaymentMethod::Wallet {
        wallet::service::debit(
            &mut tx,
            MovementPayload {
                owner_id: customer.id.clone(),
                amount: order.total.clone(),
                note: format!("Payment for order {}", order.id),
                reference: Some(format!("order_{}", order.id)),
            },
        )
        .await
        .map_err(|err| match err {
            wallet::service::Error::InsufficientBalance => response::Error::InsufficientBalance,
            _ => response::Error::FailedToPlaceOrder,
        })?;
    }

    repository::clear(&mut tx, cart.id)
        .await
        .map_err(|_| response::Error::FailedToPlaceOrder)?;

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToPlaceOrder
    })?;

    tracing::info!("Order {} placed by customer {}", order.id, customer.id);

    let items = order::repository::find_items_by_order_id(&ctx.db_conn.pool, order.id.clone())
        .await
        .map_err(|_| response::Error::FailedToPlaceOrder)?;

    // The order stands even if the gateway is down; the customer can retry the payment.
    let invoice = match order.payment_method {
        PaymentMethod::Online => {
            match payment::service::create_order_invoice(ctx.clone(), &order, &customer).await {
                Ok(invoice) => Some(invoice),
                Err(err) => {
                    tracing::warn!("Failed to create invoice for order {}: {:?}", order.id, err);
                    None
                }
            }
        }
        _ => None,
    };

    Ok(response::Success::OrderPlaced {
        order,
        items,
        invoice,
    })
}
