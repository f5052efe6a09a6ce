use super::types::{request, response};
use crate::{
    modules::{
        addon,
        cart::{repository, service as cart_service},
        combo, product,
    },
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

/// The restaurant selling the product or combo, if it can be ordered.
async fn find_restaurant_id(
    ctx: &Context,
    body: &request::Body,
) -> Result<Option<String>, response::Error> {
    match (&body.product_id, &body.combo_id) {
        (Some(product_id), None) => {
            product::repository::find_listing_by_id(&ctx.db_conn.pool, product_id.clone())
                .await
                .map(|listing| listing.map(|listing| listing.product.restaurant_id))
                .map_err(|_| response::Error::FailedToUpdateCart)
        }
        (None, Some(combo_id)) => {
            combo::repository::find_visible_by_id(&ctx.db_conn.pool, combo_id.clone())
                .await
                .map(|combo| combo.map(|combo| combo.restaurant_id))
                .map_err(|_| response::Error::FailedToUpdateCart)
        }
        _ => Ok(None),
    }
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let body = payload.body;
    let addon_ids = cart_service::normalize_addon_ids(body.addon_ids.clone());

    let restaurant_id = find_restaurant_id(&ctx, &body)
        .await?
        .ok_or(response::Error::ItemNotFound)?;

    match &body.product_id {
        Some(product_id) => {
            let attached = addon::repository::find_attached(
                &ctx.db_conn.pool,
                product_id.clone(),
                addon_ids.clone(),
            )
            .await
            .map_err(|_| response::Error::FailedToUpdateCart)?;

            if attached.len() != addon_ids.len() {
                return Err(response::Error::InvalidAddons);
            }
        }
        None if !addon_ids.is_empty() => return Err(response::Error::InvalidAddons),
        None => (),
    }

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToUpdateCart
    })?;

    let cart = repository::upsert_by_customer_id(&mut *tx, payload.auth.user.id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateCart)?;

    let item_count = repository::count_items(&mut *tx, cart.id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateCart)?;

    let from_other_restaurant = cart
        .restaurant_id
        .as_ref()
        .is_some_and(|current| *current != restaurant_id);

    if item_count > 0 && from_other_restaurant {
        if !body.replace {
            return Err(response::Error::DifferentRestaurant);
        }

        repository::clear(&mut tx, cart.id.clone())
            .await
            .map_err(|_| response::Error::FailedToUpdateCart)?;
    }

    repository::set_restaurant(&mut *tx, cart.id.clone(), Some(restaurant_id))
        .await
        .map_err(|_| response::Error::FailedToUpdateCart)?;

    let matching = repository::find_matching_item(
        &mut *tx,
        cart.id.clone(),
        body.product_id.clone(),
        body.combo_id.clone(),
        addon_ids.clone(),
    )
    .await
    .map_err(|_| response::Error::FailedToUpdateCart)?;

    match matching {
        Some(item) => repository::update_item(&mut *tx, item.id, body.quantity, body.note)
            .await
            .map(|_| ()),
        None => repository::create_item(
            &mut *tx,
            repository::CreateCartItemPayload {
                cart_id: cart.id,
                product_id: body.product_id,
                combo_id: body.combo_id,
                quantity: body.quantity,
                addon_ids,
                note: body.note,
            },
        )
        .await
        .map(|_| ()),
    }
    .map_err(|_| response::Error::FailedToUpdateCart)?;

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToUpdateCart
    })?;

    cart_service::view(&ctx, payload.auth.user.id)
        .await
        .map(response::Success::Cart)
        .map_err(|_| response::Error::FailedToUpdateCart)
}
