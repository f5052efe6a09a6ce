use super::types::{request, response};
use crate::{
    modules::{
        delivery_man, restaurant,
        user::{self, repository::User},
        wallet,
    },
    types::Context,
    utils::password,
};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use validator::Validate;

fn validate<T: Validate>(payload: &T) -> Result<(), response::Error> {
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })
}

async fn create_account(
    tx: &mut Transaction<'_, Postgres>,
    account: request::Account,
    role: user::repository::Role,
    status: user::repository::Status,
) -> Result<User, response::Error> {
    let password_hash = password::hash(account.password)
        .await
        .map_err(|_| response::Error::UnexpectedError)?;

    let user = user::repository::create(
        &mut **tx,
        user::repository::CreateUserPayload {
            email: account.email,
            phone_number: account.phone_number,
            password_hash,
            first_name: account.first_name,
            last_name: account.last_name,
            role,
            status,
        },
    )
    .await
    .map_err(|err| match err {
        user::repository::Error::Duplicate => response::Error::AccountAlreadyExists,
        _ => response::Error::SignupFailed,
    })?;

    wallet::repository::create(&mut **tx, user.id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateWallet)?;

    Ok(user)
}

async fn begin(ctx: &Context) -> Result<Transaction<'static, Postgres>, response::Error> {
    ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::UnexpectedError
    })
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), response::Error> {
    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::UnexpectedError
    })
}

pub async fn customer(ctx: Arc<Context>, payload: request::CustomerPayload) -> response::Response {
    validate(&payload)?;

    let mut tx = begin(&ctx).await?;

    let user = create_account(
        &mut tx,
        payload.account,
        user::repository::Role::Customer,
        user::repository::Status::Active,
    )
    .await?;

    commit(tx).await?;

    tracing::info!("Customer {} signed up", user.id);

    Ok(response::Success::CustomerCreated(user))
}

pub async fn restaurant(
    ctx: Arc<Context>,
    payload: request::RestaurantPayload,
) -> response::Response {
    validate(&payload)?;

    let mut tx = begin(&ctx).await?;

    let phone_number = payload.account.phone_number.clone();
    let user = create_account(
        &mut tx,
        payload.account,
        user::repository::Role::Restaurant,
        user::repository::Status::Pending,
    )
    .await?;

    restaurant::repository::create(
        &mut *tx,
        restaurant::repository::CreateRestaurantPayload {
            owner_id: user.id.clone(),
            name: payload.restaurant_name,
            description: payload.description,
            address: payload.address,
            phone_number: Some(phone_number),
        },
    )
    .await
    .map_err(|_| response::Error::SignupFailed)?;

    commit(tx).await?;

    tracing::info!("Restaurant owner {} signed up", user.id);

    Ok(response::Success::AwaitingApproval(user))
}

pub async fn delivery_man(
    ctx: Arc<Context>,
    payload: request::DeliveryManPayload,
) -> response::Response {
    validate(&payload)?;

    let mut tx = begin(&ctx).await?;

    let user = create_account(
        &mut tx,
        payload.account,
        user::repository::Role::DeliveryMan,
        user::repository::Status::Pending,
    )
    .await?;

    delivery_man::repository::create(&mut *tx, user.id.clone(), payload.vehicle)
        .await
        .map_err(|_| response::Error::SignupFailed)?;

    commit(tx).await?;

    tracing::info!("Delivery man {} signed up", user.id);

    Ok(response::Success::AwaitingApproval(user))
}
