use super::types::{request, response};
use crate::{
    modules::{
        delivery_man,
        order::repository::{self, Scope},
        restaurant,
        user::repository::Role,
    },
    types::Context,
};
use std::sync::Arc;

async fn scope_for(ctx: &Context, payload: &request::Payload) -> Result<Scope, response::Error> {
    let user = &payload.auth.user;

    match user.role {
        Role::Admin => Ok(Scope::All),
        Role::Customer => Ok(Scope::Customer(user.id.clone())),
        Role::Restaurant => restaurant::repository::find_by_owner_id(&ctx.db_conn.pool, user.id.clone())
            .await
            .map_err(|_| response::Error::FailedToFetchOrders)?
            .map(|restaurant| Scope::Restaurant(restaurant.id))
            .ok_or(response::Error::FailedToFetchOrders),
        Role::DeliveryMan => {
            delivery_man::repository::find_by_user_id(&ctx.db_conn.pool, user.id.clone())
                .await
                .map_err(|_| response::Error::FailedToFetchOrders)?
                .map(|delivery_man| Scope::DeliveryMan(delivery_man.id))
                .ok_or(response::Error::FailedToFetchOrders)
        }
    }
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let scope = scope_for(&ctx, &payload).await?;

    repository::find_many(&ctx.db_conn.pool, payload.pagination, scope, payload.filters)
        .await
        .map(response::Success::Orders)
        .map_err(|_| response::Error::FailedToFetchOrders)
}
