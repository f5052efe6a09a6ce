use super::{repository::session::Session, service};
use crate::{
    modules::{
        delivery_man::{self, repository::DeliveryMan},
        restaurant::{self, repository::Restaurant},
        user::{
            self,
            repository::{Role, Status, User},
        },
    },
    types::Context,
};
use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::{self, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use serde_json::json;
use std::sync::Arc;

enum Error {
    MissingContext,
    InvalidSession,
    AccountBanned,
    AccountPending,
    Forbidden,
    UnexpectedError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidSession => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid session token" })),
            )
                .into_response(),
            Self::AccountBanned => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Account banned" })),
            )
                .into_response(),
            Self::AccountPending => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Account pending approval" })),
            )
                .into_response(),
            Self::Forbidden => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" }))).into_response()
            }
            Self::MissingContext | Self::UnexpectedError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Sorry an error occurred" })),
            )
                .into_response(),
        }
    }
}

async fn get_user_from_token(ctx: Arc<Context>, token: String) -> Result<(User, Session), Error> {
    let session = service::auth::verify_access_token(ctx.clone(), token)
        .await
        .map_err(|err| match err {
            service::auth::Error::UnexpectedError => Error::UnexpectedError,
            _ => Error::InvalidSession,
        })?;

    let user = user::repository::find_by_id(&ctx.db_conn.pool, session.user_id.clone())
        .await
        .map_err(|_| Error::UnexpectedError)?
        .ok_or(Error::InvalidSession)?;

    if user.is_deleted {
        return Err(Error::InvalidSession);
    }

    match user.status {
        Status::Active => Ok((user, session)),
        Status::Banned => Err(Error::AccountBanned),
        Status::Pending => Err(Error::AccountPending),
    }
}

async fn get_context(parts: &mut Parts) -> Result<Arc<Context>, Error> {
    parts
        .extract::<Extension<Arc<Context>>>()
        .await
        .map(|Extension(ctx)| ctx)
        .map_err(|err| {
            tracing::error!("Application context missing from request: {}", err);
            Error::MissingContext
        })
}

async fn get_user_from_request(
    parts: &mut Parts,
) -> Result<(Arc<Context>, User, Session), Error> {
    let token = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(service::token::from_authorization_header)
        .ok_or(Error::InvalidSession)?;

    let ctx = get_context(parts).await?;
    let (user, session) = get_user_from_token(ctx.clone(), token).await?;

    Ok((ctx, user, session))
}

async fn get_user_with_role(parts: &mut Parts, role: Role) -> Result<(Arc<Context>, User), Error> {
    let (ctx, user, _) = get_user_from_request(parts).await?;

    if user.role != role {
        return Err(Error::Forbidden);
    }

    Ok((ctx, user))
}

/// Any active user holding a valid access token.
#[derive(Clone)]
pub struct Auth {
    pub user: User,
    pub session: Session,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        get_user_from_request(parts)
            .await
            .map(|(_, user, session)| Self { user, session })
            .map_err(IntoResponse::into_response)
    }
}

#[derive(Clone)]
pub struct AdminAuth {
    pub user: User,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        get_user_with_role(parts, Role::Admin)
            .await
            .map(|(_, user)| Self { user })
            .map_err(IntoResponse::into_response)
    }
}

#[derive(Clone)]
pub struct CustomerAuth {
    pub user: User,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CustomerAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        get_user_with_role(parts, Role::Customer)
            .await
            .map(|(_, user)| Self { user })
            .map_err(IntoResponse::into_response)
    }
}

/// A restaurant owner together with the restaurant they run.
#[derive(Clone)]
pub struct RestaurantAuth {
    pub user: User,
    pub restaurant: Restaurant,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RestaurantAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let (ctx, user) = get_user_with_role(parts, Role::Restaurant)
            .await
            .map_err(IntoResponse::into_response)?;

        let restaurant =
            restaurant::repository::find_by_owner_id(&ctx.db_conn.pool, user.id.clone())
                .await
                .map_err(|_| Error::UnexpectedError.into_response())?
                .ok_or_else(|| Error::Forbidden.into_response())?;

        Ok(Self { user, restaurant })
    }
}

#[derive(Clone)]
pub struct DeliveryManAuth {
    pub user: User,
    pub delivery_man: DeliveryMan,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for DeliveryManAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let (ctx, user) = get_user_with_role(parts, Role::DeliveryMan)
            .await
            .map_err(IntoResponse::into_response)?;

        let delivery_man =
            delivery_man::repository::find_by_user_id(&ctx.db_conn.pool, user.id.clone())
                .await
                .map_err(|_| Error::UnexpectedError.into_response())?
                .ok_or_else(|| Error::Forbidden.into_response())?;

        Ok(Self { user, delivery_man })
    }
}
