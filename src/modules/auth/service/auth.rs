use chrono::{NaiveDateTime, Utc};

use super::token;
use crate::{
    modules::auth::repository::session::{self, Session},
    types::Context,
};
use std::sync::Arc;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
    InvalidSession,
    ExpiredToken,
}

type Result<T> = std::result::Result<T, Error>;

/// Raw tokens handed to the client; the database only ever sees their hashes.
pub struct IssuedTokens {
    pub session: Session,
    pub access_token: String,
    pub refresh_token: String,
}

fn expiries(ctx: &Context) -> (NaiveDateTime, NaiveDateTime) {
    let now = Utc::now().naive_utc();
    (
        now + ctx.session.access_token_ttl,
        now + ctx.session.refresh_token_ttl,
    )
}

pub async fn create_session(ctx: Arc<Context>, user_id: String) -> Result<IssuedTokens> {
    let access_token = token::generate();
    let refresh_token = token::generate();
    let (access_token_expires_at, refresh_token_expires_at) = expiries(&ctx);

    let session = session::create(
        &ctx.db_conn.pool,
        session::SessionCreationPayload {
            user_id,
            access_token_hash: token::hash(&access_token),
            refresh_token_hash: token::hash(&refresh_token),
            access_token_expires_at,
            refresh_token_expires_at,
        },
    )
    .await
    .map_err(|_| Error::UnexpectedError)?;

    Ok(IssuedTokens {
        session,
        access_token,
        refresh_token,
    })
}

pub async fn regenerate_tokens_for_session(
    ctx: Arc<Context>,
    refresh_token: String,
) -> Result<IssuedTokens> {
    let session = verify_refresh_token(ctx.clone(), refresh_token).await?;

    let access_token = token::generate();
    let refresh_token = token::generate();
    let (access_token_expires_at, refresh_token_expires_at) = expiries(&ctx);

    let session = session::rotate_by_id(
        &ctx.db_conn.pool,
        session.id,
        session::RotateSessionPayload {
            previous_refresh_token_hash: session.refresh_token_hash,
            access_token_hash: token::hash(&access_token),
            refresh_token_hash: token::hash(&refresh_token),
            access_token_expires_at,
            refresh_token_expires_at,
        },
    )
    .await
    .map_err(|_| Error::UnexpectedError)?
    .ok_or(Error::InvalidSession)?;

    Ok(IssuedTokens {
        session,
        access_token,
        refresh_token,
    })
}

pub async fn verify_access_token(ctx: Arc<Context>, access_token: String) -> Result<Session> {
    let session =
        session::find_by_access_token_hash(&ctx.db_conn.pool, token::hash(&access_token))
            .await
            .map_err(|_| Error::UnexpectedError)?
            .ok_or(Error::InvalidSession)?;

    if session.access_token_expires_at < Utc::now().naive_utc() {
        return Err(Error::ExpiredToken);
    };

    Ok(session)
}

pub async fn verify_refresh_token(ctx: Arc<Context>, refresh_token: String) -> Result<Session> {
    let session =
        session::find_by_refresh_token_hash(&ctx.db_conn.pool, token::hash(&refresh_token))
            .await
            .map_err(|_| Error::UnexpectedError)?
            .ok_or(Error::InvalidSession)?;

    if session.refresh_token_expires_at < Utc::now().naive_utc() {
        return Err(Error::ExpiredToken);
    };

    Ok(session)
}

#[derive(serde::Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: NaiveDateTime,
    pub refresh_token_expires_at: NaiveDateTime,
}

impl From<IssuedTokens> for TokenPair {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_at: tokens.session.access_token_expires_at,
            refresh_token_expires_at: tokens.session.refresh_token_expires_at,
        }
    }
}

pub async fn revoke_session(ctx: Arc<Context>, session_id: String) -> Result<()> {
    session::delete_by_id(&ctx.db_conn.pool, session_id)
        .await
        .map_err(|_| Error::UnexpectedError)
}
