use chrono::NaiveDateTime;
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub access_token_expires_at: NaiveDateTime,
    pub refresh_token_expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct SessionCreationPayload {
    pub user_id: String,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub access_token_expires_at: NaiveDateTime,
    pub refresh_token_expires_at: NaiveDateTime,
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: SessionCreationPayload,
) -> Result<Session> {
    sqlx::query_as::<_, Session>(
        "
        INSERT INTO sessions (
            id,
            user_id,
            access_token_hash,
            refresh_token_hash,
            access_token_expires_at,
            refresh_token_expires_at
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.user_id.clone())
    .bind(payload.access_token_hash)
    .bind(payload.refresh_token_hash)
    .bind(payload.access_token_expires_at)
    .bind(payload.refresh_token_expires_at)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating a new session for user with id {}: {}",
            payload.user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_access_token_hash<'e, E: PgExecutor<'e>>(
    e: E,
    access_token_hash: String,
) -> Result<Option<Session>> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE access_token_hash = $1")
        .bind(access_token_hash)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching session by access token: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_by_refresh_token_hash<'e, E: PgExecutor<'e>>(
    e: E,
    refresh_token_hash: String,
) -> Result<Option<Session>> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE refresh_token_hash = $1")
        .bind(refresh_token_hash)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching session by refresh token: {}",
                err
            );
            Error::UnexpectedError
        })
}

pub struct RotateSessionPayload {
    pub previous_refresh_token_hash: String,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub access_token_expires_at: NaiveDateTime,
    pub refresh_token_expires_at: NaiveDateTime,
}

/// Replaces both tokens, provided the refresh token has not been rotated already.
pub async fn rotate_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: RotateSessionPayload,
) -> Result<Option<Session>> {
    sqlx::query_as::<_, Session>(
        "
        UPDATE sessions SET
            access_token_hash = $1,
            refresh_token_hash = $2,
            access_token_expires_at = $3,
            refresh_token_expires_at = $4,
            updated_at = NOW()
        WHERE
            id = $5
            AND refresh_token_hash = $6
        RETURNING *
        ",
    )
    .bind(payload.access_token_hash)
    .bind(payload.refresh_token_hash)
    .bind(payload.access_token_expires_at)
    .bind(payload.refresh_token_expires_at)
    .bind(id.clone())
    .bind(payload.previous_refresh_token_hash)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while rotating session {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(id.clone())
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while deleting session {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn delete_by_user_id<'e, E: PgExecutor<'e>>(e: E, user_id: String) -> Result<u64> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id.clone())
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while revoking sessions of user {}: {}",
                user_id,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn delete_by_user_id_except<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
    session_id: String,
) -> Result<u64> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND id <> $2")
        .bind(user_id.clone())
        .bind(session_id)
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while revoking other sessions of user {}: {}",
                user_id,
                err
            );
            Error::UnexpectedError
        })
}
