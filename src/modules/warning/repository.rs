use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Warning {
    pub id: String,
    pub user_id: String,
    pub issued_by: Option<String>,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateWarningPayload {
    pub user_id: String,
    pub issued_by: String,
    pub reason: String,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateWarningPayload) -> Result<Warning> {
    sqlx::query_as::<_, Warning>(
        "
        INSERT INTO warnings (id, user_id, issued_by, reason)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.user_id.clone())
    .bind(payload.issued_by)
    .bind(payload.reason)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while warning user {}: {}",
            payload.user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_many_by_user_id<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
) -> Result<Vec<Warning>> {
    sqlx::query_as::<_, Warning>(
        "SELECT * FROM warnings WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching warnings of user {}: {}",
            user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn count_by_user_id<'e, E: PgExecutor<'e>>(e: E, user_id: String) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM warnings WHERE user_id = $1")
        .bind(user_id.clone())
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while counting warnings of user {}: {}",
                user_id,
                err
            );
            Error::UnexpectedError
        })
}
