use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Wallet {
    pub id: String,
    pub owner_id: String,
    pub balance: BigDecimal,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, owner_id: String) -> Result<Wallet, Error> {
    sqlx::query_as::<_, Wallet>(
        "
        INSERT INTO wallets (id, owner_id)
        VALUES ($1, $2)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(owner_id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to create a wallet for {}: {}",
            owner_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: String,
) -> Result<Option<Wallet>, Error> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE owner_id = $1")
        .bind(owner_id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while trying to fetch a wallet by owner_id {}: {}",
                owner_id,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn credit_by_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: String,
    amount: BigDecimal,
) -> Result<Option<Wallet>, Error> {
    sqlx::query_as::<_, Wallet>(
        "
        UPDATE wallets SET
            balance = balance + $1,
            updated_at = NOW()
        WHERE
            owner_id = $2
        RETURNING *
        ",
    )
    .bind(amount)
    .bind(owner_id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to credit wallet of {}: {}",
            owner_id,
            err
        );
        Error::UnexpectedError
    })
}

/// Returns `None` when the wallet is missing or the balance does not cover `amount`.
pub async fn debit_by_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: String,
    amount: BigDecimal,
) -> Result<Option<Wallet>, Error> {
    sqlx::query_as::<_, Wallet>(
        "
        UPDATE wallets SET
            balance = balance - $1,
            updated_at = NOW()
        WHERE
            owner_id = $2
            AND balance >= $1
        RETURNING *
        ",
    )
    .bind(amount)
    .bind(owner_id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to debit wallet of {}: {}",
            owner_id,
            err
        );
        Error::UnexpectedError
    })
}
