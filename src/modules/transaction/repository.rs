use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database::is_unique_violation,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transaction_direction", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionDirection {
    Credit,
    Debit,
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Transaction {
    pub id: String,
    pub wallet_id: String,
    pub amount: BigDecimal,
    pub direction: TransactionDirection,
    pub note: Option<String>,
    pub reference: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
    DuplicateReference,
}

pub struct CreatePayload {
    pub wallet_id: String,
    pub amount: BigDecimal,
    pub direction: TransactionDirection,
    pub note: Option<String>,
    pub reference: Option<String>,
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreatePayload,
) -> Result<Transaction, Error> {
    sqlx::query_as::<_, Transaction>(
        "
        INSERT INTO wallet_transactions (
            id,
            wallet_id,
            amount,
            direction,
            note,
            reference
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.wallet_id.clone())
    .bind(payload.amount)
    .bind(payload.direction)
    .bind(payload.note)
    .bind(payload.reference)
    .fetch_one(e)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            return Error::DuplicateReference;
        }

        tracing::error!(
            "Error occurred while recording a transaction for wallet {}: {}",
            payload.wallet_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_many_by_wallet_id<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    wallet_id: String,
    pagination: Pagination,
) -> Result<Paginated<Transaction>, Error> {
    let transactions = sqlx::query_as::<_, Transaction>(
        "
        SELECT * FROM wallet_transactions
        WHERE wallet_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        OFFSET $3
        ",
    )
    .bind(wallet_id.clone())
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching transactions of wallet {}: {}",
            wallet_id,
            err
        );
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM wallet_transactions WHERE wallet_id = $1",
    )
    .bind(wallet_id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while counting transactions of wallet {}: {}",
            wallet_id,
            err
        );
        Error::UnexpectedError
    })?;

    Ok(Paginated::from_query(transactions, total, &pagination))
}
