use super::repository::{self, Wallet};
use crate::modules::transaction::{self, repository::TransactionDirection};
use bigdecimal::BigDecimal;
use sqlx::PgConnection;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
    WalletNotFound,
    InsufficientBalance,
    DuplicateReference,
}

pub struct MovementPayload {
    pub owner_id: String,
    pub amount: BigDecimal,
    pub note: String,
    pub reference: Option<String>,
}

async fn record(
    conn: &mut PgConnection,
    wallet: &Wallet,
    direction: TransactionDirection,
    payload: MovementPayload,
) -> Result<(), Error> {
    transaction::repository::create(
        conn,
        transaction::repository::CreatePayload {
            wallet_id: wallet.id.clone(),
            amount: payload.amount,
            direction,
            note: Some(payload.note),
            reference: payload.reference,
        },
    )
    .await
    .map(|_| ())
    .map_err(|err| match err {
        transaction::repository::Error::DuplicateReference => Error::DuplicateReference,
        _ => Error::UnexpectedError,
    })
}

/// Credits the owner's wallet and writes the matching ledger entry. Callers run this
/// inside their own database transaction.
pub async fn credit(conn: &mut PgConnection, payload: MovementPayload) -> Result<Wallet, Error> {
    let wallet =
        repository::credit_by_owner_id(&mut *conn, payload.owner_id.clone(), payload.amount.clone())
            .await
            .map_err(|_| Error::UnexpectedError)?
            .ok_or(Error::WalletNotFound)?;

    record(conn, &wallet, TransactionDirection::Credit, payload).await?;

    Ok(wallet)
}

pub async fn debit(conn: &mut PgConnection, payload: MovementPayload) -> Result<Wallet, Error> {
    let wallet =
        repository::debit_by_owner_id(&mut *conn, payload.owner_id.clone(), payload.amount.clone())
            .await
            .map_err(|_| Error::UnexpectedError)?
            .ok_or(Error::InsufficientBalance)?;

    record(conn, &wallet, TransactionDirection::Debit, payload).await?;

    Ok(wallet)
}
