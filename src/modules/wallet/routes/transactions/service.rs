use super::types::response;
use crate::{
    modules::{auth::middleware::Auth, transaction, wallet::repository},
    types::Context,
    utils::pagination::Pagination,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: Auth, pagination: Pagination) -> response::Response {
    let wallet = repository::find_by_owner_id(&ctx.db_conn.pool, auth.user.id)
        .await
        .map_err(|_| response::Error::FailedToFetchTransactions)?
        .ok_or(response::Error::WalletNotFound)?;

    transaction::repository::find_many_by_wallet_id(&ctx.db_conn.pool, wallet.id, pagination)
        .await
        .map_err(|_| response::Error::FailedToFetchTransactions)
        .map(response::Success::Transactions)
}
