use super::types::response;
use crate::{
    modules::{auth::middleware::Auth, wallet::repository},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: Auth) -> response::Response {
    repository::find_by_owner_id(&ctx.db_conn.pool, auth.user.id)
        .await
        .map_err(|_| response::Error::FailedToFetchWallet)?
        .ok_or(response::Error::WalletNotFound)
        .map(response::Success::Wallet)
}
