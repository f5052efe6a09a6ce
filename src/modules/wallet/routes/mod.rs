mod get;
mod top_up;
mod transactions;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(get::get_router())
        .merge(transactions::get_router())
        .merge(top_up::get_router())
}
