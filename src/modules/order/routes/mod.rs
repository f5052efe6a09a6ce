mod assign;
mod available;
mod claim;
mod get;
mod list;
mod pay;
mod update_status;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(list::get_router())
        .merge(available::get_router())
        .merge(get::get_router())
        .merge(update_status::get_router())
        .merge(claim::get_router())
        .merge(assign::get_router())
        .merge(pay::get_router())
}
