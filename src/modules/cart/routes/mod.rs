mod checkout;
mod clear;
mod get;
mod remove_item;
mod set_item;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(get::get_router())
        .merge(clear::get_router())
        .merge(set_item::get_router())
        .merge(remove_item::get_router())
        .merge(checkout::get_router())
}
