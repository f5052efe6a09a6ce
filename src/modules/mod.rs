pub mod addon;
pub mod address;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod category;
pub mod combo;
pub mod config;
pub mod delivery_man;
pub mod favorite;
pub mod home_ad;
pub mod offer;
pub mod order;
pub mod payment;
pub mod product;
pub mod rating;
pub mod restaurant;
pub mod section;
pub mod transaction;
pub mod user;
pub mod wallet;
pub mod warning;

mod router;
pub use router::get_router;
