mod address;
mod admin;
mod cart;
mod checkout;
mod combo;
mod helpers;
mod order;
mod rating;
mod router;
mod webhook;
