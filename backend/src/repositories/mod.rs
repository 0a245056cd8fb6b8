pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod password_reset;
pub mod user;
