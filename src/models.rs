pub mod auth;
pub mod location;
pub mod stock_movement;
pub mod user;
pub mod wine;
