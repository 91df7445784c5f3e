pub mod auth;
pub mod location_service;
pub mod user_service;
pub mod wine_service;
