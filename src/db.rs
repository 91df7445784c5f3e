pub mod location_repo;
pub use location_repo::LocationRepository;
pub mod stock_movement_repo;
pub use stock_movement_repo::StockMovementRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod wine_repo;
pub use wine_repo::WineRepository;
