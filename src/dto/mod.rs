pub mod auth;
pub mod couriers;
pub mod farms;
pub mod orders;
pub mod products;
pub mod profile;
pub mod shipments;
