pub mod health;
pub mod movements;
pub mod photos;
pub mod products;
pub mod projects;
pub mod warehouses;
