pub mod product;
pub mod product_photo;
pub mod project;
pub mod stock_movement;
pub mod user;
pub mod warehouse;
