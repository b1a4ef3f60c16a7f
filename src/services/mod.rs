pub mod ledger;
pub mod photos;
pub mod products;
pub mod projects;
pub mod warehouses;

pub use ledger::LedgerService;
pub use photos::PhotoService;
pub use products::ProductService;
pub use projects::ProjectService;
pub use warehouses::WarehouseService;
