//! Stock Ledger API Library
//!
//! Inventory and stock management over a relational store: products,
//! warehouses, sales projects, photo attachments, and an append-only
//! movement ledger that owns the product quantity invariant.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod storage;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use services::{LedgerService, PhotoService, ProductService, ProjectService, WarehouseService};
use storage::PhotoStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub ledger_service: LedgerService,
    pub product_service: ProductService,
    pub photo_service: PhotoService,
    pub warehouse_service: WarehouseService,
    pub project_service: ProjectService,
}

impl AppState {
    /// Wires all services over one connection pool and photo store.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        photo_store: Arc<dyn PhotoStore>,
    ) -> Self {
        Self {
            ledger_service: LedgerService::new(db.clone()),
            product_service: ProductService::new(db.clone(), photo_store.clone()),
            photo_service: PhotoService::new(db.clone(), photo_store),
            warehouse_service: WarehouseService::new(db.clone()),
            project_service: ProjectService::new(db.clone()),
            db,
            config,
        }
    }
}

/// Resource routers mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/warehouses", handlers::warehouses::router())
        .nest("/projects", handlers::projects::router())
        .nest("/products", handlers::products::router())
        .nest("/photos", handlers::photos::router())
        .nest("/stock-movements", handlers::movements::router())
}

/// Full application router: health, API, and Swagger UI.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes())
        .merge(openapi::swagger_ui())
        .with_state(state)
}
