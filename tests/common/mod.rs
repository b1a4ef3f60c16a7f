use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use stockledger_api::{
    app_router,
    config::AppConfig,
    db,
    entities::{product, project::ProjectKind, warehouse},
    services::{
        products::NewProduct,
        projects::NewProject,
        warehouses::NewWarehouse,
    },
    storage::FsPhotoStore,
    AppState,
};

/// Test harness: application state and router over a fresh file-backed
/// SQLite database and a temporary photo directory, both removed when the
/// harness drops.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    upload_dir: TempDir,
    _db_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("failed to create temp db dir");
        let db_path = db_dir.path().join("stockledger_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single pooled connection keeps SQLite writers from tripping over
        // each other's file locks; transactions still interleave at the
        // tokio level.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let upload_dir = tempfile::tempdir().expect("failed to create temp upload dir");
        cfg.upload_dir = upload_dir.path().display().to_string();
        let photo_store = Arc::new(
            FsPhotoStore::create(upload_dir.path())
                .await
                .expect("failed to create photo store"),
        );

        let state = AppState::new(Arc::new(pool), cfg, photo_store);
        let router = app_router(state.clone());

        Self {
            state,
            router,
            upload_dir,
            _db_dir: db_dir,
        }
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Creates a product directly through the service layer.
    pub async fn seed_product(&self, stock_code: &str, quantity: i32) -> product::Model {
        self.state
            .product_service
            .create_product(NewProduct {
                stock_code: stock_code.to_string(),
                product_type: "hardware".to_string(),
                name: format!("Product {stock_code}"),
                description: None,
                quantity,
                barcode: None,
                warehouse_id: None,
                entry_price: Decimal::new(1050, 2),
                exit_price: Decimal::new(1550, 2),
                entry_date: None,
            })
            .await
            .expect("failed to seed product")
    }

    pub async fn seed_warehouse(&self, name: &str) -> warehouse::Model {
        self.state
            .warehouse_service
            .create_warehouse(NewWarehouse {
                name: name.to_string(),
                address: Some("1 Depot Road".to_string()),
                description: None,
            })
            .await
            .expect("failed to seed warehouse")
    }

    pub async fn seed_project(&self, name: &str) -> stockledger_api::entities::project::Model {
        self.state
            .project_service
            .create_project(NewProject {
                name: name.to_string(),
                kind: ProjectKind::Company,
                contact_person: None,
                phone: None,
                email: None,
                address: None,
            })
            .await
            .expect("failed to seed project")
    }

    /// Sends a request through the router and returns status plus parsed
    /// JSON body (Null for empty bodies).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Uploads a photo over the HTTP boundary as multipart/form-data.
    pub async fn upload_photo(
        &self,
        product_id: Uuid,
        bytes: &[u8],
        content_type: &str,
        make_main: bool,
    ) -> (StatusCode, Value) {
        const BOUNDARY: &str = "test-boundary-7f9a2c";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; \
                 filename=\"upload.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
        if make_main {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"is_main\"\r\n\r\ntrue\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/products/{product_id}/photos"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("failed to build upload request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("upload failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
