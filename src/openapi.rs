use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{entities, errors, handlers, services};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stock Ledger API",
        description = r#"
Inventory and stock management API: products, warehouses, sales
projects/companies, product photo attachments, and an append-only stock
movement ledger.

Stock levels are never edited directly. Every change goes through the
ledger as an `entry` or `exit` movement; corrections are recorded as
compensating movements so the audit history stays complete. An exit that
would overdraw a product's stock is rejected.
        "#,
        license(name = "MIT OR Apache-2.0")
    ),
    paths(
        handlers::health::health,
        handlers::warehouses::list_warehouses,
        handlers::warehouses::get_warehouse,
        handlers::warehouses::create_warehouse,
        handlers::warehouses::update_warehouse,
        handlers::warehouses::delete_warehouse,
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::get_product_by_barcode,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::list_photos,
        handlers::products::add_photo,
        handlers::products::movements_for_product,
        handlers::photos::serve_photo,
        handlers::photos::delete_photo,
        handlers::photos::set_main_photo,
        handlers::movements::list_movements,
        handlers::movements::record_movement,
    ),
    components(schemas(
        errors::ErrorResponse,
        entities::warehouse::Model,
        entities::project::Model,
        entities::project::ProjectKind,
        entities::product::Model,
        entities::product_photo::Model,
        entities::stock_movement::Model,
        entities::stock_movement::MovementKind,
        services::products::ProductWithRelations,
        services::ledger::MovementWithRelations,
        handlers::health::HealthResponse,
        handlers::warehouses::CreateWarehouseRequest,
        handlers::warehouses::UpdateWarehouseRequest,
        handlers::projects::CreateProjectRequest,
        handlers::projects::UpdateProjectRequest,
        handlers::products::CreateProductRequest,
        handlers::products::UpdateProductRequest,
        handlers::movements::RecordMovementRequest,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "warehouses", description = "Warehouse reference data"),
        (name = "projects", description = "Sales projects and companies"),
        (name = "products", description = "Product catalog"),
        (name = "photos", description = "Product photo attachments"),
        (name = "stock-movements", description = "Append-only stock ledger")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
