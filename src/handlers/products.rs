use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{product, product_photo},
    errors::ServiceError,
    services::{
        ledger::MovementWithRelations,
        photos::PhotoUpload,
        products::{NewProduct, ProductPatch, ProductWithRelations},
    },
    AppState,
};

/// Upload size cap for photo files.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Distinguishes an omitted field (keep current value) from an explicit
/// `null` (clear the value) in PATCH bodies.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 64))]
    pub stock_code: String,
    #[validate(length(min = 1, max = 64))]
    pub product_type: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Initial stock baseline; after creation quantity belongs to the ledger
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub barcode: Option<String>,
    pub warehouse_id: Option<Uuid>,
    #[serde(default)]
    pub entry_price: Decimal,
    #[serde(default)]
    pub exit_price: Decimal,
    pub entry_date: Option<DateTime<Utc>>,
}

/// Partial product update. Quantity is absent on purpose: stock levels are
/// only ever changed through the movement ledger.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 64))]
    pub stock_code: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub product_type: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    /// Double-optional: omitted = keep, null = detach from warehouse
    #[serde(default, deserialize_with = "double_option")]
    pub warehouse_id: Option<Option<Uuid>>,
    pub entry_price: Option<Decimal>,
    pub exit_price: Option<Decimal>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/barcode/:barcode", get(get_product_by_barcode))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/:id/photos", get(list_photos).post(add_photo))
        .route("/:id/movements", get(movements_for_product))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses((status = 200, description = "All products with relations", body = [ProductWithRelations])),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductWithRelations),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    get,
    path = "/api/products/barcode/{barcode}",
    params(("barcode" = String, Path, description = "Product barcode")),
    responses(
        (status = 200, description = "Product found", body = product::Model),
        (status = 404, description = "No product with this barcode", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state
        .product_service
        .get_product_by_barcode(&barcode)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = product::Model),
        (status = 400, description = "Invalid input or duplicate stock code", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let product = state
        .product_service
        .create_product(NewProduct {
            stock_code: req.stock_code,
            product_type: req.product_type,
            name: req.name,
            description: req.description,
            quantity: req.quantity,
            barcode: req.barcode,
            warehouse_id: req.warehouse_id,
            entry_price: req.entry_price,
            exit_price: req.exit_price,
            entry_date: req.entry_date,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = product::Model),
        (status = 400, description = "Invalid input or duplicate stock code", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let product = state
        .product_service
        .update_product(
            id,
            ProductPatch {
                stock_code: req.stock_code,
                product_type: req.product_type,
                name: req.name,
                description: req.description,
                barcode: req.barcode,
                warehouse_id: req.warehouse_id,
                entry_price: req.entry_price,
                exit_price: req.exit_price,
            },
        )
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted along with its photos and movements"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.product_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/photos",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Photos of the product", body = [product_photo::Model]),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "photos"
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let photos = state.photo_service.list_photos(id).await?;
    Ok(Json(photos))
}

/// Multipart upload: field `photo` carries the file, optional field
/// `is_main` ("true"/"1") requests the main flag.
#[utoipa::path(
    post,
    path = "/api/products/{id}/photos",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored", body = product_photo::Model),
        (status = 400, description = "Missing file, unsupported type, or photo cap reached", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "photos"
)]
pub async fn add_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let mut file: Option<(Vec<u8>, String, Option<String>)> = None;
    let mut make_main = false;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ServiceError::ValidationError(format!("malformed multipart request: {e}"))
    })? {
        match field.name() {
            Some("photo") => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let original_filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ServiceError::ValidationError(format!("failed to read upload: {e}"))
                })?;
                file = Some((bytes.to_vec(), content_type, original_filename));
            }
            Some("is_main") => {
                let text = field.text().await.map_err(|e| {
                    ServiceError::ValidationError(format!("failed to read is_main field: {e}"))
                })?;
                make_main = matches!(text.trim(), "true" | "1" | "on");
            }
            _ => {}
        }
    }

    let (bytes, content_type, original_filename) = file.ok_or_else(|| {
        ServiceError::ValidationError("multipart field 'photo' is required".to_string())
    })?;

    let photo = state
        .photo_service
        .add_photo(
            id,
            PhotoUpload {
                bytes,
                content_type,
                original_filename,
                make_main,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/movements",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Movement history for the product, newest first", body = [MovementWithRelations]),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock-movements"
)]
pub async fn movements_for_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let movements = state.ledger_service.movements_for_product(id).await?;
    Ok(Json(movements))
}
