use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::warehouse,
    errors::ServiceError,
    services::warehouses::{NewWarehouse, WarehousePatch},
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWarehouseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_warehouses).post(create_warehouse))
        .route(
            "/:id",
            get(get_warehouse)
                .patch(update_warehouse)
                .delete(delete_warehouse),
        )
}

#[utoipa::path(
    get,
    path = "/api/warehouses",
    responses((status = 200, description = "All warehouses", body = [warehouse::Model])),
    tag = "warehouses"
)]
pub async fn list_warehouses(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouses = state.warehouse_service.list_warehouses().await?;
    Ok(Json(warehouses))
}

#[utoipa::path(
    get,
    path = "/api/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse id")),
    responses(
        (status = 200, description = "Warehouse found", body = warehouse::Model),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouse = state.warehouse_service.get_warehouse(id).await?;
    Ok(Json(warehouse))
}

#[utoipa::path(
    post,
    path = "/api/warehouses",
    request_body = CreateWarehouseRequest,
    responses(
        (status = 201, description = "Warehouse created", body = warehouse::Model),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    Json(req): Json<CreateWarehouseRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let warehouse = state
        .warehouse_service
        .create_warehouse(NewWarehouse {
            name: req.name,
            address: req.address,
            description: req.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

#[utoipa::path(
    patch,
    path = "/api/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse id")),
    request_body = UpdateWarehouseRequest,
    responses(
        (status = 200, description = "Warehouse updated", body = warehouse::Model),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn update_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWarehouseRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let warehouse = state
        .warehouse_service
        .update_warehouse(
            id,
            WarehousePatch {
                name: req.name,
                address: req.address,
                description: req.description,
            },
        )
        .await?;
    Ok(Json(warehouse))
}

#[utoipa::path(
    delete,
    path = "/api/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse id")),
    responses(
        (status = 204, description = "Warehouse deleted"),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Warehouse still referenced by products", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.warehouse_service.delete_warehouse(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
