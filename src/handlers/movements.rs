use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::stock_movement::{self, MovementKind},
    errors::ServiceError,
    services::ledger::{MovementWithRelations, NewMovement},
    AppState,
};

/// Request body for recording a ledger movement. There is no corresponding
/// update or delete endpoint: the ledger is append-only and corrections are
/// made with compensating movements.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordMovementRequest {
    pub product_id: Uuid,
    pub kind: MovementKind,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub project_id: Option<Uuid>,
    pub notes: Option<String>,
    pub unit_price: Option<Decimal>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_movements).post(record_movement))
}

#[utoipa::path(
    get,
    path = "/api/stock-movements",
    responses((status = 200, description = "Full ledger, newest first", body = [MovementWithRelations])),
    tag = "stock-movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let movements = state.ledger_service.list_movements().await?;
    Ok(Json(movements))
}

#[utoipa::path(
    post,
    path = "/api/stock-movements",
    request_body = RecordMovementRequest,
    responses(
        (status = 201, description = "Movement recorded and quantity adjusted", body = stock_movement::Model),
        (status = 400, description = "Invalid input or insufficient stock", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product or project not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock-movements"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    Json(req): Json<RecordMovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let movement = state
        .ledger_service
        .record_movement(NewMovement {
            product_id: req.product_id,
            kind: req.kind,
            quantity: req.quantity,
            project_id: req.project_id,
            notes: req.notes,
            unit_price: req.unit_price,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
