use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    entities::product_photo,
    errors::ServiceError,
    services::photos::content_type_for,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(serve_photo).delete(delete_photo))
        .route("/:id/main", patch(set_main_photo))
}

/// Serves the stored photo bytes with the content type derived from the
/// stored filename.
#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    params(("id" = Uuid, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo binary", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Photo not found", body = crate::errors::ErrorResponse)
    ),
    tag = "photos"
)]
pub async fn serve_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let (photo, bytes) = state.photo_service.open_photo_file(id).await?;
    Ok((
        [(header::CONTENT_TYPE, content_type_for(&photo.filename))],
        bytes,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    params(("id" = Uuid, Path, description = "Photo id")),
    responses(
        (status = 204, description = "Photo deleted; main flag reassigned if needed"),
        (status = 404, description = "Photo not found", body = crate::errors::ErrorResponse)
    ),
    tag = "photos"
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.photo_service.delete_photo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/photos/{id}/main",
    params(("id" = Uuid, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo is now the product's main photo", body = product_photo::Model),
        (status = 404, description = "Photo not found", body = crate::errors::ErrorResponse)
    ),
    tag = "photos"
)]
pub async fn set_main_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let photo = state.photo_service.get_photo(id).await?;
    let photo = state
        .photo_service
        .set_main_photo(photo.product_id, id)
        .await?;
    Ok(Json(photo))
}
