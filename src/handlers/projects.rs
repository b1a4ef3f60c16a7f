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
    entities::project::{self, ProjectKind},
    errors::ServiceError,
    services::projects::{NewProject, ProjectPatch},
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub kind: ProjectKind,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub kind: Option<ProjectKind>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(get_project).patch(update_project).delete(delete_project),
        )
}

#[utoipa::path(
    get,
    path = "/api/projects",
    responses((status = 200, description = "All projects", body = [project::Model])),
    tag = "projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let projects = state.project_service.list_projects().await?;
    Ok(Json(projects))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = project::Model),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let project = state.project_service.get_project(id).await?;
    Ok(Json(project))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = project::Model),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let project = state
        .project_service
        .create_project(NewProject {
            name: req.name,
            kind: req.kind,
            contact_person: req.contact_person,
            phone: req.phone,
            email: req.email,
            address: req.address,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = project::Model),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let project = state
        .project_service
        .update_project(
            id,
            ProjectPatch {
                name: req.name,
                kind: req.kind,
                contact_person: req.contact_person,
                phone: req.phone,
                email: req.email,
                address: req.address,
            },
        )
        .await?;
    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Project still referenced by stock movements", body = crate::errors::ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.project_service.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
