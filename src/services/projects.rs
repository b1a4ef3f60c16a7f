use std::sync::Arc;

use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::project::{self, Entity as Project, ProjectKind},
    errors::ServiceError,
};

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub kind: ProjectKind,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub kind: Option<ProjectKind>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Sales project/company reference data. Deletion while any stock movement
/// references the project is rejected by the store's foreign key and
/// surfaced as `ReferentialConflict`, keeping the ledger's audit trail
/// resolvable.
#[derive(Clone)]
pub struct ProjectService {
    db_pool: Arc<DbPool>,
}

impl ProjectService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<project::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(Project::find()
            .order_by_asc(project::Column::Name)
            .all(db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, id: Uuid) -> Result<project::Model, ServiceError> {
        let db = &*self.db_pool;
        Project::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {id} not found")))
    }

    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn create_project(&self, input: NewProject) -> Result<project::Model, ServiceError> {
        let model = project::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            kind: Set(input.kind),
            contact_person: Set(input.contact_person),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
        };
        let created = model.insert(&*self.db_pool).await?;
        info!(project_id = %created.id, kind = ?created.kind, "project created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_project(
        &self,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<project::Model, ServiceError> {
        let existing = self.get_project(id).await?;

        let mut model: project::ActiveModel = existing.into();
        if let Some(value) = patch.name {
            model.name = Set(value);
        }
        if let Some(value) = patch.kind {
            model.kind = Set(value);
        }
        if let Some(value) = patch.contact_person {
            model.contact_person = Set(Some(value));
        }
        if let Some(value) = patch.phone {
            model.phone = Set(Some(value));
        }
        if let Some(value) = patch.email {
            model.email = Set(Some(value));
        }
        if let Some(value) = patch.address {
            model.address = Set(Some(value));
        }

        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_project(id).await?;
        existing
            .delete(&*self.db_pool)
            .await
            .map_err(|e| ServiceError::from_fk_violation(e, "project"))?;
        info!(project_id = %id, "project deleted");
        Ok(())
    }
}
