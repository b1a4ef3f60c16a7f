use std::sync::Arc;

use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::warehouse::{self, Entity as Warehouse},
    errors::ServiceError,
};

#[derive(Debug, Clone)]
pub struct NewWarehouse {
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WarehousePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Warehouse reference data. Deleting a warehouse that still has products
/// is rejected by the store's foreign key and surfaced as
/// `ReferentialConflict`.
#[derive(Clone)]
pub struct WarehouseService {
    db_pool: Arc<DbPool>,
}

impl WarehouseService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_warehouses(&self) -> Result<Vec<warehouse::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(Warehouse::find()
            .order_by_asc(warehouse::Column::Name)
            .all(db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_warehouse(&self, id: Uuid) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;
        Warehouse::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {id} not found")))
    }

    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn create_warehouse(
        &self,
        input: NewWarehouse,
    ) -> Result<warehouse::Model, ServiceError> {
        let model = warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address: Set(input.address),
            description: Set(input.description),
        };
        let created = model.insert(&*self.db_pool).await?;
        info!(warehouse_id = %created.id, "warehouse created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_warehouse(
        &self,
        id: Uuid,
        patch: WarehousePatch,
    ) -> Result<warehouse::Model, ServiceError> {
        let existing = self.get_warehouse(id).await?;

        let mut model: warehouse::ActiveModel = existing.into();
        if let Some(value) = patch.name {
            model.name = Set(value);
        }
        if let Some(value) = patch.address {
            model.address = Set(Some(value));
        }
        if let Some(value) = patch.description {
            model.description = Set(Some(value));
        }

        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_warehouse(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_warehouse(id).await?;
        existing
            .delete(&*self.db_pool)
            .await
            .map_err(|e| ServiceError::from_fk_violation(e, "warehouse"))?;
        info!(warehouse_id = %id, "warehouse deleted");
        Ok(())
    }
}
