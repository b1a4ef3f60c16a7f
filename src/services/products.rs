use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, ModelTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as Product},
        product_photo::{self, Entity as ProductPhoto},
        warehouse::{self, Entity as Warehouse},
    },
    errors::ServiceError,
    storage::PhotoStore,
};

/// Input for creating a product. `quantity` here is the initial stock
/// baseline; after creation the field belongs to the ledger.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub stock_code: String,
    pub product_type: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub barcode: Option<String>,
    pub warehouse_id: Option<Uuid>,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub entry_date: Option<DateTime<Utc>>,
}

/// Partial update for a product. Deliberately has no `quantity` field:
/// after creation the quantity is only ever mutated by the ledger service.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub stock_code: Option<String>,
    pub product_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub warehouse_id: Option<Option<Uuid>>,
    pub entry_price: Option<Decimal>,
    pub exit_price: Option<Decimal>,
}

/// A product together with its warehouse and photo attachments.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductWithRelations {
    #[serde(flatten)]
    pub product: product::Model,
    pub warehouse: Option<warehouse::Model>,
    pub photos: Vec<product_photo::Model>,
}

/// Catalog service: product lifecycle.
///
/// Photo rows cascade away with their product at the database level; the
/// photo binaries live in the file store and are removed best-effort after
/// the row delete commits.
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    photo_store: Arc<dyn PhotoStore>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>, photo_store: Arc<dyn PhotoStore>) -> Self {
        Self {
            db_pool,
            photo_store,
        }
    }

    /// Products with relations, newest entry first.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductWithRelations>, ServiceError> {
        let db = &*self.db_pool;
        let products = Product::find()
            .order_by_desc(product::Column::EntryDate)
            .all(db)
            .await?;
        self.attach_relations(products).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<ProductWithRelations, ServiceError> {
        let db = &*self.db_pool;
        let product = Product::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))?;

        let mut with_relations = self.attach_relations(vec![product]).await?;
        Ok(with_relations.remove(0))
    }

    /// Barcode lookup used by scanner-driven clients.
    #[instrument(skip(self))]
    pub async fn get_product_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;
        Product::find()
            .filter(product::Column::Barcode.eq(barcode))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product with barcode '{barcode}' not found"))
            })
    }

    #[instrument(skip(self), fields(stock_code = %input.stock_code))]
    pub async fn create_product(&self, input: NewProduct) -> Result<product::Model, ServiceError> {
        if input.quantity < 0 {
            return Err(ServiceError::ValidationError(
                "initial quantity must not be negative".to_string(),
            ));
        }
        if input.entry_price < Decimal::ZERO || input.exit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "prices must not be negative".to_string(),
            ));
        }
        if let Some(warehouse_id) = input.warehouse_id {
            let db = &*self.db_pool;
            Warehouse::find_by_id(warehouse_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Warehouse {warehouse_id} not found"))
                })?;
        }

        let stock_code = input.stock_code.clone();
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            stock_code: Set(input.stock_code),
            product_type: Set(input.product_type),
            name: Set(input.name),
            description: Set(input.description),
            quantity: Set(input.quantity),
            barcode: Set(input.barcode),
            warehouse_id: Set(input.warehouse_id),
            entry_price: Set(input.entry_price),
            exit_price: Set(input.exit_price),
            entry_date: Set(input.entry_date.unwrap_or_else(Utc::now)),
            main_photo_id: Set(None),
        };

        let created = model
            .insert(&*self.db_pool)
            .await
            .map_err(|e| ServiceError::from_unique_violation(e, &stock_code))?;

        info!(product_id = %created.id, stock_code = %created.stock_code, "product created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = Product::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))?;

        if let Some(Some(warehouse_id)) = patch.warehouse_id {
            Warehouse::find_by_id(warehouse_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Warehouse {warehouse_id} not found"))
                })?;
        }
        if let Some(price) = patch.entry_price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "entry price must not be negative".to_string(),
                ));
            }
        }
        if let Some(price) = patch.exit_price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "exit price must not be negative".to_string(),
                ));
            }
        }

        let stock_code = patch
            .stock_code
            .clone()
            .unwrap_or_else(|| existing.stock_code.clone());

        let mut model: product::ActiveModel = existing.into();
        if let Some(value) = patch.stock_code {
            model.stock_code = Set(value);
        }
        if let Some(value) = patch.product_type {
            model.product_type = Set(value);
        }
        if let Some(value) = patch.name {
            model.name = Set(value);
        }
        if let Some(value) = patch.description {
            model.description = Set(Some(value));
        }
        if let Some(value) = patch.barcode {
            model.barcode = Set(Some(value));
        }
        if let Some(value) = patch.warehouse_id {
            model.warehouse_id = Set(value);
        }
        if let Some(value) = patch.entry_price {
            model.entry_price = Set(value);
        }
        if let Some(value) = patch.exit_price {
            model.exit_price = Set(value);
        }

        let updated = model
            .update(db)
            .await
            .map_err(|e| ServiceError::from_unique_violation(e, &stock_code))?;

        info!(product_id = %updated.id, "product updated");
        Ok(updated)
    }

    /// Deletes the product row; photos and movements cascade away with it.
    ///
    /// Photo files are removed afterwards, best-effort: the row delete has
    /// already committed, so a failed file removal leaves an orphaned blob
    /// which is logged rather than surfaced (the inverse, an orphaned row,
    /// would be user-visible and is the case we refuse to allow).
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let product = Product::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))?;

        let photos = product
            .find_related(ProductPhoto)
            .all(db)
            .await?;

        product.delete(db).await?;

        for photo in &photos {
            if let Err(e) = self.photo_store.remove(&photo.filename).await {
                warn!(
                    filename = %photo.filename,
                    error = %e,
                    "failed to remove photo file for deleted product"
                );
            }
        }

        info!(product_id = %id, photos = photos.len(), "product deleted");
        Ok(())
    }

    async fn attach_relations(
        &self,
        products: Vec<product::Model>,
    ) -> Result<Vec<ProductWithRelations>, ServiceError> {
        let db = &*self.db_pool;
        let warehouses = products.load_one(Warehouse, db).await?;
        let photos = products.load_many(ProductPhoto, db).await?;

        Ok(products
            .into_iter()
            .zip(warehouses)
            .zip(photos)
            .map(|((product, warehouse), photos)| ProductWithRelations {
                product,
                warehouse,
                photos,
            })
            .collect())
    }
}
