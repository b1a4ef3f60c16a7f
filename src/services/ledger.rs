use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as Product},
        project::{self, Entity as Project},
        stock_movement::{self, Entity as StockMovement, MovementKind},
    },
    errors::ServiceError,
};

/// Input for recording a stock movement.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: Uuid,
    pub kind: MovementKind,
    pub quantity: i32,
    pub project_id: Option<Uuid>,
    pub notes: Option<String>,
    pub unit_price: Option<Decimal>,
}

/// A ledger row together with its product and optional sales counterpart.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovementWithRelations {
    #[serde(flatten)]
    pub movement: stock_movement::Model,
    pub product: Option<product::Model>,
    pub project: Option<project::Model>,
}

/// Service owning the append-only stock ledger and, with it, the product
/// quantity invariant: `Product.quantity` always equals the signed sum of
/// the product's movement history plus its creation-time baseline.
///
/// There are no update or delete operations here on purpose. Corrections
/// are recorded as compensating movements so the audit trail stays intact.
#[derive(Clone)]
pub struct LedgerService {
    db_pool: Arc<DbPool>,
}

impl LedgerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a movement and adjusts the product's on-hand quantity in one
    /// transaction.
    ///
    /// The sufficiency check for exits is folded into the quantity update
    /// itself (`UPDATE .. SET quantity = quantity - n WHERE id = ? AND
    /// quantity >= n`), so two concurrent exits can never both pass a check
    /// against a stale value: whichever transaction applies second sees the
    /// already-decremented row and matches zero rows. Zero rows affected
    /// rolls the movement row back and surfaces `InsufficientStock`.
    #[instrument(skip(self), fields(product_id = %input.product_id))]
    pub async fn record_movement(
        &self,
        input: NewMovement,
    ) -> Result<stock_movement::Model, ServiceError> {
        if input.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "movement quantity must be positive".to_string(),
            ));
        }
        if let Some(price) = input.unit_price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "unit price must not be negative".to_string(),
                ));
            }
        }

        let txn = self.db_pool.begin().await?;

        let product = Product::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        if let Some(project_id) = input.project_id {
            Project::find_by_id(project_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Project {project_id} not found"))
                })?;
        }

        let movement = stock_movement::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(input.product_id),
            kind: Set(input.kind),
            quantity: Set(input.quantity),
            project_id: Set(input.project_id),
            notes: Set(input.notes.clone()),
            date: Set(Utc::now()),
            unit_price: Set(input.unit_price),
        };
        let movement = movement.insert(&txn).await?;

        let quantity_update = match input.kind {
            MovementKind::Entry => Product::update_many()
                .col_expr(
                    product::Column::Quantity,
                    Expr::col(product::Column::Quantity).add(input.quantity),
                )
                .filter(product::Column::Id.eq(input.product_id)),
            MovementKind::Exit => Product::update_many()
                .col_expr(
                    product::Column::Quantity,
                    Expr::col(product::Column::Quantity).sub(input.quantity),
                )
                .filter(product::Column::Id.eq(input.product_id))
                .filter(product::Column::Quantity.gte(input.quantity)),
        };

        let result = quantity_update.exec(&txn).await?;
        if result.rows_affected == 0 {
            // The product row existed above, so the guard on quantity is the
            // only filter that can have failed.
            txn.rollback().await?;
            return Err(ServiceError::InsufficientStock(format!(
                "product '{}' has {} in stock, cannot exit {}",
                product.stock_code, product.quantity, input.quantity
            )));
        }

        txn.commit().await?;

        info!(
            movement_id = %movement.id,
            kind = ?movement.kind,
            quantity = movement.quantity,
            "stock movement recorded"
        );
        Ok(movement)
    }

    /// Full ledger, newest first, with product and project loaded.
    #[instrument(skip(self))]
    pub async fn list_movements(&self) -> Result<Vec<MovementWithRelations>, ServiceError> {
        let db = &*self.db_pool;
        let movements = StockMovement::find()
            .order_by_desc(stock_movement::Column::Date)
            .all(db)
            .await?;
        self.attach_relations(movements).await
    }

    /// Ledger slice for a single product, newest first. `NotFound` when the
    /// product does not exist, so a deleted product's id stops resolving
    /// instead of answering with an empty ledger.
    #[instrument(skip(self))]
    pub async fn movements_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<MovementWithRelations>, ServiceError> {
        let db = &*self.db_pool;
        Product::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {product_id} not found")))?;

        let movements = StockMovement::find()
            .filter(stock_movement::Column::ProductId.eq(product_id))
            .order_by_desc(stock_movement::Column::Date)
            .all(db)
            .await?;
        self.attach_relations(movements).await
    }

    async fn attach_relations(
        &self,
        movements: Vec<stock_movement::Model>,
    ) -> Result<Vec<MovementWithRelations>, ServiceError> {
        let db = &*self.db_pool;
        let products = movements.load_one(Product, db).await?;
        let projects = movements.load_one(Project, db).await?;

        Ok(movements
            .into_iter()
            .zip(products)
            .zip(projects)
            .map(|((movement, product), project)| MovementWithRelations {
                movement,
                product,
                project,
            })
            .collect())
    }
}
