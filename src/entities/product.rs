use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Product entity.
///
/// `quantity` is a cached running total owned by the stock ledger: after
/// creation it is only ever mutated inside `LedgerService::record_movement`,
/// never through catalog updates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Product)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Globally unique stock code
    #[sea_orm(unique)]
    pub stock_code: String,
    pub product_type: String,
    pub name: String,
    pub description: Option<String>,
    /// On-hand quantity; always equals the signed sum of the movement
    /// history plus the initial baseline set at creation
    pub quantity: i32,
    pub barcode: Option<String>,
    pub warehouse_id: Option<Uuid>,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub entry_date: DateTime<Utc>,
    /// Mirrors the photo with `is_main = true`, or null if the product has
    /// no photos
    pub main_photo_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(has_many = "super::product_photo::Entity")]
    Photos,
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::product_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
