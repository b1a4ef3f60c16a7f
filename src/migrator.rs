#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_warehouses_table::Migration),
            Box::new(m20240101_000002_create_projects_table::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_product_photos_table::Migration),
            Box::new(m20240101_000005_create_stock_movements_table::Migration),
            Box::new(m20240101_000006_create_users_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Warehouses::Name).string().not_null())
                        .col(ColumnDef::new(Warehouses::Address).string().null())
                        .col(ColumnDef::new(Warehouses::Description).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Warehouses {
        Table,
        Id,
        Name,
        Address,
        Description,
    }
}

mod m20240101_000002_create_projects_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_projects_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Projects::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Projects::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Projects::Name).string().not_null())
                        .col(
                            ColumnDef::new(Projects::Kind)
                                .string_len(16)
                                .not_null()
                                .default("project"),
                        )
                        .col(ColumnDef::new(Projects::ContactPerson).string().null())
                        .col(ColumnDef::new(Projects::Phone).string().null())
                        .col(ColumnDef::new(Projects::Email).string().null())
                        .col(ColumnDef::new(Projects::Address).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Projects::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Projects {
        Table,
        Id,
        Name,
        Kind,
        ContactPerson,
        Phone,
        Email,
        Address,
    }
}

mod m20240101_000003_create_products_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_warehouses_table::Warehouses;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::StockCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Products::ProductType).string().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Description).string().null())
                        .col(
                            ColumnDef::new(Products::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::Barcode).string().null())
                        .col(ColumnDef::new(Products::WarehouseId).uuid().null())
                        .col(
                            ColumnDef::new(Products::EntryPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::ExitPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::EntryDate).timestamp().not_null())
                        // No FK on MainPhotoId: product_photos does not exist yet
                        // and the mirror is maintained by the photo service.
                        .col(ColumnDef::new(Products::MainPhotoId).uuid().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_warehouse")
                                .from(Products::Table, Products::WarehouseId)
                                .to(Warehouses::Table, Warehouses::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_stock_code")
                        .table(Products::Table)
                        .col(Products::StockCode)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_barcode")
                        .table(Products::Table)
                        .col(Products::Barcode)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_warehouse_id")
                        .table(Products::Table)
                        .col(Products::WarehouseId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Products {
        Table,
        Id,
        StockCode,
        ProductType,
        Name,
        Description,
        Quantity,
        Barcode,
        WarehouseId,
        EntryPrice,
        ExitPrice,
        EntryDate,
        MainPhotoId,
    }
}

mod m20240101_000004_create_product_photos_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000003_create_products_table::Products;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_product_photos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductPhotos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductPhotos::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductPhotos::ProductId).uuid().not_null())
                        .col(ColumnDef::new(ProductPhotos::Url).string().not_null())
                        .col(ColumnDef::new(ProductPhotos::Filename).string().not_null())
                        .col(
                            ColumnDef::new(ProductPhotos::IsMain)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_photos_product")
                                .from(ProductPhotos::Table, ProductPhotos::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_photos_product_id")
                        .table(ProductPhotos::Table)
                        .col(ProductPhotos::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductPhotos::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum ProductPhotos {
        Table,
        Id,
        ProductId,
        Url,
        Filename,
        IsMain,
    }
}

mod m20240101_000005_create_stock_movements_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000002_create_projects_table::Projects;
    use super::m20240101_000003_create_products_table::Products;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_stock_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMovements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::ProductId).uuid().not_null())
                        .col(ColumnDef::new(StockMovements::Kind).string_len(16).not_null())
                        .col(ColumnDef::new(StockMovements::Quantity).integer().not_null())
                        .col(ColumnDef::new(StockMovements::ProjectId).uuid().null())
                        .col(ColumnDef::new(StockMovements::Notes).string().null())
                        .col(ColumnDef::new(StockMovements::Date).timestamp().not_null())
                        .col(ColumnDef::new(StockMovements::UnitPrice).decimal().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_movements_product")
                                .from(StockMovements::Table, StockMovements::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_movements_project")
                                .from(StockMovements::Table, StockMovements::ProjectId)
                                .to(Projects::Table, Projects::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_product_id")
                        .table(StockMovements::Table)
                        .col(StockMovements::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_project_id")
                        .table(StockMovements::Table)
                        .col(StockMovements::ProjectId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_date")
                        .table(StockMovements::Table)
                        .col(StockMovements::Date)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum StockMovements {
        Table,
        Id,
        ProductId,
        Kind,
        Quantity,
        ProjectId,
        Notes,
        Date,
        UnitPrice,
    }
}

mod m20240101_000006_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::DisplayName).string().null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        DisplayName,
        CreatedAt,
    }
}
