use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as Product},
        product_photo::{self, Entity as ProductPhoto},
    },
    errors::ServiceError,
    storage::PhotoStore,
};

/// Cap on photo attachments per product, enforced here rather than in the
/// schema.
pub const MAX_PHOTOS_PER_PRODUCT: u64 = 5;

/// Upload payload as handed over by the HTTP boundary.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub original_filename: Option<String>,
    pub make_main: bool,
}

/// Maps an accepted image MIME type to the file extension used for the
/// stored blob. Returns `None` for anything outside the allow-list.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// MIME type served back for a stored filename, derived from its extension.
pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Photo attachment service.
///
/// Owns the main-photo invariant: at most one `is_main = true` photo per
/// product, mirrored by `Product.main_photo_id`. Every mutation that touches
/// the flag runs clear-all / set-one / mirror inside a single transaction.
///
/// File writes and row writes span two stores and cannot share a
/// transaction, so mutations are two-phase: upload writes the file first and
/// removes it again if the row insert fails; deletion removes the row first
/// and then the file, tolerating an orphaned blob but never an orphaned row.
#[derive(Clone)]
pub struct PhotoService {
    db_pool: Arc<DbPool>,
    photo_store: Arc<dyn PhotoStore>,
}

impl PhotoService {
    pub fn new(db_pool: Arc<DbPool>, photo_store: Arc<dyn PhotoStore>) -> Self {
        Self {
            db_pool,
            photo_store,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_photos(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<product_photo::Model>, ServiceError> {
        let db = &*self.db_pool;
        Product::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {product_id} not found")))?;

        Ok(ProductPhoto::find()
            .filter(product_photo::Column::ProductId.eq(product_id))
            .order_by_asc(product_photo::Column::Id)
            .all(db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_photo(&self, id: Uuid) -> Result<product_photo::Model, ServiceError> {
        let db = &*self.db_pool;
        ProductPhoto::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Photo {id} not found")))
    }

    /// Loads the photo row and its stored bytes for serving.
    #[instrument(skip(self))]
    pub async fn open_photo_file(
        &self,
        id: Uuid,
    ) -> Result<(product_photo::Model, Vec<u8>), ServiceError> {
        let photo = self.get_photo(id).await?;
        let bytes = self.photo_store.read(&photo.filename).await?;
        Ok((photo, bytes))
    }

    /// Attaches a photo to a product.
    ///
    /// The first photo of a product becomes main automatically; an explicit
    /// `make_main` demotes the previous main photo in the same transaction.
    #[instrument(skip(self, upload), fields(content_type = %upload.content_type, size = upload.bytes.len()))]
    pub async fn add_photo(
        &self,
        product_id: Uuid,
        upload: PhotoUpload,
    ) -> Result<product_photo::Model, ServiceError> {
        let extension = extension_for(&upload.content_type).ok_or_else(|| {
            ServiceError::InvalidFileType(format!(
                "'{}' is not an accepted image type (jpeg, png, webp, gif)",
                upload.content_type
            ))
        })?;
        if upload.bytes.is_empty() {
            return Err(ServiceError::ValidationError(
                "uploaded file is empty".to_string(),
            ));
        }

        let db = &*self.db_pool;
        Product::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {product_id} not found")))?;

        let photo_id = Uuid::new_v4();
        let filename = format!("{photo_id}.{extension}");
        let url = format!("/api/photos/{photo_id}");

        // File first, row second: if the insert fails the file is removed
        // again, so a visible row always has its blob.
        self.photo_store.save(&filename, &upload.bytes).await?;

        let inserted = async {
            let txn = db.begin().await?;

            let existing = ProductPhoto::find()
                .filter(product_photo::Column::ProductId.eq(product_id))
                .count(&txn)
                .await?;
            if existing >= MAX_PHOTOS_PER_PRODUCT {
                return Err(ServiceError::TooManyPhotos(format!(
                    "product already has {MAX_PHOTOS_PER_PRODUCT} photos"
                )));
            }

            let is_main = existing == 0 || upload.make_main;
            if is_main {
                ProductPhoto::update_many()
                    .col_expr(product_photo::Column::IsMain, Expr::value(false))
                    .filter(product_photo::Column::ProductId.eq(product_id))
                    .exec(&txn)
                    .await?;
            }

            let photo = product_photo::ActiveModel {
                id: Set(photo_id),
                product_id: Set(product_id),
                url: Set(url.clone()),
                filename: Set(filename.clone()),
                is_main: Set(is_main),
            };
            let photo = photo.insert(&txn).await?;

            if is_main {
                Product::update_many()
                    .col_expr(product::Column::MainPhotoId, Expr::value(Some(photo_id)))
                    .filter(product::Column::Id.eq(product_id))
                    .exec(&txn)
                    .await?;
            }

            txn.commit().await?;
            Ok(photo)
        }
        .await;

        match inserted {
            Ok(photo) => {
                info!(
                    photo_id = %photo.id,
                    product_id = %product_id,
                    is_main = photo.is_main,
                    original = upload.original_filename.as_deref().unwrap_or("-"),
                    "photo added"
                );
                Ok(photo)
            }
            Err(e) => {
                if let Err(cleanup) = self.photo_store.remove(&filename).await {
                    warn!(filename = %filename, error = %cleanup, "failed to clean up file after aborted upload");
                }
                Err(e)
            }
        }
    }

    /// Removes a photo. If it carried the main flag an arbitrary surviving
    /// photo of the same product is promoted, or the product's mirror is
    /// cleared when none remain.
    #[instrument(skip(self))]
    pub async fn delete_photo(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let photo = self.get_photo(id).await?;

        let txn = db.begin().await?;

        ProductPhoto::delete_by_id(id).exec(&txn).await?;

        if photo.is_main {
            let survivor = ProductPhoto::find()
                .filter(product_photo::Column::ProductId.eq(photo.product_id))
                .order_by_asc(product_photo::Column::Id)
                .one(&txn)
                .await?;

            if let Some(next) = &survivor {
                let mut model: product_photo::ActiveModel = next.clone().into();
                model.is_main = Set(true);
                model.update(&txn).await?;
            }

            Product::update_many()
                .col_expr(
                    product::Column::MainPhotoId,
                    Expr::value(survivor.as_ref().map(|p| p.id)),
                )
                .filter(product::Column::Id.eq(photo.product_id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        // Row is gone; the blob follows best-effort.
        if let Err(e) = self.photo_store.remove(&photo.filename).await {
            warn!(filename = %photo.filename, error = %e, "failed to remove photo file");
        }

        info!(photo_id = %id, product_id = %photo.product_id, "photo deleted");
        Ok(())
    }

    /// Moves the main flag to `photo_id`: clear all, set one, mirror on the
    /// product, as a single atomic unit.
    #[instrument(skip(self))]
    pub async fn set_main_photo(
        &self,
        product_id: Uuid,
        photo_id: Uuid,
    ) -> Result<product_photo::Model, ServiceError> {
        let db = &*self.db_pool;

        let photo = ProductPhoto::find_by_id(photo_id)
            .one(db)
            .await?
            .filter(|p| p.product_id == product_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Photo {photo_id} not found for product {product_id}"
                ))
            })?;

        let txn = db.begin().await?;

        ProductPhoto::update_many()
            .col_expr(product_photo::Column::IsMain, Expr::value(false))
            .filter(product_photo::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;

        let mut model: product_photo::ActiveModel = photo.into();
        model.is_main = Set(true);
        let photo = model.update(&txn).await?;

        Product::update_many()
            .col_expr(product::Column::MainPhotoId, Expr::value(Some(photo_id)))
            .filter(product::Column::Id.eq(product_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(photo_id = %photo_id, product_id = %product_id, "main photo changed");
        Ok(photo)
    }
}
