mod common;

use common::TestApp;
use stockledger_api::{errors::ServiceError, services::photos::PhotoUpload};
use uuid::Uuid;

fn upload(content_type: &str, make_main: bool) -> PhotoUpload {
    PhotoUpload {
        bytes: vec![1, 2, 3, 4],
        content_type: content_type.to_string(),
        original_filename: Some("photo.bin".to_string()),
        make_main,
    }
}

#[tokio::test]
async fn first_photo_becomes_main_automatically() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-1", 0).await;
    let photos = &app.state.photo_service;

    let first = photos.add_photo(product.id, upload("image/png", false)).await.unwrap();
    photos.add_photo(product.id, upload("image/jpeg", false)).await.unwrap();
    photos.add_photo(product.id, upload("image/webp", false)).await.unwrap();

    let all = photos.list_photos(product.id).await.unwrap();
    assert_eq!(all.len(), 3);
    let mains: Vec<_> = all.iter().filter(|p| p.is_main).collect();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0].id, first.id);

    let refreshed = app.state.product_service.get_product(product.id).await.unwrap();
    assert_eq!(refreshed.product.main_photo_id, Some(first.id));
}

#[tokio::test]
async fn set_main_photo_moves_the_flag_atomically() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-2", 0).await;
    let photos = &app.state.photo_service;

    photos.add_photo(product.id, upload("image/png", false)).await.unwrap();
    photos.add_photo(product.id, upload("image/png", false)).await.unwrap();
    let third = photos.add_photo(product.id, upload("image/png", false)).await.unwrap();

    photos.set_main_photo(product.id, third.id).await.unwrap();

    let all = photos.list_photos(product.id).await.unwrap();
    let mains: Vec<_> = all.iter().filter(|p| p.is_main).collect();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0].id, third.id);

    let refreshed = app.state.product_service.get_product(product.id).await.unwrap();
    assert_eq!(refreshed.product.main_photo_id, Some(third.id));
}

#[tokio::test]
async fn upload_with_make_main_demotes_previous_main() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-3", 0).await;
    let photos = &app.state.photo_service;

    let first = photos.add_photo(product.id, upload("image/png", false)).await.unwrap();
    assert!(first.is_main);

    let second = photos.add_photo(product.id, upload("image/png", true)).await.unwrap();
    assert!(second.is_main);

    let all = photos.list_photos(product.id).await.unwrap();
    let mains: Vec<_> = all.iter().filter(|p| p.is_main).collect();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0].id, second.id);
}

#[tokio::test]
async fn sixth_photo_is_rejected_with_no_row_or_file() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-4", 0).await;
    let photos = &app.state.photo_service;

    for _ in 0..5 {
        photos.add_photo(product.id, upload("image/png", false)).await.unwrap();
    }
    assert_eq!(app.stored_file_count(), 5);

    let err = photos
        .add_photo(product.id, upload("image/png", false))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::TooManyPhotos(_)));

    assert_eq!(photos.list_photos(product.id).await.unwrap().len(), 5);
    // The compensating cleanup removed the file written before the cap check.
    assert_eq!(app.stored_file_count(), 5);
}

#[tokio::test]
async fn unsupported_mime_type_is_rejected_before_any_write() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-5", 0).await;

    for bad in ["image/svg+xml", "application/pdf", "text/plain"] {
        let err = app
            .state
            .photo_service
            .add_photo(product.id, upload(bad, false))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidFileType(_)));
    }
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn deleting_main_photo_promotes_a_survivor() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-6", 0).await;
    let photos = &app.state.photo_service;

    let first = photos.add_photo(product.id, upload("image/png", false)).await.unwrap();
    photos.add_photo(product.id, upload("image/png", false)).await.unwrap();

    photos.delete_photo(first.id).await.unwrap();

    let all = photos.list_photos(product.id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].is_main);

    let refreshed = app.state.product_service.get_product(product.id).await.unwrap();
    assert_eq!(refreshed.product.main_photo_id, Some(all[0].id));
    assert_eq!(app.stored_file_count(), 1);
}

#[tokio::test]
async fn deleting_last_photo_clears_the_mirror() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-7", 0).await;
    let photos = &app.state.photo_service;

    let only = photos.add_photo(product.id, upload("image/png", false)).await.unwrap();
    photos.delete_photo(only.id).await.unwrap();

    assert!(photos.list_photos(product.id).await.unwrap().is_empty());
    let refreshed = app.state.product_service.get_product(product.id).await.unwrap();
    assert_eq!(refreshed.product.main_photo_id, None);
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn photo_bytes_round_trip_through_the_store() {
    let app = TestApp::new().await;
    let product = app.seed_product("PHOTO-8", 0).await;

    let photo = app
        .state
        .photo_service
        .add_photo(product.id, upload("image/jpeg", false))
        .await
        .unwrap();
    assert!(photo.filename.ends_with(".jpg"));
    assert_eq!(photo.url, format!("/api/photos/{}", photo.id));

    let (row, bytes) = app.state.photo_service.open_photo_file(photo.id).await.unwrap();
    assert_eq!(row.id, photo.id);
    assert_eq!(bytes, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn set_main_rejects_photo_of_another_product() {
    let app = TestApp::new().await;
    let product_a = app.seed_product("PHOTO-9A", 0).await;
    let product_b = app.seed_product("PHOTO-9B", 0).await;

    let photo_a = app
        .state
        .photo_service
        .add_photo(product_a.id, upload("image/png", false))
        .await
        .unwrap();

    let err = app
        .state
        .photo_service
        .set_main_photo(product_b.id, photo_a.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn photo_operations_on_unknown_ids_are_not_found() {
    let app = TestApp::new().await;
    let photos = &app.state.photo_service;

    assert!(matches!(
        photos.get_photo(Uuid::new_v4()).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        photos.delete_photo(Uuid::new_v4()).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        photos
            .add_photo(Uuid::new_v4(), upload("image/png", false))
            .await
            .unwrap_err(),
        ServiceError::NotFound(_)
    ));
}
