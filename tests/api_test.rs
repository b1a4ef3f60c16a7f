mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn health_reports_up_with_database() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn product_crud_over_http() {
    let app = TestApp::new().await;

    let (status, created) = app
        .post(
            "/api/products",
            json!({
                "stock_code": "HTTP-1",
                "product_type": "hardware",
                "name": "Bracket",
                "quantity": 4,
                "entry_price": "2.50",
                "exit_price": "4.00"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["quantity"], 4);

    let (status, fetched) = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["stock_code"], "HTTP-1");
    assert!(fetched["photos"].as_array().unwrap().is_empty());

    let (status, updated) = app
        .patch(&format!("/api/products/{id}"), json!({"name": "Bracket v2"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Bracket v2");

    let (status, _) = app.delete(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_stock_code_maps_to_bad_request() {
    let app = TestApp::new().await;
    app.seed_product("HTTP-DUP", 0).await;

    let (status, body) = app
        .post(
            "/api/products",
            json!({
                "stock_code": "HTTP-DUP",
                "product_type": "hardware",
                "name": "Copy"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn invalid_product_payload_is_rejected() {
    let app = TestApp::new().await;

    // Empty name fails DTO validation before reaching the service.
    let (status, _) = app
        .post(
            "/api/products",
            json!({
                "stock_code": "HTTP-V1",
                "product_type": "hardware",
                "name": ""
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn movement_endpoints_enforce_the_ledger_rules() {
    let app = TestApp::new().await;
    let product = app.seed_product("HTTP-MOV", 2).await;

    let (status, recorded) = app
        .post(
            "/api/stock-movements",
            json!({
                "product_id": product.id,
                "kind": "entry",
                "quantity": 3,
                "notes": "restock"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recorded["kind"], "entry");

    // Overdraw is a 400, not a 500.
    let (status, body) = app
        .post(
            "/api/stock-movements",
            json!({
                "product_id": product.id,
                "kind": "exit",
                "quantity": 99
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("stock"));

    let (status, _) = app
        .post(
            "/api/stock-movements",
            json!({
                "product_id": Uuid::new_v4(),
                "kind": "entry",
                "quantity": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, history) = app
        .get(&format!("/api/products/{}/movements", product.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, ledger) = app.get("/api/stock-movements").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn referenced_warehouse_delete_maps_to_conflict() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse("HTTP Depot").await;

    let (status, _) = app
        .post(
            "/api/products",
            json!({
                "stock_code": "HTTP-WH",
                "product_type": "hardware",
                "name": "Stored",
                "warehouse_id": warehouse.id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.delete(&format!("/api/warehouses/{}", warehouse.id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn photo_upload_and_main_flag_over_http() {
    let app = TestApp::new().await;
    let product = app.seed_product("HTTP-PHOTO", 0).await;
    let png = [0x89u8, b'P', b'N', b'G', 1, 2, 3];

    let (status, first) = app.upload_photo(product.id, &png, "image/png", false).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["is_main"], true);

    let (status, second) = app.upload_photo(product.id, &png, "image/jpeg", false).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["is_main"], false);

    // Unsupported type is rejected with 400.
    let (status, _) = app
        .upload_photo(product.id, b"<svg/>", "image/svg+xml", false)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let second_id = second["id"].as_str().unwrap();
    let (status, promoted) = app
        .patch(&format!("/api/photos/{second_id}/main"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["is_main"], true);

    let (status, photos) = app
        .get(&format!("/api/products/{}/photos", product.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let mains: Vec<_> = photos
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["is_main"] == true)
        .collect();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0]["id"].as_str().unwrap(), second_id);

    // Binary is served back under the photo's URL.
    let (status, _) = app.get(&format!("/api/photos/{second_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&format!("/api/photos/{second_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/photos/{second_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn barcode_route_resolves_products() {
    let app = TestApp::new().await;
    let product = app.seed_product("HTTP-BAR", 0).await;
    app.patch(
        &format!("/api/products/{}", product.id),
        json!({"barcode": "4006381333931"}),
    )
    .await;

    let (status, found) = app.get("/api/products/barcode/4006381333931").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"].as_str().unwrap(), product.id.to_string());

    let (status, _) = app.get("/api/products/barcode/0000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, doc) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"], "Stock Ledger API");
    assert!(doc["paths"]["/api/stock-movements"].is_object());
}
