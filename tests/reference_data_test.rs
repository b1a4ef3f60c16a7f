mod common;

use common::TestApp;
use rust_decimal::Decimal;
use stockledger_api::{
    entities::{project::ProjectKind, stock_movement::MovementKind},
    errors::ServiceError,
    services::{
        ledger::NewMovement,
        products::NewProduct,
        projects::ProjectPatch,
        warehouses::WarehousePatch,
    },
};
use uuid::Uuid;

#[tokio::test]
async fn warehouse_crud_round_trip() {
    let app = TestApp::new().await;
    let warehouses = &app.state.warehouse_service;

    let created = app.seed_warehouse("North Depot").await;
    assert_eq!(warehouses.get_warehouse(created.id).await.unwrap().name, "North Depot");

    let updated = warehouses
        .update_warehouse(
            created.id,
            WarehousePatch {
                description: Some("overflow storage".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("overflow storage"));
    assert_eq!(updated.name, "North Depot");

    warehouses.delete_warehouse(created.id).await.unwrap();
    assert!(matches!(
        warehouses.get_warehouse(created.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn referenced_warehouse_cannot_be_deleted() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse("Occupied").await;

    app.state
        .product_service
        .create_product(NewProduct {
            stock_code: "REF-W1".to_string(),
            product_type: "hardware".to_string(),
            name: "Tenant".to_string(),
            description: None,
            quantity: 0,
            barcode: None,
            warehouse_id: Some(warehouse.id),
            entry_price: Decimal::ZERO,
            exit_price: Decimal::ZERO,
            entry_date: None,
        })
        .await
        .unwrap();

    let err = app
        .state
        .warehouse_service
        .delete_warehouse(warehouse.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReferentialConflict(_)));

    // Both rows survive the rejected delete.
    assert!(app.state.warehouse_service.get_warehouse(warehouse.id).await.is_ok());
    assert_eq!(app.state.product_service.list_products().await.unwrap().len(), 1);
}

#[tokio::test]
async fn project_crud_round_trip() {
    let app = TestApp::new().await;
    let projects = &app.state.project_service;

    let created = app.seed_project("Harbor Build").await;
    assert_eq!(created.kind, ProjectKind::Company);

    let updated = projects
        .update_project(
            created.id,
            ProjectPatch {
                kind: Some(ProjectKind::Project),
                contact_person: Some("R. Vega".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.kind, ProjectKind::Project);
    assert_eq!(updated.contact_person.as_deref(), Some("R. Vega"));

    projects.delete_project(created.id).await.unwrap();
    assert!(matches!(
        projects.get_project(created.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn referenced_project_cannot_be_deleted() {
    let app = TestApp::new().await;
    let project = app.seed_project("Pinned").await;
    let product = app.seed_product("REF-P1", 0).await;

    app.state
        .ledger_service
        .record_movement(NewMovement {
            product_id: product.id,
            kind: MovementKind::Entry,
            quantity: 2,
            project_id: Some(project.id),
            notes: None,
            unit_price: None,
        })
        .await
        .unwrap();

    let err = app
        .state
        .project_service
        .delete_project(project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReferentialConflict(_)));

    assert!(app.state.project_service.get_project(project.id).await.is_ok());
    assert_eq!(app.state.ledger_service.list_movements().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deletes_of_unknown_reference_rows_are_not_found() {
    let app = TestApp::new().await;

    assert!(matches!(
        app.state
            .warehouse_service
            .delete_warehouse(Uuid::new_v4())
            .await
            .unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        app.state
            .project_service
            .delete_project(Uuid::new_v4())
            .await
            .unwrap_err(),
        ServiceError::NotFound(_)
    ));
}
