//! Order and inventory endpoints over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pet_store_integration_tests::TestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_place_order() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .post(server.url("/store/order"))
        .json(&json!({
            "pet_id": 1,
            "quantity": 2,
            "shipDate": "2024-12-23T10:00:00Z",
            "status": "placed",
            "complete": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Value = resp.json().await.unwrap();
    assert_eq!(order["id"], 3);
    assert_eq!(order["pet_id"], 1);
    assert_eq!(order["status"], "placed");
    assert_eq!(order["shipDate"], "2024-12-23T10:00:00Z");
}

#[tokio::test]
async fn test_place_order_missing_fields() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .post(server.url("/store/order"))
        .json(&json!({"pet_id": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    let fields: Vec<&str> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["loc"][1].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["quantity", "shipDate", "status", "complete"]);
}

#[tokio::test]
async fn test_get_order_by_id() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .get(server.url("/store/order/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.unwrap();
    assert_eq!(order["id"], 1);
    assert_eq!(order["status"], "placed");
}

#[tokio::test]
async fn test_get_nonexistent_order() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .get(server.url("/store/order/999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Order not found");
}

#[tokio::test]
async fn test_delete_order() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .delete(server.url("/store/order/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Order with ID 1 has been deleted");

    let resp = server
        .client()
        .get(server.url("/store/order/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_inventory() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .get(server.url("/store/inventory"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let inventory: Value = resp.json().await.unwrap();
    assert!(inventory.is_object());
    assert_eq!(inventory["pending"], 1);
    assert_eq!(inventory["sold"], 1);
}
