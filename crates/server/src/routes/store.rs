//! Order and inventory route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::{info, instrument};

use pet_store_core::{NewOrder, Order, OrderId};

use super::extract::{ValidJson, ValidPath};
use crate::error::Result;
use crate::state::AppState;
use crate::store::{Confirmation, Inventory, inventory};

/// Store routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/store/inventory", get(get_inventory))
        .route("/store/order", post(place_order))
        .route("/store/order/{order_id}", get(get_order).delete(delete_order))
}

#[instrument(skip_all)]
async fn place_order(
    State(state): State<AppState>,
    ValidJson(new_order): ValidJson<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    info!(pet_id = %new_order.pet_id, "Received request to place order");
    let order = state.orders().place(new_order)?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip(state))]
async fn get_order(
    State(state): State<AppState>,
    ValidPath(order_id): ValidPath<OrderId>,
) -> Result<Json<Order>> {
    info!("Received request to get order by ID");
    Ok(Json(state.orders().get(order_id)?))
}

#[instrument(skip(state))]
async fn delete_order(
    State(state): State<AppState>,
    ValidPath(order_id): ValidPath<OrderId>,
) -> Result<Json<Confirmation>> {
    info!("Received request to delete order");
    Ok(Json(state.orders().delete(order_id)?))
}

/// Pet counts per status.
#[instrument(skip_all)]
async fn get_inventory(State(state): State<AppState>) -> Result<Json<Inventory>> {
    info!("Received request to get inventory");
    Ok(Json(inventory(state.pets())?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use crate::routes::testing::call;

    use super::*;

    fn order_body() -> serde_json::Value {
        json!({
            "petId": 1,
            "quantity": 1,
            "shipDate": "2025-01-01T10:00:00.000Z",
            "status": "placed",
            "complete": false
        })
    }

    #[tokio::test]
    async fn test_place_order_uses_counter() {
        let (status, body) = call(Method::POST, "/store/order", Some(order_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 3);
        assert_eq!(body["pet_id"], 1);
        assert_eq!(body["shipDate"], "2025-01-01T10:00:00.000Z");
    }

    #[tokio::test]
    async fn test_place_order_rejects_bad_ship_date() {
        let mut order = order_body();
        order["shipDate"] = json!("next tuesday");
        let (status, body) = call(Method::POST, "/store/order", Some(order)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["body", "shipDate"]));
        assert_eq!(body["detail"][0]["type"], "datetime_type");
    }

    #[tokio::test]
    async fn test_get_and_delete_order() {
        let (status, body) = call(Method::GET, "/store/order/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "approved");

        let (status, body) = call(Method::DELETE, "/store/order/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Order with ID 2 has been deleted"}));
    }

    #[tokio::test]
    async fn test_missing_order() {
        let (status, body) = call(Method::GET, "/store/order/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Order not found"}));
    }

    #[tokio::test]
    async fn test_inventory() {
        let (status, body) = call(Method::GET, "/store/inventory", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"available": 1, "pending": 1, "sold": 1}));
    }
}
