//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//!
//! # Pets
//! GET    /pet/findByStatus        - Pets with ?status= (404 when none match)
//! POST   /pet                     - Add pet (201)
//! PUT    /pet                     - Update name and status
//! GET    /pet/{pet_id}            - Pet by id
//! POST   /pet/{pet_id}            - Update name/status from form fields
//! DELETE /pet/{pet_id}            - Delete pet
//!
//! # Store
//! GET    /store/inventory         - Pet counts per status
//! POST   /store/order             - Place order (201)
//! GET    /store/order/{order_id}  - Order by id
//! DELETE /store/order/{order_id}  - Delete order
//!
//! # Users
//! POST   /user                    - Create user (201)
//! POST   /user/createWithList     - Create users from a JSON array
//! POST   /user/createWithArray    - Same as createWithList
//! GET    /user/login              - Check ?username=&password=
//! GET    /user/logout             - Always succeeds
//! GET    /user/{username}         - User by username
//! PUT    /user/{username}         - Replace user
//! DELETE /user/{username}         - Delete every user with that username
//! ```

pub mod extract;
pub mod pets;
pub mod store;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// All resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(pets::router())
        .merge(store::router())
        .merge(users::router())
}

/// Fallback for unmatched paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Fallback for a known path requested with an unrouted method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed("Method Not Allowed".to_string())
}
