//! In-memory resource stores.
//!
//! Each resource type is owned by one store holding an insertion-ordered
//! `Vec` behind its own `RwLock`. Lookups are linear scans; every mutation,
//! including id assignment plus append, happens under a single write guard
//! so concurrent requests can never hand out the same id twice.
//!
//! Stores are created once at startup (see [`seed`]) and shared through
//! [`AppState`](crate::state::AppState).

pub mod orders;
pub mod pets;
pub mod seed;
pub mod users;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use thiserror::Error;

use pet_store_core::{OrderId, PetId, UserId};

pub use orders::{Inventory, OrderStore, inventory};
pub use pets::PetStore;
pub use users::{CreatedUsers, LoginSuccess, UserStore};

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No pet has the requested id.
    #[error("Pet {0} not found")]
    PetNotFound(PetId),

    /// No pet has the requested status.
    #[error("No pets with status {0:?}")]
    PetsNotFound(String),

    /// No order has the requested id.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// No user has the requested username.
    #[error("User {0:?} not found")]
    UserNotFound(String),

    /// A replacement record carries an id already held by another user.
    #[error("User id {0} already in use")]
    UserIdTaken(UserId),

    /// The password did not match.
    #[error("Invalid password for user {0:?}")]
    InvalidCredentials(String),

    /// A writer panicked while holding the collection lock.
    #[error("{0} collection lock poisoned")]
    Poisoned(&'static str),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Confirmation body returned by delete and logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acquire a read guard, surfacing poisoning as a store error.
fn read<'a, T>(lock: &'a RwLock<T>, name: &'static str) -> StoreResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| StoreError::Poisoned(name))
}

/// Acquire a write guard, surfacing poisoning as a store error.
fn write<'a, T>(lock: &'a RwLock<T>, name: &'static str) -> StoreResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| StoreError::Poisoned(name))
}
