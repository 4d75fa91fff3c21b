//! Application state shared across handlers.

use std::sync::Arc;

use crate::store::{OrderStore, PetStore, UserStore, seed};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; every clone sees the same stores.
#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Default)]
struct AppStateInner {
    pets: PetStore,
    orders: OrderStore,
    users: UserStore,
}

impl AppState {
    /// Create state around the given stores.
    #[must_use]
    pub fn new(pets: PetStore, orders: OrderStore, users: UserStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pets,
                orders,
                users,
            }),
        }
    }

    /// State loaded with the launch seed records.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(
            PetStore::new(seed::pets()),
            OrderStore::new(seed::orders()),
            UserStore::new(seed::users()),
        )
    }

    #[must_use]
    pub fn pets(&self) -> &PetStore {
        &self.inner.pets
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }
}
