//! Order store and inventory.
//!
//! Unlike pets and users, order ids come from a running counter seeded at
//! `seed.len() + 1` and bumped on every placement. Deleting the newest order
//! therefore never frees its id for reuse.

use std::sync::RwLock;

use indexmap::IndexMap;
use tracing::{info, instrument, warn};

use pet_store_core::{NewOrder, Order, OrderId};

use super::{Confirmation, PetStore, StoreError, StoreResult, read, write};

const COLLECTION: &str = "orders";

/// Per-status pet counts, keyed in first-seen order.
pub type Inventory = IndexMap<String, usize>;

#[derive(Debug)]
struct OrderBook {
    orders: Vec<Order>,
    next_id: OrderId,
}

/// Insertion-ordered order collection with its id counter.
#[derive(Debug)]
pub struct OrderStore {
    book: RwLock<OrderBook>,
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl OrderStore {
    /// Create a store holding `orders`; the counter starts at `orders.len() + 1`.
    #[must_use]
    pub fn new(orders: Vec<Order>) -> Self {
        let seeded = i64::try_from(orders.len()).unwrap_or(i64::MAX);
        Self {
            book: RwLock::new(OrderBook {
                orders,
                next_id: OrderId::new(seeded).next(),
            }),
        }
    }

    /// Place an order under the next counter value.
    ///
    /// The referenced pet is not checked.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if the collection lock is poisoned.
    #[instrument(skip(self, new_order), fields(pet_id = %new_order.pet_id))]
    pub fn place(&self, new_order: NewOrder) -> StoreResult<Order> {
        info!(quantity = new_order.quantity, status = %new_order.status, "Placing new order");
        let mut book = write(&self.book, COLLECTION)?;
        let order_id = book.next_id;
        book.next_id = order_id.next();
        let order = new_order.with_id(order_id);
        book.orders.push(order.clone());
        info!(%order_id, "Order placed successfully");
        Ok(order)
    }

    /// The order with the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OrderNotFound` if no order has that id.
    #[instrument(skip(self))]
    pub fn get(&self, order_id: OrderId) -> StoreResult<Order> {
        info!("Getting order by ID");
        let book = read(&self.book, COLLECTION)?;
        if let Some(order) = book.orders.iter().find(|order| order.id == order_id) {
            info!("Order found");
            return Ok(order.clone());
        }
        warn!("Order not found");
        Err(StoreError::OrderNotFound(order_id))
    }

    /// Remove the first order with the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OrderNotFound` if no order has that id.
    #[instrument(skip(self))]
    pub fn delete(&self, order_id: OrderId) -> StoreResult<Confirmation> {
        info!("Deleting order");
        let mut book = write(&self.book, COLLECTION)?;
        let Some(position) = book.orders.iter().position(|order| order.id == order_id) else {
            warn!("Order not found");
            return Err(StoreError::OrderNotFound(order_id));
        };
        book.orders.remove(position);
        info!("Order deleted successfully");
        Ok(Confirmation::new(format!(
            "Order with ID {order_id} has been deleted"
        )))
    }
}

/// Count pets per status in one pass over the live pet collection.
///
/// Orders play no part: the inventory reflects what is listed, not what
/// has been bought.
///
/// # Errors
///
/// Returns `StoreError::Poisoned` if the pet collection lock is poisoned.
#[instrument(skip(pets))]
pub fn inventory(pets: &PetStore) -> StoreResult<Inventory> {
    info!("Calculating inventory");
    let mut counts = Inventory::new();
    pets.for_each(|pet| {
        *counts.entry(pet.status.clone()).or_insert(0) += 1;
    })?;
    info!(?counts, "Inventory calculated");
    Ok(counts)
}
