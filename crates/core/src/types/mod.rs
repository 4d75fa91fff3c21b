//! Resource types for the Pet Store.
//!
//! Each resource comes as a pair: the stored record carrying an assigned id,
//! and the inbound shape a client submits before an id exists.

pub mod id;
pub mod order;
pub mod pet;
pub mod user;

pub use id::*;
pub use order::{NewOrder, Order};
pub use pet::{Category, CategoryValue, NewPet, Pet, PetUpdate};
pub use user::{NewUser, User};
