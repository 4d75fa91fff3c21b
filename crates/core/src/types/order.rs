//! Order records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{OrderId, PetId};
use crate::validation::{FieldError, FromBody, Loc, ObjectReader};

/// A placed order.
///
/// `pet_id` is a soft reference: nothing checks that the pet exists.
/// `ship_date` is kept exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(alias = "petId")]
    pub pet_id: PetId,
    pub quantity: i64,
    #[serde(rename = "shipDate")]
    pub ship_date: String,
    pub status: String,
    pub complete: bool,
}

/// Body of `POST /store/order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(alias = "petId")]
    pub pet_id: PetId,
    pub quantity: i64,
    #[serde(rename = "shipDate")]
    pub ship_date: String,
    pub status: String,
    pub complete: bool,
}

impl NewOrder {
    /// Attach an assigned id.
    #[must_use]
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            pet_id: self.pet_id,
            quantity: self.quantity,
            ship_date: self.ship_date,
            status: self.status,
            complete: self.complete,
        }
    }
}

impl FromBody for NewOrder {
    fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
        let mut reader = ObjectReader::new(value, loc);
        let pet_id = reader.integer_aliased(&["pet_id", "petId"]);
        let quantity = reader.integer("quantity");
        let ship_date = reader.timestamp("shipDate");
        let status = reader.string("status");
        let complete = reader.boolean("complete");

        match (pet_id, quantity, ship_date, status, complete) {
            (Some(pet_id), Some(quantity), Some(ship_date), Some(status), Some(complete))
                if reader.is_clean() =>
            {
                Ok(Self {
                    pet_id: PetId::new(pet_id),
                    quantity,
                    ship_date,
                    status,
                    complete,
                })
            }
            _ => Err(reader.into_errors()),
        }
    }
}
