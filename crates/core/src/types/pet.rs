//! Pet records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PetId;
use crate::validation::{FieldError, FromBody, Loc, ObjectReader};

/// A category attribute value: either a number or text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryValue {
    Int(i64),
    Text(String),
}

impl CategoryValue {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            other => other.as_i64().map(Self::Int),
        }
    }
}

impl From<i64> for CategoryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for CategoryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Free-form category attributes such as `{"id": 1, "name": "Dogs"}`.
pub type Category = IndexMap<String, CategoryValue>;

/// A pet listed in the store.
///
/// `status` is free text; `"available"`, `"pending"` and `"sold"` are the
/// values seen in practice but any string is accepted at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub category: Category,
    pub status: String,
}

/// Body of `POST /pet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub category: Category,
    pub status: String,
}

impl NewPet {
    /// Attach an assigned id.
    #[must_use]
    pub fn with_id(self, id: PetId) -> Pet {
        Pet {
            id,
            name: self.name,
            category: self.category,
            status: self.status,
        }
    }
}

impl FromBody for NewPet {
    fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
        let mut reader = ObjectReader::new(value, loc);
        let name = reader.string("name");
        let category = reader.scalar_map("category", CategoryValue::from_json);
        let status = reader.string("status");

        match (name, category, status) {
            (Some(name), Some(category), Some(status)) if reader.is_clean() => Ok(Self {
                name,
                category,
                status,
            }),
            _ => Err(reader.into_errors()),
        }
    }
}

/// Body of `PUT /pet`.
///
/// Only `name` and `status` are applied; the category of an existing pet is
/// never touched by a full update. Extra fields (such as a full pet echoed
/// back by a client) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetUpdate {
    pub id: PetId,
    pub name: String,
    pub status: String,
}

impl FromBody for PetUpdate {
    fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
        let mut reader = ObjectReader::new(value, loc);
        let id = reader.integer("id");
        let name = reader.string("name");
        let status = reader.string("status");

        match (id, name, status) {
            (Some(id), Some(name), Some(status)) if reader.is_clean() => Ok(Self {
                id: PetId::new(id),
                name,
                status,
            }),
            _ => Err(reader.into_errors()),
        }
    }
}
