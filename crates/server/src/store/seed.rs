//! Records every store starts with at process launch.

use pet_store_core::{Category, CategoryValue, Order, OrderId, Pet, PetId, User, UserId};

fn category(id: i64, name: &str) -> Category {
    Category::from([
        ("id".to_string(), CategoryValue::from(id)),
        ("name".to_string(), CategoryValue::from(name)),
    ])
}

fn pet(id: i64, name: &str, category_id: i64, category_name: &str, status: &str) -> Pet {
    Pet {
        id: PetId::new(id),
        name: name.to_string(),
        category: category(category_id, category_name),
        status: status.to_string(),
    }
}

fn user(id: i64, username: &str, first_name: &str, last_name: &str, password: &str) -> User {
    User {
        id: UserId::new(id),
        username: username.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{username}@example.com"),
        password: password.to_string(),
        phone: "555-0100".to_string(),
        user_status: 0,
    }
}

/// One pet per well-known status.
#[must_use]
pub fn pets() -> Vec<Pet> {
    vec![
        pet(1, "Buddy", 1, "Dogs", "available"),
        pet(2, "Whiskers", 2, "Cats", "pending"),
        pet(3, "Harvey", 3, "Parrots", "sold"),
    ]
}

#[must_use]
pub fn users() -> Vec<User> {
    vec![
        user(1, "percival_de_rolo", "Percival", "de Rolo", "whitestone"),
        user(2, "keyleth_ashari", "Keyleth", "Ashari", "securepass"),
        user(3, "vex_vessar", "Vex'ahlia", "Vessar", "trinket"),
    ]
}

#[must_use]
pub fn orders() -> Vec<Order> {
    vec![
        Order {
            id: OrderId::new(1),
            pet_id: PetId::new(1),
            quantity: 2,
            ship_date: "2024-12-23T10:00:00Z".to_string(),
            status: "placed".to_string(),
            complete: true,
        },
        Order {
            id: OrderId::new(2),
            pet_id: PetId::new(2),
            quantity: 1,
            ship_date: "2024-12-25T12:00:00Z".to_string(),
            status: "approved".to_string(),
            complete: false,
        },
    ]
}
