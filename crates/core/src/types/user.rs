//! User records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::UserId;
use crate::validation::{FieldError, FromBody, Loc, ObjectReader};

/// A registered user.
///
/// `username` is the natural key for lookups but is not guaranteed unique;
/// the first match wins. The password is stored and compared in plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    /// 0 - active, 1 - inactive.
    #[serde(default)]
    pub user_status: i64,
}

/// Body of `POST /user` and each element of the batch-create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub user_status: i64,
}

impl NewUser {
    /// Attach an assigned id.
    #[must_use]
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            phone: self.phone,
            user_status: self.user_status,
        }
    }
}

impl FromBody for NewUser {
    fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
        let mut reader = ObjectReader::new(value, loc);
        let username = reader.string("username");
        let first_name = reader.string("firstName");
        let last_name = reader.string("lastName");
        let email = reader.string("email");
        let password = reader.string("password");
        let phone = reader.string("phone");
        let user_status = reader.integer_or("userStatus", 0);

        match (username, first_name, last_name, email, password, phone, user_status) {
            (
                Some(username),
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(password),
                Some(phone),
                Some(user_status),
            ) if reader.is_clean() => Ok(Self {
                username,
                first_name,
                last_name,
                email,
                password,
                phone,
                user_status,
            }),
            _ => Err(reader.into_errors()),
        }
    }
}

impl FromBody for User {
    fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
        let mut reader = ObjectReader::new(value, loc);
        let id = reader.integer("id");
        let errors_before = reader.into_errors();

        // The remaining fields are exactly a NewUser; validate them together
        // so both halves report in one pass.
        match (id, NewUser::from_body(value, loc)) {
            (Some(id), Ok(user)) if errors_before.is_empty() => Ok(user.with_id(UserId::new(id))),
            (_, Ok(_)) => Err(errors_before),
            (_, Err(mut rest)) => {
                // A non-object body is reported by both readers; keep one.
                let mut errors = errors_before;
                rest.retain(|e| !errors.contains(e));
                errors.append(&mut rest);
                Err(errors)
            }
        }
    }
}
