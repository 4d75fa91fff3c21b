//! User store.
//!
//! Usernames are treated as the lookup key but uniqueness is never enforced:
//! lookups and updates act on the first match, deletes remove every match.

use std::sync::RwLock;

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use pet_store_core::{NewUser, User, UserId};

use super::{Confirmation, StoreError, StoreResult, read, write};

const COLLECTION: &str = "users";

/// Body returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginSuccess {
    pub message: String,
    pub username: String,
}

/// Body returned by the batch-create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedUsers {
    pub message: String,
    pub users: Vec<User>,
}

/// Insertion-ordered user collection.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    /// Create a store holding `users` in the given order.
    #[must_use]
    pub const fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Store a new user under the next free id (max existing id + 1, or 1).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if the collection lock is poisoned.
    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub fn add(&self, new_user: NewUser) -> StoreResult<User> {
        info!("Adding new user");
        let mut users = write(&self.users, COLLECTION)?;
        Ok(push_user(&mut users, new_user))
    }

    /// The first user with the given username, if any.
    ///
    /// A miss is not an error at this layer; callers decide.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if the collection lock is poisoned.
    #[instrument(skip(self))]
    pub fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        info!("Searching for user");
        let user = read(&self.users, COLLECTION)?
            .iter()
            .find(|user| user.username == username)
            .cloned();
        if user.is_none() {
            warn!("User not found");
        }
        Ok(user)
    }

    /// Replace every field of the first user named `username` with `user`,
    /// including its id and username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserNotFound` if no user has that username and
    /// `StoreError::UserIdTaken` if `user.id` belongs to any other user.
    #[instrument(skip(self, user), fields(new_id = %user.id))]
    pub fn update(&self, username: &str, user: User) -> StoreResult<User> {
        info!("Updating user");
        let mut users = write(&self.users, COLLECTION)?;
        let Some(index) = users.iter().position(|u| u.username == username) else {
            error!("User not found");
            return Err(StoreError::UserNotFound(username.to_owned()));
        };
        let taken = users
            .iter()
            .enumerate()
            .any(|(i, other)| i != index && other.id == user.id);
        if taken {
            warn!("User ID already in use");
            return Err(StoreError::UserIdTaken(user.id));
        }
        let Some(existing) = users.get_mut(index) else {
            return Err(StoreError::UserNotFound(username.to_owned()));
        };
        *existing = user;
        info!("User updated successfully");
        Ok(existing.clone())
    }

    /// Remove every user named `username`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserNotFound` if no user has that username.
    #[instrument(skip(self))]
    pub fn delete(&self, username: &str) -> StoreResult<Confirmation> {
        info!("Deleting user");
        let mut users = write(&self.users, COLLECTION)?;
        let before = users.len();
        users.retain(|user| user.username != username);
        if users.len() == before {
            error!("User not found");
            return Err(StoreError::UserNotFound(username.to_owned()));
        }
        info!("User deleted successfully");
        Ok(Confirmation::new(format!(
            "User with username {username} has been deleted"
        )))
    }

    /// Check a username/password pair by plain-text comparison.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserNotFound` for an unknown username and
    /// `StoreError::InvalidCredentials` for a wrong password.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> StoreResult<LoginSuccess> {
        info!("Logging in user");
        let Some(user) = self.get_by_username(username)? else {
            error!("User not found");
            return Err(StoreError::UserNotFound(username.to_owned()));
        };
        if user.password != password {
            error!("Invalid username or password");
            return Err(StoreError::InvalidCredentials(username.to_owned()));
        }
        info!("User logged in successfully");
        Ok(LoginSuccess {
            message: "Login successful".to_string(),
            username: username.to_owned(),
        })
    }

    /// There is no session to end; always succeeds.
    #[must_use]
    pub fn logout(&self) -> Confirmation {
        info!("User logged out successfully");
        Confirmation::new("Logout successful")
    }

    /// Add each user in order under one write guard, so the batch gets a
    /// contiguous id range.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if the collection lock is poisoned.
    #[instrument(skip(self, new_users), fields(count = new_users.len()))]
    pub fn create_many(&self, new_users: Vec<NewUser>) -> StoreResult<CreatedUsers> {
        info!("Creating multiple users");
        let mut users = write(&self.users, COLLECTION)?;
        let created: Vec<User> = new_users
            .into_iter()
            .map(|new_user| push_user(&mut users, new_user))
            .collect();
        info!(count = created.len(), "Users created successfully");
        Ok(CreatedUsers {
            message: format!("{} users created successfully", created.len()),
            users: created,
        })
    }
}

fn push_user(users: &mut Vec<User>, new_user: NewUser) -> User {
    let user_id = UserId::after_max(users.iter().map(|user| user.id));
    let user = new_user.with_id(user_id);
    users.push(user.clone());
    info!(%user_id, "Added new user with ID");
    user
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{username}@example.com"),
            password: "securepassword123".to_string(),
            phone: "123456789".to_string(),
            user_status: 0,
        }
    }

    #[test]
    fn test_ids_count_up_from_one_when_empty() {
        let store = UserStore::default();
        let ids: Vec<i64> = ["alice", "bob", "charlie"]
            .iter()
            .map(|name| store.add(new_user(name)).unwrap().id.as_i64())
            .collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_get_after_add_round_trips() {
        let store = UserStore::new(seed::users());
        let added = store.add(new_user("casper_schmeihel")).unwrap();
        assert_eq!(added, new_user("casper_schmeihel").with_id(added.id));
        assert_eq!(
            store.get_by_username("casper_schmeihel").unwrap(),
            Some(added)
        );
    }

    #[test]
    fn test_duplicate_usernames_resolve_to_first() {
        let store = UserStore::default();
        let first = store.add(new_user("twin")).unwrap();
        store.add(new_user("twin")).unwrap();
        assert_eq!(store.get_by_username("twin").unwrap(), Some(first));
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let store = UserStore::new(seed::users());
        let mut replacement = store.get_by_username("percival_de_rolo").unwrap().unwrap();
        replacement.email = "percival_de_rolo_updated@example.com".to_string();
        replacement.password = "newpassword".to_string();

        let updated = store
            .update("percival_de_rolo", replacement.clone())
            .unwrap();
        assert_eq!(updated, replacement);
        assert_eq!(store.update("percival_de_rolo", replacement).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_user() {
        let store = UserStore::default();
        let user = new_user("ghost").with_id(UserId::FIRST);
        assert!(matches!(
            store.update("ghost", user),
            Err(StoreError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_update_rejects_id_of_another_user() {
        let store = UserStore::new(seed::users());
        let mut replacement = store.get_by_username("vex_vessar").unwrap().unwrap();
        let own_id = replacement.id;
        replacement.id = UserId::new(1);

        assert!(matches!(
            store.update("vex_vessar", replacement.clone()),
            Err(StoreError::UserIdTaken(id)) if id == UserId::new(1)
        ));
        assert_eq!(
            store.get_by_username("vex_vessar").unwrap().unwrap().id,
            own_id
        );

        replacement.id = UserId::new(42);
        assert_eq!(
            store.update("vex_vessar", replacement).unwrap().id,
            UserId::new(42)
        );
    }

    #[test]
    fn test_update_checks_ids_against_same_named_users() {
        let store = UserStore::default();
        store.add(new_user("twin")).unwrap();
        let second = store.add(new_user("twin")).unwrap();
        let mut replacement = new_user("twin").with_id(second.id);
        replacement.email = "first_twin@example.com".to_string();
        assert!(matches!(
            store.update("twin", replacement),
            Err(StoreError::UserIdTaken(_))
        ));
    }

    #[test]
    fn test_delete_removes_every_match() {
        let store = UserStore::default();
        store.add(new_user("twin")).unwrap();
        store.add(new_user("twin")).unwrap();
        let confirmation = store.delete("twin").unwrap();
        assert_eq!(confirmation.message, "User with username twin has been deleted");
        assert_eq!(store.get_by_username("twin").unwrap(), None);
        assert!(matches!(
            store.delete("twin"),
            Err(StoreError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_login() {
        let store = UserStore::new(seed::users());
        let ok = store.login("keyleth_ashari", "securepass").unwrap();
        assert_eq!(ok.message, "Login successful");
        assert_eq!(ok.username, "keyleth_ashari");

        assert!(matches!(
            store.login("keyleth_ashari", "wrongpassword"),
            Err(StoreError::InvalidCredentials(_))
        ));
        assert!(matches!(
            store.login("nobody", "securepass"),
            Err(StoreError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_logout_always_succeeds() {
        assert_eq!(UserStore::default().logout().message, "Logout successful");
    }

    #[test]
    fn test_create_many_assigns_contiguous_ids() {
        let store = UserStore::new(seed::users());
        let created = store
            .create_many(vec![new_user("alice"), new_user("bob")])
            .unwrap();
        assert_eq!(created.message, "2 users created successfully");
        let ids: Vec<i64> = created.users.iter().map(|u| u.id.as_i64()).collect();
        assert_eq!(ids, [4, 5]);
    }

    #[test]
    fn test_create_many_empty_batch() {
        let created = UserStore::default().create_many(Vec::new()).unwrap();
        assert_eq!(created.message, "0 users created successfully");
        assert!(created.users.is_empty());
    }
}
