//! User route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::Value;
use tracing::{info, instrument};

use pet_store_core::validation::ObjectReader;
use pet_store_core::{FieldError, FromBody, Loc, NewUser, User};

use super::extract::{ValidJson, ValidPath, ValidQuery};
use crate::error::Result;
use crate::state::AppState;
use crate::store::{Confirmation, CreatedUsers, LoginSuccess, StoreError};

/// User routes.
///
/// The literal `/user/login`, `/user/logout` and `/user/createWith*` paths
/// take precedence over `/user/{username}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route("/user/createWithList", post(create_users))
        .route("/user/createWithArray", post(create_users))
        .route("/user/login", get(login))
        .route("/user/logout", get(logout))
        .route(
            "/user/{username}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// `?username=&password=` for `GET /user/login`.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl FromBody for Credentials {
    fn from_body(value: &Value, loc: &Loc) -> std::result::Result<Self, Vec<FieldError>> {
        let mut reader = ObjectReader::new(value, loc);
        let username = reader.string("username");
        let password = reader.string("password");
        match (username, password) {
            (Some(username), Some(password)) if reader.is_clean() => {
                Ok(Self { username, password })
            }
            _ => Err(reader.into_errors()),
        }
    }
}

#[instrument(skip_all)]
async fn create_user(
    State(state): State<AppState>,
    ValidJson(new_user): ValidJson<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    info!(username = %new_user.username, "Received request to create user");
    let user = state.users().add(new_user)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Shared by `createWithList` and `createWithArray`.
#[instrument(skip_all)]
async fn create_users(
    State(state): State<AppState>,
    ValidJson(new_users): ValidJson<Vec<NewUser>>,
) -> Result<Json<CreatedUsers>> {
    info!(count = new_users.len(), "Received request to create users");
    Ok(Json(state.users().create_many(new_users)?))
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    ValidPath(username): ValidPath<String>,
) -> Result<Json<User>> {
    info!("Received request to get user by username");
    state
        .users()
        .get_by_username(&username)?
        .map(Json)
        .ok_or_else(|| StoreError::UserNotFound(username).into())
}

#[instrument(skip(state, user))]
async fn update_user(
    State(state): State<AppState>,
    ValidPath(username): ValidPath<String>,
    ValidJson(user): ValidJson<User>,
) -> Result<Json<User>> {
    info!("Received request to update user");
    Ok(Json(state.users().update(&username, user)?))
}

#[instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    ValidPath(username): ValidPath<String>,
) -> Result<Json<Confirmation>> {
    info!("Received request to delete user");
    Ok(Json(state.users().delete(&username)?))
}

#[instrument(skip_all, fields(username = %credentials.username))]
async fn login(
    State(state): State<AppState>,
    ValidQuery(credentials): ValidQuery<Credentials>,
) -> Result<Json<LoginSuccess>> {
    info!("Received request to log in");
    Ok(Json(
        state
            .users()
            .login(&credentials.username, &credentials.password)?,
    ))
}

#[instrument(skip_all)]
async fn logout(State(state): State<AppState>) -> Json<Confirmation> {
    Json(state.users().logout())
}
