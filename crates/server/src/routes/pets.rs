//! Pet route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use pet_store_core::validation::ObjectReader;
use pet_store_core::{FieldError, FromBody, Loc, NewPet, Pet, PetId, PetUpdate};

use super::extract::{OptionalForm, ValidJson, ValidPath, ValidQuery};
use crate::error::Result;
use crate::state::AppState;
use crate::store::{Confirmation, StoreError};

/// Pet routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pet/findByStatus", get(find_by_status))
        .route("/pet", post(add_pet).put(update_pet))
        .route(
            "/pet/{pet_id}",
            get(get_pet).post(update_pet_with_form).delete(delete_pet),
        )
}

/// `?status=` for `GET /pet/findByStatus`.
#[derive(Debug)]
pub struct StatusQuery {
    pub status: String,
}

impl FromBody for StatusQuery {
    fn from_body(value: &Value, loc: &Loc) -> std::result::Result<Self, Vec<FieldError>> {
        let mut reader = ObjectReader::new(value, loc);
        match reader.string("status") {
            Some(status) if reader.is_clean() => Ok(Self { status }),
            _ => Err(reader.into_errors()),
        }
    }
}

/// Optional form fields for `POST /pet/{pet_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    pub name: Option<String>,
    pub status: Option<String>,
}

/// Body returned by the form update.
#[derive(Debug, Serialize)]
pub struct PetUpdated {
    pub message: &'static str,
    pub pet: Pet,
}

/// Pets with the given status; an empty match is a 404.
#[instrument(skip(state, query), fields(status = %query.status))]
async fn find_by_status(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<StatusQuery>,
) -> Result<Json<Vec<Pet>>> {
    info!("Received request to find pets by status");
    let pets = state.pets().find_by_status(&query.status)?;
    if pets.is_empty() {
        return Err(StoreError::PetsNotFound(query.status).into());
    }
    Ok(Json(pets))
}

#[instrument(skip(state))]
async fn get_pet(
    State(state): State<AppState>,
    ValidPath(pet_id): ValidPath<PetId>,
) -> Result<Json<Pet>> {
    info!("Received request to get pet by ID");
    Ok(Json(state.pets().get(pet_id)?))
}

#[instrument(skip_all)]
async fn add_pet(
    State(state): State<AppState>,
    ValidJson(new_pet): ValidJson<NewPet>,
) -> Result<(StatusCode, Json<Pet>)> {
    info!(name = %new_pet.name, "Received request to add new pet");
    let pet = state.pets().add(new_pet)?;
    Ok((StatusCode::CREATED, Json(pet)))
}

#[instrument(skip_all)]
async fn update_pet(
    State(state): State<AppState>,
    ValidJson(update): ValidJson<PetUpdate>,
) -> Result<Json<Pet>> {
    info!(pet_id = %update.id, "Received request to update pet");
    Ok(Json(state.pets().update(update)?))
}

#[instrument(skip(state, form))]
async fn update_pet_with_form(
    State(state): State<AppState>,
    ValidPath(pet_id): ValidPath<PetId>,
    OptionalForm(form): OptionalForm<PetForm>,
) -> Result<Json<PetUpdated>> {
    info!(name = ?form.name, status = ?form.status, "Received request to update pet using form data");
    let pet = state
        .pets()
        .update_with_form(pet_id, form.name, form.status)?;
    Ok(Json(PetUpdated {
        message: "Pet updated successfully",
        pet,
    }))
}

#[instrument(skip(state))]
async fn delete_pet(
    State(state): State<AppState>,
    ValidPath(pet_id): ValidPath<PetId>,
) -> Result<Json<Confirmation>> {
    info!("Received request to delete pet");
    Ok(Json(state.pets().delete(pet_id)?))
}
