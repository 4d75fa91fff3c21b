//! Pet store.

use std::sync::RwLock;

use tracing::{info, instrument, warn};

use pet_store_core::{NewPet, Pet, PetId, PetUpdate};

use super::{Confirmation, StoreError, StoreResult, read, write};

const COLLECTION: &str = "pets";

/// Insertion-ordered pet collection.
#[derive(Debug, Default)]
pub struct PetStore {
    pets: RwLock<Vec<Pet>>,
}

impl PetStore {
    /// Create a store holding `pets` in the given order.
    #[must_use]
    pub const fn new(pets: Vec<Pet>) -> Self {
        Self {
            pets: RwLock::new(pets),
        }
    }

    /// All pets whose status equals `status`, in insertion order.
    ///
    /// An empty result is not an error here; the router decides how to
    /// surface it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if the collection lock is poisoned.
    #[instrument(skip(self))]
    pub fn find_by_status(&self, status: &str) -> StoreResult<Vec<Pet>> {
        info!("Finding pets with status");
        let pets: Vec<Pet> = read(&self.pets, COLLECTION)?
            .iter()
            .filter(|pet| pet.status == status)
            .cloned()
            .collect();
        info!(count = pets.len(), "Found pets with status");
        Ok(pets)
    }

    /// The pet with the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PetNotFound` if no pet has that id.
    #[instrument(skip(self))]
    pub fn get(&self, pet_id: PetId) -> StoreResult<Pet> {
        info!("Getting pet by ID");
        read(&self.pets, COLLECTION)?
            .iter()
            .find(|pet| pet.id == pet_id)
            .cloned()
            .ok_or_else(|| not_found(pet_id))
    }

    /// Store a new pet under the next free id (max existing id + 1, or 1).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if the collection lock is poisoned.
    #[instrument(skip(self, new_pet), fields(name = %new_pet.name))]
    pub fn add(&self, new_pet: NewPet) -> StoreResult<Pet> {
        info!(status = %new_pet.status, "Adding new pet");
        let mut pets = write(&self.pets, COLLECTION)?;
        let pet_id = PetId::after_max(pets.iter().map(|pet| pet.id));
        let pet = new_pet.with_id(pet_id);
        pets.push(pet.clone());
        info!(%pet_id, "Added new pet with ID");
        Ok(pet)
    }

    /// Replace the name and status of an existing pet. The category is kept.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PetNotFound` if no pet has `update.id`.
    #[instrument(skip(self, update), fields(pet_id = %update.id))]
    pub fn update(&self, update: PetUpdate) -> StoreResult<Pet> {
        info!(name = %update.name, status = %update.status, "Updating pet");
        self.modify(update.id, |pet| {
            pet.name = update.name;
            pet.status = update.status;
        })
    }

    /// Partially update a pet from form fields; absent fields are left alone.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PetNotFound` if no pet has `pet_id`.
    #[instrument(skip(self))]
    pub fn update_with_form(
        &self,
        pet_id: PetId,
        name: Option<String>,
        status: Option<String>,
    ) -> StoreResult<Pet> {
        info!("Updating pet with ID using form data");
        self.modify(pet_id, |pet| {
            if let Some(name) = name {
                pet.name = name;
            }
            if let Some(status) = status {
                pet.status = status;
            }
        })
    }

    /// Remove a pet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PetNotFound` if no pet has `pet_id`.
    #[instrument(skip(self))]
    pub fn delete(&self, pet_id: PetId) -> StoreResult<Confirmation> {
        info!("Deleting pet");
        let mut pets = write(&self.pets, COLLECTION)?;
        let before = pets.len();
        pets.retain(|pet| pet.id != pet_id);
        if pets.len() == before {
            return Err(not_found(pet_id));
        }
        info!("Pet deleted successfully");
        Ok(Confirmation::new(format!(
            "Pet with ID {pet_id} has been deleted"
        )))
    }

    /// Visit every pet in insertion order under one read guard.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if the collection lock is poisoned.
    pub fn for_each(&self, mut visit: impl FnMut(&Pet)) -> StoreResult<()> {
        read(&self.pets, COLLECTION)?.iter().for_each(|pet| visit(pet));
        Ok(())
    }

    fn modify(&self, pet_id: PetId, apply: impl FnOnce(&mut Pet)) -> StoreResult<Pet> {
        let mut pets = write(&self.pets, COLLECTION)?;
        let pet = pets
            .iter_mut()
            .find(|pet| pet.id == pet_id)
            .ok_or_else(|| not_found(pet_id))?;
        apply(pet);
        info!(%pet_id, name = %pet.name, status = %pet.status, "Pet updated successfully");
        Ok(pet.clone())
    }
}

fn not_found(pet_id: PetId) -> StoreError {
    warn!(%pet_id, "Pet with ID not found");
    StoreError::PetNotFound(pet_id)
}
