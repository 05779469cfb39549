//! Creating, editing and removing the user's custom dice.

use thiserror::Error;

use crate::dice::{self, standard_dice, CustomDice, Dice};
use crate::ids::IdGenerator;
use crate::storage::{KeyValueStore, Storage};
use crate::validate::{validate_colors, validate_number_range, ValidationError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("You can't create two identical custom dice: {name} already exists")]
pub struct DuplicateDiceError {
    pub name: String,
    pub existing_id: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Duplicate(#[from] DuplicateDiceError),
    #[error("No custom dice with id {0}")]
    NotFound(String),
}

impl<S: KeyValueStore> Storage<S> {
    /// The built-in dice followed by the stored custom dice.
    pub fn all_dice(&self) -> Vec<Dice> {
        standard_dice()
            .into_iter()
            .map(Dice::from)
            .chain(self.get_custom_dice().into_iter().map(Dice::from))
            .collect()
    }

    /// Looks a die up by id, falling back to a case-insensitive name match.
    pub fn find_dice(&self, query: &str) -> Option<Dice> {
        let dice = self.all_dice();
        let by_id = dice.iter().position(|d| d.id() == query);
        let index = by_id.or_else(|| {
            dice.iter()
                .position(|d| d.name().eq_ignore_ascii_case(query.trim()))
        })?;
        dice.into_iter().nth(index)
    }

    /// A stored die that has the same identity key as `name` and `labels`.
    pub fn find_duplicate<T: AsRef<str>>(&self, name: &str, labels: &[T]) -> Option<CustomDice> {
        let key = crate::validate::identity_key(name, labels);
        self.get_custom_dice()
            .into_iter()
            .find(|existing| existing.identity_key() == key)
    }

    /// Validates `dice`, rejects duplicates and appends it to the stored custom dice.
    pub fn add_custom_dice(&mut self, dice: CustomDice) -> Result<CustomDice, CatalogError> {
        dice.validate()?;
        let mut stored = self.get_custom_dice();
        let key = dice.identity_key();
        if let Some(existing) = stored.iter().find(|d| d.identity_key() == key) {
            log::info!("Rejecting duplicate custom dice {}", key);
            return Err(DuplicateDiceError {
                name: existing.name.clone(),
                existing_id: existing.id.clone(),
            }
            .into());
        }
        stored.push(dice.clone());
        // best-effort, a failure has already been logged
        let _ = self.save_custom_dice(&stored);
        log::info!("Created custom dice {} ({})", dice.name, dice.id);
        Ok(dice)
    }

    pub fn create_custom_dice<G>(
        &mut self,
        ids: &mut G,
        name: &str,
        labels: Vec<String>,
        color: &str,
    ) -> Result<CustomDice, CatalogError>
    where
        G: IdGenerator + ?Sized,
    {
        // validate before spending an id
        crate::validate::validate_custom_dice(name, &labels)?;
        self.add_custom_dice(dice::create_custom_dice(ids, name, labels, color))
    }

    pub fn create_number_dice<G>(
        &mut self,
        ids: &mut G,
        name: &str,
        min: i32,
        max: i32,
        color: &str,
    ) -> Result<CustomDice, CatalogError>
    where
        G: IdGenerator + ?Sized,
    {
        validate_number_range(min, max)?;
        self.add_custom_dice(dice::create_number_dice(ids, name, min, max, color))
    }

    pub fn create_color_dice<G>(
        &mut self,
        ids: &mut G,
        name: &str,
        colors: Vec<String>,
    ) -> Result<CustomDice, CatalogError>
    where
        G: IdGenerator + ?Sized,
    {
        validate_colors(&colors)?;
        self.add_custom_dice(dice::create_color_dice(ids, name, colors))
    }

    /// Replaces the stored die with the same id, keeping its position.
    pub fn update_custom_dice(&mut self, dice: CustomDice) -> Result<CustomDice, CatalogError> {
        dice.validate()?;
        let mut stored = self.get_custom_dice();
        let key = dice.identity_key();
        if let Some(other) = stored
            .iter()
            .find(|d| d.id != dice.id && d.identity_key() == key)
        {
            return Err(DuplicateDiceError {
                name: other.name.clone(),
                existing_id: other.id.clone(),
            }
            .into());
        }
        let slot = stored
            .iter_mut()
            .find(|d| d.id == dice.id)
            .ok_or_else(|| CatalogError::NotFound(dice.id.clone()))?;
        *slot = dice.clone();
        let _ = self.save_custom_dice(&stored);
        Ok(dice)
    }

    /// Removes a custom die. Rolls already in history keep pointing at its id.
    pub fn delete_custom_dice(&mut self, id: &str) -> Result<CustomDice, CatalogError> {
        let mut stored = self.get_custom_dice();
        let index = stored
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let removed = stored.remove(index);
        let _ = self.save_custom_dice(&stored);
        log::info!("Deleted custom dice {} ({})", removed.name, removed.id);
        Ok(removed)
    }
}
