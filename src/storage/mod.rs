//! Persistence of custom dice, roll history, game sessions and game templates.
//!
//! Every collection lives as one JSON array under its own key of a [`KeyValueStore`].
//! Reads are fail-soft: a missing key, unreadable store or corrupt blob all read as an
//! empty collection. Writes replace the whole blob and are best-effort: failures are
//! logged and handed back, but nothing upstream is expected to crash on them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::dice::{CustomDice, Dice};
use crate::game::{GameSession, GameTemplate};
use crate::roll::RollResult;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Most recent rolls kept in history.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Error accessing {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error serializing {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Writing {key} needs {needed} bytes but the quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
}

/// String key-value store the collections are persisted in.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    CustomDice,
    RollHistory,
    GameSessions,
    GameTemplates,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::CustomDice,
        Collection::RollHistory,
        Collection::GameSessions,
        Collection::GameTemplates,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Collection::CustomDice => "custom-dice",
            Collection::RollHistory => "roll-history",
            Collection::GameSessions => "game-sessions",
            Collection::GameTemplates => "game-templates",
        }
    }
}

/// Gateway to the persisted collections.
#[derive(Debug)]
pub struct Storage<S> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, "")
    }

    /// Namespaces every key, e.g. `dice-roller-` reproduces the browser app's keys.
    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Storage {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self, collection: Collection) -> String {
        format!("{}{}", self.prefix, collection.key())
    }

    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let key = self.key(collection);
        let raw = match self.store.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read {}, treating it as empty: {}", key, e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("Discarding unreadable {}: {}", key, e);
                Vec::new()
            }
        }
    }

    fn persist<T: Serialize>(&mut self, collection: Collection, items: &[T]) -> Result<(), StorageError> {
        let key = self.key(collection);
        let result = serde_json::to_string(items)
            .map_err(|source| StorageError::Serialization {
                key: key.clone(),
                source,
            })
            .and_then(|raw| self.store.set_item(&key, &raw));
        match &result {
            Ok(()) => log::debug!("Saved {} entries to {}", items.len(), key),
            Err(e) => log::warn!("Failed to save {}: {}", key, e),
        }
        result
    }

    /// Deletes a collection's blob outright; it reads as empty afterwards.
    pub fn remove_collection(&mut self, collection: Collection) -> Result<(), StorageError> {
        let key = self.key(collection);
        let result = self.store.remove_item(&key);
        match &result {
            Ok(()) => log::info!("Removed {}", key),
            Err(e) => log::warn!("Failed to remove {}: {}", key, e),
        }
        result
    }

    pub fn get_custom_dice(&self) -> Vec<CustomDice> {
        self.load::<Dice>(Collection::CustomDice)
            .into_iter()
            .filter_map(|dice| match dice {
                Dice::Custom(custom) => Some(custom),
                Dice::Standard(standard) => {
                    log::warn!("Skipping standard dice {} stored with custom dice", standard.id);
                    None
                }
            })
            .collect()
    }

    pub fn save_custom_dice(&mut self, dice: &[CustomDice]) -> Result<(), StorageError> {
        let tagged: Vec<Dice> = dice.iter().cloned().map(Dice::Custom).collect();
        self.persist(Collection::CustomDice, &tagged)
    }

    /// Most recent roll first.
    pub fn get_roll_history(&self) -> Vec<RollResult> {
        self.load(Collection::RollHistory)
    }

    pub fn save_roll_history(&mut self, history: &[RollResult]) -> Result<(), StorageError> {
        self.persist(Collection::RollHistory, history)
    }

    /// Puts `roll` at the front of the history, dropping the oldest entries beyond
    /// [`HISTORY_LIMIT`].
    pub fn add_roll_to_history(&mut self, roll: RollResult) -> Result<(), StorageError> {
        let mut history = self.get_roll_history();
        history.insert(0, roll);
        history.truncate(HISTORY_LIMIT);
        self.save_roll_history(&history)
    }

    pub fn clear_roll_history(&mut self) -> Result<(), StorageError> {
        self.save_roll_history(&[])
    }

    pub fn get_game_sessions(&self) -> Vec<GameSession> {
        self.load(Collection::GameSessions)
    }

    pub fn save_game_sessions(&mut self, sessions: &[GameSession]) -> Result<(), StorageError> {
        self.persist(Collection::GameSessions, sessions)
    }

    pub fn get_game_templates(&self) -> Vec<GameTemplate> {
        self.load(Collection::GameTemplates)
    }

    pub fn save_game_templates(&mut self, templates: &[GameTemplate]) -> Result<(), StorageError> {
        self.persist(Collection::GameTemplates, templates)
    }
}
