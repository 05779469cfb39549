//! Dice rolling for standard and user-defined dice, with persisted custom dice, roll
//! history and game sessions.

pub mod catalog;
pub mod dice;
pub mod game;
pub mod history;
pub mod ids;
pub mod roll;
pub mod storage;
pub mod utils;
pub mod validate;

pub use catalog::{CatalogError, DuplicateDiceError};
pub use dice::{create_custom_dice, standard_dice, CustomDice, CustomKind, Dice, Sides, StandardDice};
pub use game::{GameError, GameSession, GameTemplate};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use roll::{InvalidDiceError, RollOutcome, RollResult, Roller};
pub use storage::{Collection, FileStore, KeyValueStore, MemoryStore, Storage, StorageError};
pub use validate::{validate_custom_dice, ValidationError};
