use std::fmt;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dice::Dice;
use crate::ids::{IdGenerator, UuidGenerator};

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Dice {dice_id} has no sides to roll")]
pub struct InvalidDiceError {
    pub dice_id: String,
}

/// The face that came up: a number for standard dice, a label for custom dice.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RollOutcome {
    Number(u32),
    Label(String),
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollOutcome::Number(n) => write!(f, "{}", n),
            RollOutcome::Label(label) => write!(f, "{}", label),
        }
    }
}

/// Record of a single roll. The dice id and name are copied when the roll is made and
/// are not updated if the die is later edited or deleted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pub id: String,
    pub dice_id: String,
    pub dice_name: String,
    pub result: RollOutcome,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: 🎲 {} 🎲", self.dice_name, self.result)
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The roll engine. Randomness and id generation are injected so rolls can be
/// reproduced in tests.
#[derive(Debug)]
pub struct Roller<R = ThreadRng, G = UuidGenerator> {
    rng: R,
    ids: G,
}

impl Roller {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Roller {
    fn default() -> Self {
        Roller {
            rng: rand::thread_rng(),
            ids: UuidGenerator,
        }
    }
}

impl Roller<StdRng, UuidGenerator> {
    pub fn from_seed(seed: u64) -> Self {
        Roller {
            rng: StdRng::seed_from_u64(seed),
            ids: UuidGenerator,
        }
    }
}

impl<R: Rng, G: IdGenerator> Roller<R, G> {
    pub fn with_parts(rng: R, ids: G) -> Self {
        Roller { rng, ids }
    }

    /// The id generator, shared with code that creates dice and sessions.
    pub fn ids(&mut self) -> &mut G {
        &mut self.ids
    }

    /// Rolls `dice` once.
    ///
    /// Standard dice yield a uniform integer in `1..=sides`; custom dice yield one of
    /// their labels with equal probability. A custom die without labels is rejected.
    pub fn roll(&mut self, dice: &Dice) -> Result<RollResult, InvalidDiceError> {
        let result = self.draw(dice)?;
        let roll = RollResult {
            id: self.ids.next_id(),
            dice_id: dice.id().to_string(),
            dice_name: dice.name().to_string(),
            result,
            timestamp: now_millis(),
            game_id: None,
        };
        log::debug!("Dice roll: {:?}", roll);
        Ok(roll)
    }

    /// Like [`Roller::roll`], tagging the result with the game session it belongs to.
    pub fn roll_in_game(&mut self, dice: &Dice, game_id: &str) -> Result<RollResult, InvalidDiceError> {
        let mut roll = self.roll(dice)?;
        roll.game_id = Some(game_id.to_string());
        Ok(roll)
    }

    fn draw(&mut self, dice: &Dice) -> Result<RollOutcome, InvalidDiceError> {
        match dice {
            Dice::Standard(standard) => {
                let die = Uniform::from(1..=standard.sides.count());
                Ok(RollOutcome::Number(die.sample(&mut self.rng)))
            }
            Dice::Custom(custom) => {
                if custom.labels.is_empty() {
                    log::error!("Refusing to roll custom dice {} without sides", custom.id);
                    return Err(InvalidDiceError {
                        dice_id: custom.id.clone(),
                    });
                }
                let index = self.rng.gen_range(0..custom.labels.len());
                Ok(RollOutcome::Label(custom.labels[index].clone()))
            }
        }
    }
}
