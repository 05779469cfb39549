use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::IdGenerator;

/// Display colour given to custom dice that have no better candidate.
pub const DEFAULT_CUSTOM_COLOR: &str = "#8884FF";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Standard dice have 4, 6, 8, 10, 12 or 20 sides, not {0}")]
pub struct UnsupportedSidesError(pub u32);

/// Side counts a standard die can have.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub enum Sides {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl Sides {
    pub const ALL: [Sides; 6] = [
        Sides::D4,
        Sides::D6,
        Sides::D8,
        Sides::D10,
        Sides::D12,
        Sides::D20,
    ];

    pub const fn count(self) -> u32 {
        match self {
            Sides::D4 => 4,
            Sides::D6 => 6,
            Sides::D8 => 8,
            Sides::D10 => 10,
            Sides::D12 => 12,
            Sides::D20 => 20,
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Sides::D4 => "#ef4444",
            Sides::D6 => "#3b82f6",
            Sides::D8 => "#10b981",
            Sides::D10 => "#f59e0b",
            Sides::D12 => "#8b5cf6",
            Sides::D20 => "#ec4899",
        }
    }
}

impl TryFrom<u32> for Sides {
    type Error = UnsupportedSidesError;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Sides::ALL
            .into_iter()
            .find(|sides| sides.count() == count)
            .ok_or(UnsupportedSidesError(count))
    }
}

impl From<Sides> for u32 {
    fn from(sides: Sides) -> Self {
        sides.count()
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.count())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StandardDice {
    pub id: String,
    pub sides: Sides,
    pub name: String,
    pub color: String,
}

impl StandardDice {
    /// The die from the built-in set, e.g. `d20` named `D20`.
    pub fn new(sides: Sides) -> Self {
        StandardDice {
            id: format!("d{}", sides.count()),
            sides,
            name: sides.to_string(),
            color: sides.color().to_string(),
        }
    }
}

/// The built-in D4 to D20 set, smallest first.
pub fn standard_dice() -> Vec<StandardDice> {
    Sides::ALL.into_iter().map(StandardDice::new).collect()
}

/// Display hint distinguishing number-range dice from colour dice.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CustomKind {
    Numbers,
    Colors,
}

impl CustomKind {
    /// Guesses the subtype from the labels; mixed or free-text labels have none.
    pub fn infer<S: AsRef<str>>(labels: &[S]) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        if labels.iter().all(|l| l.as_ref().trim().parse::<i64>().is_ok()) {
            Some(CustomKind::Numbers)
        } else if labels.iter().all(|l| is_hex_color(l.as_ref())) {
            Some(CustomKind::Colors)
        } else {
            None
        }
    }
}

pub fn is_hex_color(label: &str) -> bool {
    lazy_static! {
        static ref HEX_COLOR: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").unwrap();
    }
    HEX_COLOR.is_match(label.trim())
}

/// A user-defined die. Labels are rolled uniformly; see [`crate::validate`] for the
/// rules a persisted die has to satisfy.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CustomDice {
    pub id: String,
    pub name: String,
    #[serde(rename = "sides")]
    pub labels: Vec<String>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<CustomKind>,
}

impl CustomDice {
    pub fn kind(&self) -> Option<CustomKind> {
        self.subtype.or_else(|| CustomKind::infer(&self.labels))
    }
}

/// Builds a custom die with a fresh id. Nothing is validated here.
pub fn create_custom_dice<G, S>(ids: &mut G, name: S, labels: Vec<String>, color: S) -> CustomDice
where
    G: IdGenerator + ?Sized,
    S: Into<String>,
{
    let subtype = CustomKind::infer(&labels);
    CustomDice {
        id: ids.next_id(),
        name: name.into(),
        labels,
        color: color.into(),
        subtype,
    }
}

/// Labels `min..=max` as text. Empty when `min > max`.
pub fn number_labels(min: i32, max: i32) -> Vec<String> {
    (min..=max).map(|n| n.to_string()).collect()
}

/// A `numbers` die labelled `min..=max`.
pub fn create_number_dice<G>(ids: &mut G, name: &str, min: i32, max: i32, color: &str) -> CustomDice
where
    G: IdGenerator + ?Sized,
{
    let mut dice = create_custom_dice(ids, name, number_labels(min, max), color);
    dice.subtype = Some(CustomKind::Numbers);
    dice
}

/// A `colors` die; its display colour is the first face.
pub fn create_color_dice<G>(ids: &mut G, name: &str, colors: Vec<String>) -> CustomDice
where
    G: IdGenerator + ?Sized,
{
    let color = colors
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_CUSTOM_COLOR.to_string());
    let mut dice = create_custom_dice(ids, name.to_string(), colors, color);
    dice.subtype = Some(CustomKind::Colors);
    dice
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Dice {
    Standard(StandardDice),
    Custom(CustomDice),
}

impl Dice {
    pub fn id(&self) -> &str {
        match self {
            Dice::Standard(dice) => &dice.id,
            Dice::Custom(dice) => &dice.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Dice::Standard(dice) => &dice.name,
            Dice::Custom(dice) => &dice.name,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Dice::Standard(dice) => &dice.color,
            Dice::Custom(dice) => &dice.color,
        }
    }

    /// Number of faces, i.e. how many outcomes a roll can produce.
    pub fn face_count(&self) -> usize {
        match self {
            Dice::Standard(dice) => dice.sides.count() as usize,
            Dice::Custom(dice) => dice.labels.len(),
        }
    }
}

impl From<StandardDice> for Dice {
    fn from(dice: StandardDice) -> Self {
        Dice::Standard(dice)
    }
}

impl From<CustomDice> for Dice {
    fn from(dice: CustomDice) -> Self {
        Dice::Custom(dice)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dice::Standard(dice) => write!(f, "{}", dice.name),
            Dice::Custom(dice) => write!(f, "{} [{}]", dice.name, dice.labels.join(", ")),
        }
    }
}
