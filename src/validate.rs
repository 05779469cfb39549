use thiserror::Error;

use crate::dice::{is_hex_color, CustomDice};
use crate::utils::{collapse_whitespace, is_blank};

/// Fewest labels a custom die may have.
pub const MIN_LABELS: usize = 2;

/// Most faces a number-range die may have.
pub const MAX_RANGE_FACES: i64 = 1000;

const KEY_SEPARATOR: &str = "-";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Dice name is required")]
    NameRequired,
    #[error("Dice must have at least 2 sides")]
    TooFewSides,
    #[error("All sides must have values")]
    EmptySide,
    #[error("Range start {min} is greater than range end {max}")]
    InvertedRange { min: i32, max: i32 },
    #[error("A range of {count} sides is more than the 1000 allowed")]
    RangeTooLarge { count: i64 },
    #[error("{0} is not a hex color")]
    InvalidColor(String),
}

/// Checks a custom die definition before it is created.
///
/// The name must not be blank, there must be at least [`MIN_LABELS`] labels and
/// none of them may be blank. Checks run in that order and the first failure wins.
pub fn validate_custom_dice<S: AsRef<str>>(name: &str, labels: &[S]) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::NameRequired);
    }
    if labels.len() < MIN_LABELS {
        return Err(ValidationError::TooFewSides);
    }
    if labels.iter().any(|label| is_blank(label.as_ref())) {
        return Err(ValidationError::EmptySide);
    }
    Ok(())
}

/// `min..=max` has to be ascending and at most [`MAX_RANGE_FACES`] long.
pub fn validate_number_range(min: i32, max: i32) -> Result<(), ValidationError> {
    if min > max {
        return Err(ValidationError::InvertedRange { min, max });
    }
    let count = i64::from(max) - i64::from(min) + 1;
    if count > MAX_RANGE_FACES {
        return Err(ValidationError::RangeTooLarge { count });
    }
    Ok(())
}

/// Every face of a colour die must be `#rgb` or `#rrggbb`.
pub fn validate_colors<S: AsRef<str>>(colors: &[S]) -> Result<(), ValidationError> {
    match colors.iter().find(|c| !is_hex_color(c.as_ref())) {
        Some(bad) => Err(ValidationError::InvalidColor(bad.as_ref().to_string())),
        None => Ok(()),
    }
}

/// Two custom dice with the same key are the same die as far as the user is concerned.
///
/// The key is `custom-<name>-<label>-<label>...` where the name is trimmed, lowercased
/// and has its whitespace runs replaced by `-`. Labels are joined verbatim, so
/// `["A-B"]` and `["A", "B"]` collide; this keeps keys compatible with dice ids
/// written by the browser app.
pub fn identity_key<S: AsRef<str>>(name: &str, labels: &[S]) -> String {
    let name = name.to_lowercase();
    let mut key = format!("custom{}{}", KEY_SEPARATOR, collapse_whitespace(&name, KEY_SEPARATOR));
    key.push_str(KEY_SEPARATOR);
    key.push_str(
        &labels
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(KEY_SEPARATOR),
    );
    key
}

impl CustomDice {
    pub fn identity_key(&self) -> String {
        identity_key(&self.name, &self.labels)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_custom_dice(&self.name, &self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_custom_dice() {
        let cases: [(&str, &[&str], Result<(), ValidationError>); 9] = [
            ("", &["a", "b"], Err(ValidationError::NameRequired)),
            ("   ", &["a", "b"], Err(ValidationError::NameRequired)),
            ("X", &[], Err(ValidationError::TooFewSides)),
            ("X", &["a"], Err(ValidationError::TooFewSides)),
            ("X", &["a", " "], Err(ValidationError::EmptySide)),
            ("X", &["", "b"], Err(ValidationError::EmptySide)),
            // name is checked before sides
            ("", &["a"], Err(ValidationError::NameRequired)),
            ("X", &["a", "b"], Ok(())),
            ("Fate", &["Yes", "No", "Maybe"], Ok(())),
        ];

        for (name, labels, expected) in cases {
            assert_eq!(expected, validate_custom_dice(name, labels), "{:?} {:?}", name, labels);
        }
    }

    #[test]
    fn validates_number_ranges() {
        assert_eq!(Ok(()), validate_number_range(1, 6));
        assert_eq!(Ok(()), validate_number_range(3, 3));
        assert_eq!(
            Err(ValidationError::InvertedRange { min: 6, max: 1 }),
            validate_number_range(6, 1)
        );
        assert_eq!(Ok(()), validate_number_range(1, 1000));
        assert_eq!(
            Err(ValidationError::RangeTooLarge { count: 1001 }),
            validate_number_range(0, 1000)
        );
        assert_eq!(
            Err(ValidationError::RangeTooLarge { count: 4_000_000_001 }),
            validate_number_range(-2_000_000_000, 2_000_000_000)
        );
    }

    #[test]
    fn validates_colors() {
        let cases: [(&[&str], Result<(), ValidationError>); 5] = [
            (&["#FF0000", "#fd0"], Ok(())),
            (&[" #00C853 "], Ok(())),
            (&["#FF0000", "blue"], Err(ValidationError::InvalidColor("blue".to_string()))),
            (&["red"], Err(ValidationError::InvalidColor("red".to_string()))),
            (&["#12345"], Err(ValidationError::InvalidColor("#12345".to_string()))),
        ];

        for (colors, expected) in cases {
            assert_eq!(expected, validate_colors(colors), "{:?}", colors);
        }
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!("Dice must have at least 2 sides", ValidationError::TooFewSides.to_string());
        assert_eq!("All sides must have values", ValidationError::EmptySide.to_string());
    }

    #[test]
    fn derives_identity_keys() {
        let cases: [(&str, &[&str], &str); 4] = [
            ("Fate", &["Yes", "No"], "custom-fate-Yes-No"),
            ("  Big   Red Die ", &["1", "2"], "custom-big-red-die-1-2"),
            ("Paint", &["#FF0000", "#2979FF"], "custom-paint-#FF0000-#2979FF"),
            ("FATE", &["yes", "no"], "custom-fate-yes-no"),
        ];

        for (name, labels, expected) in cases {
            assert_eq!(expected, identity_key(name, labels));
        }
    }

    #[test]
    fn joined_labels_can_collide() {
        assert_eq!(identity_key("X", &["A-B"]), identity_key("X", &["A", "B"]));
    }
}
