//! Pure validation rules for catalog input.
//!
//! # Responsibility
//! - Check field presence, name length, forbidden characters and word
//!   capitalization.
//! - Run the full perfume pipeline and report the first failure.
//!
//! # Invariants
//! - Functions are side-effect free and never touch storage.
//! - Pipeline order: required fields, name length, forbidden characters,
//!   capitalization.

use crate::model::perfume::Perfume;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Characters rejected in perfume names unless a caller supplies its own set.
pub const DEFAULT_FORBIDDEN_CHARACTERS: &str = "$%^@";
pub const NAME_MIN_CHARS: usize = 5;
pub const NAME_MAX_CHARS: usize = 90;

/// Perfume fields that must be present, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfumeField {
    PerfumeId,
    Name,
    Ingredients,
    Concentration,
    Longevity,
    Manufacturer,
}

impl PerfumeField {
    fn required_message(self) -> &'static str {
        match self {
            Self::PerfumeId => "Perfume ID is required",
            Self::Name => "Perfume Name is required",
            Self::Ingredients => "Ingredients are required",
            Self::Concentration => "Concentration is required",
            Self::Longevity => "Longevity is required",
            Self::Manufacturer => "Manufacturer is required",
        }
    }
}

/// First rule a perfume failed. `Display` yields the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(PerfumeField),
    NameLength { min: usize, max: usize },
    ForbiddenCharacters,
    Capitalization,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{}", field.required_message()),
            Self::NameLength { min, max } => {
                write!(f, "Perfume Name must be between {min} and {max} characters")
            }
            Self::ForbiddenCharacters => write!(
                f,
                "Perfume Name must not contain special characters such as $, %, ^, @"
            ),
            Self::Capitalization => write!(
                f,
                "Each word of Perfume Name must begin with a capital letter or digits 1-9"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Checks that every required field is non-blank, failing on the first gap.
pub fn required_fields_present(perfume: &Perfume) -> Result<(), ValidationError> {
    let fields = [
        (PerfumeField::PerfumeId, &perfume.perfume_id),
        (PerfumeField::Name, &perfume.name),
        (PerfumeField::Ingredients, &perfume.ingredients),
        (PerfumeField::Concentration, &perfume.concentration),
        (PerfumeField::Longevity, &perfume.longevity),
        (PerfumeField::Manufacturer, &perfume.manufacturer_id),
    ];

    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(ValidationError::MissingField(*field)),
        None => Ok(()),
    }
}

/// Whether `text` has between `min` and `max` characters, inclusive.
///
/// Empty text is always out of range.
pub fn length_in_range(text: &str, min: usize, max: usize) -> bool {
    if text.is_empty() {
        return false;
    }
    let length = text.chars().count();
    (min..=max).contains(&length)
}

/// Whether any character of `forbidden` occurs in `text`.
pub fn contains_forbidden_characters(text: &str, forbidden: &str) -> bool {
    text.chars().any(|c| forbidden.contains(c))
}

/// Whether every space-separated word starts with an uppercase letter or a
/// digit `1`-`9`.
///
/// Splits on single spaces, so runs of spaces yield empty words which are
/// skipped. Empty input fails.
pub fn words_properly_capitalized(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    text.split(' ')
        .filter_map(|word| word.chars().next())
        .all(|first| first.is_uppercase() || ('1'..='9').contains(&first))
}

/// Runs the whole perfume pipeline and returns the first failure.
pub fn validate_perfume(perfume: &Perfume) -> Result<(), ValidationError> {
    required_fields_present(perfume)?;

    if !length_in_range(&perfume.name, NAME_MIN_CHARS, NAME_MAX_CHARS) {
        return Err(ValidationError::NameLength {
            min: NAME_MIN_CHARS,
            max: NAME_MAX_CHARS,
        });
    }
    if contains_forbidden_characters(&perfume.name, DEFAULT_FORBIDDEN_CHARACTERS) {
        return Err(ValidationError::ForbiddenCharacters);
    }
    if !words_properly_capitalized(&perfume.name) {
        return Err(ValidationError::Capitalization);
    }

    Ok(())
}
