//! Field validation.
//!
//! One function per constrained field, each returning the `FieldError` for
//! that field. The payload `validate` methods run every check and collect all
//! failures, so a client sees every bad field at once.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FieldError, ValidationError};
use crate::types::{Patch, RecipeCreate, RecipeUpdate};

pub const TITLE_MAX_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const COLOR_PATTERN: &str = r"^#([A-Fa-f0-9]{6})$";

/// (kind, message) reported when an update sets a field to `null`.
type NullError = (&'static str, &'static str);
const NULL_STRING: NullError = ("string_type", "Input should be a valid string");
const NULL_LIST: NullError = ("list_type", "Input should be a valid list");

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COLOR_PATTERN).expect("color pattern compiles"));

/// Title: 1..=120 characters.
pub fn validate_title(title: &str) -> Result<(), FieldError> {
    if title.is_empty() {
        return Err(FieldError::new(
            "title",
            "string_too_short",
            "String should have at least 1 character",
        ));
    }
    max_chars("title", title, TITLE_MAX_CHARS)
}

/// Description: at most 500 characters.
pub fn validate_description(description: &str) -> Result<(), FieldError> {
    max_chars("description", description, DESCRIPTION_MAX_CHARS)
}

/// Color: `#` followed by exactly six hex digits.
pub fn validate_color(color: &str) -> Result<(), FieldError> {
    if COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(FieldError::new(
            "color",
            "string_pattern_mismatch",
            format!("String should match pattern '{COLOR_PATTERN}'"),
        ))
    }
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    // Lengths are in characters, not bytes.
    if value.chars().count() > max {
        Err(FieldError::new(
            field,
            "string_too_long",
            format!("String should have at most {max} characters"),
        ))
    } else {
        Ok(())
    }
}

impl RecipeCreate {
    /// Check every field, reporting all failures.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let errors = [
            validate_title(&self.title),
            validate_description(&self.description),
            validate_color(&self.color),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();
        ValidationError::check(errors)
    }
}

impl RecipeUpdate {
    /// Check every supplied field. Absent fields are always fine; `null` never is.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let errors = [
            check_patch("title", NULL_STRING, &self.title, |t| validate_title(t)),
            check_patch("description", NULL_STRING, &self.description, |d| {
                validate_description(d)
            }),
            check_patch("ingredients", NULL_LIST, &self.ingredients, |_| Ok(())),
            check_patch("steps", NULL_LIST, &self.steps, |_| Ok(())),
            check_patch("color", NULL_STRING, &self.color, |c| validate_color(c)),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();
        ValidationError::check(errors)
    }
}

fn check_patch<T>(
    field: &'static str,
    (null_kind, null_message): NullError,
    patch: &Patch<T>,
    check: impl FnOnce(&T) -> Result<(), FieldError>,
) -> Result<(), FieldError> {
    match patch {
        Patch::Absent => Ok(()),
        Patch::Null => Err(FieldError::new(field, null_kind, null_message)),
        Patch::Value(value) => check(value),
    }
}
