//! Domain types for the recipe store.
//!
//! `Recipe` is the stored record. `RecipeCreate` and `RecipeUpdate` are the
//! client payloads; they are plain data and carry no guarantees until
//! validated (see [`crate::validate`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned recipe identifier. Always >= 1.
pub type RecipeId = u64;

/// Accent color used when a payload does not name one.
pub const DEFAULT_COLOR: &str = "#3b82f6";

// ── Recipe ─────────────────────────────────────────────────────────

/// A stored recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    /// Ingredient lines, e.g. "2 eggs".
    pub ingredients: Vec<String>,
    /// Step lines, e.g. "Whisk eggs".
    pub steps: Vec<String>,
    /// Card accent color, `#rrggbb`.
    pub color: String,
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub deleted: bool,
    pub id: RecipeId,
}

impl Deleted {
    pub fn new(id: RecipeId) -> Self {
        Self { deleted: true, id }
    }
}

// ── Create payload ─────────────────────────────────────────────────

/// Payload for creating a recipe. Everything but `title` has a default.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecipeCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl RecipeCreate {
    /// A payload with the given title and every other field defaulted.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            color: default_color(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Build the stored record. Callers validate first.
    pub(crate) fn into_recipe(self, id: RecipeId, now: DateTime<Utc>) -> Recipe {
        Recipe {
            id,
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            steps: self.steps,
            color: self.color,
            created_at: now,
            updated_at: now,
        }
    }
}

// ── Update payload ─────────────────────────────────────────────────

/// One field of a partial update.
///
/// JSON distinguishes a missing key from `null`, and both from a value, so
/// the patch does too. `Absent` keeps the stored value; an explicit empty
/// string or list is a `Value` and overwrites it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Value(value)
    }
}

// Only reached when the key is present; a missing key takes `Default`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// Payload for a partial update. Only supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RecipeUpdate {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub ingredients: Patch<Vec<String>>,
    #[serde(default)]
    pub steps: Patch<Vec<String>>,
    #[serde(default)]
    pub color: Patch<String>,
}

impl RecipeUpdate {
    /// Number of fields the caller supplied (including explicit nulls).
    pub fn provided(&self) -> usize {
        [
            self.title.is_absent(),
            self.description.is_absent(),
            self.ingredients.is_absent(),
            self.steps.is_absent(),
            self.color.is_absent(),
        ]
        .iter()
        .filter(|absent| !**absent)
        .count()
    }

    /// Merge supplied values over `recipe`. Callers validate first, so a
    /// `Null` never gets here; it is treated like `Absent` regardless.
    pub(crate) fn apply_to(self, recipe: &mut Recipe) {
        fn set<T>(slot: &mut T, patch: Patch<T>) {
            if let Patch::Value(value) = patch {
                *slot = value;
            }
        }

        set(&mut recipe.title, self.title);
        set(&mut recipe.description, self.description);
        set(&mut recipe.ingredients, self.ingredients);
        set(&mut recipe.steps, self.steps);
        set(&mut recipe.color, self.color);
    }
}

// ── Timestamps ─────────────────────────────────────────────────────

/// RFC 3339 with microseconds and an explicit `+00:00` offset.
mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_recipe() -> Recipe {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        RecipeCreate::new("Pancakes").into_recipe(1, ts)
    }

    #[test]
    fn create_payload_defaults() {
        let payload: RecipeCreate = serde_json::from_str(r#"{"title": "Tea"}"#).unwrap();
        assert_eq!(payload, RecipeCreate::new("Tea"));
        assert_eq!(payload.color, DEFAULT_COLOR);
    }

    #[test]
    fn create_payload_requires_title() {
        let result: Result<RecipeCreate, _> = serde_json::from_str(r##"{"color": "#ffffff"}"##);
        assert!(result.is_err());
    }

    #[test]
    fn update_distinguishes_absent_null_and_empty() {
        let update: RecipeUpdate =
            serde_json::from_str(r#"{"description": "", "steps": null, "ingredients": []}"#)
                .unwrap();

        assert_eq!(update.title, Patch::Absent);
        assert_eq!(update.description, Patch::Value(String::new()));
        assert_eq!(update.steps, Patch::Null);
        assert_eq!(update.ingredients, Patch::Value(Vec::new()));
        assert_eq!(update.color, Patch::Absent);
        assert_eq!(update.provided(), 3);
    }

    #[test]
    fn empty_update_provides_nothing() {
        let update: RecipeUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update, RecipeUpdate::default());
        assert_eq!(update.provided(), 0);
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut recipe = sample_recipe();
        recipe.ingredients = vec!["2 eggs".to_string()];

        RecipeUpdate {
            title: "Pancakes v2".to_string().into(),
            steps: Patch::Value(vec!["Whisk".to_string()]),
            ..Default::default()
        }
        .apply_to(&mut recipe);

        assert_eq!(recipe.title, "Pancakes v2");
        assert_eq!(recipe.steps, vec!["Whisk".to_string()]);
        assert_eq!(recipe.ingredients, vec!["2 eggs".to_string()]);
        assert_eq!(recipe.color, DEFAULT_COLOR);
    }

    #[test]
    fn timestamps_serialize_with_offset() {
        let json = serde_json::to_value(sample_recipe()).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:00:00.000000+00:00");
        assert_eq!(json["updated_at"], json["created_at"]);
        assert_eq!(json["id"], 1);
        assert_eq!(json["description"], "");
        assert_eq!(json["ingredients"], serde_json::json!([]));
    }

    #[test]
    fn recipe_json_round_trip() {
        let recipe = sample_recipe();
        let json = serde_json::to_string(&recipe).unwrap();
        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn deleted_shape() {
        let json = serde_json::to_value(Deleted::new(4)).unwrap();
        assert_eq!(json, serde_json::json!({"deleted": true, "id": 4}));
    }
}
