//! Request body decoding with per-field error locations.
//!
//! Bodies are first read as a JSON value, then checked field by field against
//! a small shape table before being deserialized into the payload type. A
//! wrong type therefore reports `["body", "<field>"]` (or the offending list
//! index) instead of a single opaque decode error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult, ErrorDetail, Loc};

/// JSON shape a payload field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Text,
    Lines,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
    /// `null` passes the shape check (the store rejects it later if needed).
    pub nullable: bool,
}

const fn field(name: &'static str, shape: Shape, required: bool, nullable: bool) -> FieldSpec {
    FieldSpec {
        name,
        shape,
        required,
        nullable,
    }
}

pub const CREATE_FIELDS: &[FieldSpec] = &[
    field("title", Shape::Text, true, false),
    field("description", Shape::Text, false, false),
    field("ingredients", Shape::Lines, false, false),
    field("steps", Shape::Lines, false, false),
    field("color", Shape::Text, false, false),
];

pub const UPDATE_FIELDS: &[FieldSpec] = &[
    field("title", Shape::Text, false, true),
    field("description", Shape::Text, false, true),
    field("ingredients", Shape::Lines, false, true),
    field("steps", Shape::Lines, false, true),
    field("color", Shape::Text, false, true),
];

/// Check `value` against `fields`, then deserialize it.
pub fn decode<T: DeserializeOwned>(value: Value, fields: &[FieldSpec]) -> ApiResult<T> {
    let problems = check_shape(&value, fields);
    if !problems.is_empty() {
        return Err(ApiError::InvalidFields(problems));
    }
    serde_json::from_value(value).map_err(|e| ApiError::InvalidBody {
        kind: "json_data",
        message: e.to_string(),
    })
}

fn check_shape(value: &Value, fields: &[FieldSpec]) -> Vec<ErrorDetail> {
    let Some(object) = value.as_object() else {
        return vec![ErrorDetail::new(
            vec![Loc::Key("body")],
            "model_attributes_type",
            "Input should be a valid dictionary or object to extract fields from",
        )];
    };

    let mut problems = Vec::new();
    for spec in fields {
        let loc = || vec![Loc::Key("body"), Loc::Key(spec.name)];
        match object.get(spec.name) {
            None if spec.required => {
                problems.push(ErrorDetail::new(loc(), "missing", "Field required"));
            }
            None => {}
            Some(Value::Null) if spec.nullable => {}
            Some(found) => match spec.shape {
                Shape::Text if !found.is_string() => {
                    problems.push(ErrorDetail::new(
                        loc(),
                        "string_type",
                        "Input should be a valid string",
                    ));
                }
                Shape::Text => {}
                Shape::Lines => match found.as_array() {
                    None => problems.push(ErrorDetail::new(
                        loc(),
                        "list_type",
                        "Input should be a valid list",
                    )),
                    Some(items) => {
                        for (index, item) in items.iter().enumerate() {
                            if !item.is_string() {
                                let mut at = loc();
                                at.push(Loc::Index(index));
                                problems.push(ErrorDetail::new(
                                    at,
                                    "string_type",
                                    "Input should be a valid string",
                                ));
                            }
                        }
                    }
                },
            },
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_store::{Patch, RecipeCreate, RecipeUpdate};
    use serde_json::json;

    fn field_errors(result: ApiResult<impl std::fmt::Debug>) -> Vec<ErrorDetail> {
        match result {
            Err(ApiError::InvalidFields(details)) => details,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn decodes_valid_create() {
        let payload: RecipeCreate =
            decode(json!({"title": "Tea", "steps": ["Boil"]}), CREATE_FIELDS).unwrap();
        assert_eq!(payload.title, "Tea");
        assert_eq!(payload.steps, vec!["Boil".to_string()]);
    }

    #[test]
    fn missing_title_is_located() {
        let details = field_errors(decode::<RecipeCreate>(json!({"color": "#ffffff"}), CREATE_FIELDS));
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].loc, vec![Loc::Key("body"), Loc::Key("title")]);
        assert_eq!(details[0].kind, "missing");
    }

    #[test]
    fn wrong_types_are_located_per_field() {
        let details = field_errors(decode::<RecipeCreate>(
            json!({"title": 5, "ingredients": "water", "steps": ["Boil", 3]}),
            CREATE_FIELDS,
        ));

        assert_eq!(details.len(), 3);
        assert_eq!(details[0].loc, vec![Loc::Key("body"), Loc::Key("title")]);
        assert_eq!(details[0].kind, "string_type");
        assert_eq!(details[1].loc, vec![Loc::Key("body"), Loc::Key("ingredients")]);
        assert_eq!(details[1].kind, "list_type");
        assert_eq!(
            details[2].loc,
            vec![Loc::Key("body"), Loc::Key("steps"), Loc::Index(1)]
        );
    }

    #[test]
    fn non_object_body_is_rejected() {
        let details = field_errors(decode::<RecipeCreate>(json!(["Tea"]), CREATE_FIELDS));
        assert_eq!(details[0].loc, vec![Loc::Key("body")]);
        assert_eq!(details[0].kind, "model_attributes_type");
    }

    #[test]
    fn create_rejects_null_fields() {
        let details = field_errors(decode::<RecipeCreate>(
            json!({"title": "Tea", "description": null}),
            CREATE_FIELDS,
        ));
        assert_eq!(details[0].loc, vec![Loc::Key("body"), Loc::Key("description")]);
    }

    #[test]
    fn update_passes_nulls_through() {
        let patch: RecipeUpdate =
            decode(json!({"title": null, "steps": []}), UPDATE_FIELDS).unwrap();
        assert_eq!(patch.title, Patch::Null);
        assert_eq!(patch.steps, Patch::Value(Vec::new()));
    }

    #[test]
    fn update_wrong_type_is_located() {
        let details = field_errors(decode::<RecipeUpdate>(json!({"color": 255}), UPDATE_FIELDS));
        assert_eq!(details[0].loc, vec![Loc::Key("body"), Loc::Key("color")]);
        assert_eq!(details[0].kind, "string_type");
    }
}
