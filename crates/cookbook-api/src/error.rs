//! API error type and its HTTP rendering.
//!
//! Error bodies carry a `detail` key: a plain string for 404s, and a list of
//! `{loc, msg, type}` entries for 422s so every rejected field is reported.

use std::num::IntErrorKind;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cookbook_store::{RecipeId, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The `{id}` path segment is not an integer >= 1.
    #[error("invalid recipe id {raw:?}: {message}")]
    InvalidId {
        raw: String,
        kind: &'static str,
        message: &'static str,
    },

    /// The `{id}` path segment is a positive integer too large for any
    /// allocated id.
    #[error("recipe id out of range: {0}")]
    IdOutOfRange(String),

    /// The request body could not be read as JSON at all.
    #[error("invalid request body: {message}")]
    InvalidBody { kind: &'static str, message: String },

    /// The body is JSON but some fields have the wrong shape.
    #[error("invalid request fields: {}", .0.len())]
    InvalidFields(Vec<ErrorDetail>),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::JsonDataError(_) => "json_data",
            JsonRejection::MissingJsonContentType(_) => "missing_content_type",
            _ => "body_invalid",
        };
        ApiError::InvalidBody {
            kind,
            message: rejection.body_text(),
        }
    }
}

/// Parse the `{id}` path segment.
pub fn parse_recipe_id(raw: &str) -> ApiResult<RecipeId> {
    let invalid = |kind, message| ApiError::InvalidId {
        raw: raw.to_string(),
        kind,
        message,
    };
    let below_one = || invalid("greater_than_equal", "Input should be greater than or equal to 1");

    if let Some(digits) = raw.strip_prefix('-') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(below_one());
        }
    }

    match raw.parse::<RecipeId>() {
        Ok(0) => Err(below_one()),
        Ok(id) => Ok(id),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            Err(ApiError::IdOutOfRange(raw.to_string()))
        }
        Err(_) => Err(invalid(
            "int_parsing",
            "Input should be a valid integer, unable to parse string as an integer",
        )),
    }
}

/// One segment of an error location: a key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Loc {
    Key(&'static str),
    Index(usize),
}

/// One entry of a 422 `detail` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub loc: Vec<Loc>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ErrorDetail {
    pub fn new(loc: Vec<Loc>, kind: &'static str, msg: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<T: Serialize> {
    detail: T,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::NotFound(_)) | ApiError::IdOutOfRange(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(StoreError::Validation(_))
            | ApiError::InvalidId { .. }
            | ApiError::InvalidBody { .. }
            | ApiError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn details(self) -> Vec<ErrorDetail> {
        match self {
            ApiError::Store(StoreError::NotFound(_)) | ApiError::IdOutOfRange(_) => Vec::new(),
            ApiError::Store(StoreError::Validation(e)) => e
                .errors
                .into_iter()
                .map(|field| {
                    ErrorDetail::new(
                        vec![Loc::Key("body"), Loc::Key(field.field)],
                        field.kind,
                        field.message,
                    )
                })
                .collect(),
            ApiError::InvalidId { kind, message, .. } => vec![ErrorDetail::new(
                vec![Loc::Key("path"), Loc::Key("recipe_id")],
                kind,
                message,
            )],
            ApiError::InvalidBody { kind, message } => {
                vec![ErrorDetail::new(vec![Loc::Key("body")], kind, message)]
            }
            ApiError::InvalidFields(details) => details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(status = status.as_u16(), error = %self, "request failed");

        if status == StatusCode::NOT_FOUND {
            return (status, Json(ErrorBody { detail: "Recipe not found" })).into_response();
        }
        (status, Json(ErrorBody { detail: self.details() })).into_response()
    }
}
