//! REST API handlers.
//!
//! Each handler makes a single `RecipeStore` call and returns the JSON result
//! or an [`ApiError`].

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use cookbook_store::*;

use crate::ApiState;
use crate::body::{CREATE_FIELDS, UPDATE_FIELDS, decode};
use crate::error::{ApiResult, parse_recipe_id};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

// ── Health ─────────────────────────────────────────────────────

/// GET /
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { message: "Healthy" })
}

// ── Recipes ────────────────────────────────────────────────────

/// GET /recipes
pub async fn list_recipes(State(state): State<ApiState>) -> Json<Vec<Recipe>> {
    let recipes = state.store.list();
    debug!(count = recipes.len(), "listing recipes");
    Json(recipes)
}

/// POST /recipes
pub async fn create_recipe(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Recipe>> {
    let Json(body) = body?;
    let payload: RecipeCreate = decode(body, CREATE_FIELDS)?;
    let recipe = state.store.create(payload)?;
    info!(id = recipe.id, "created recipe via api");
    Ok(Json(recipe))
}

/// GET /recipes/{id}
pub async fn get_recipe(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Recipe>> {
    let id = parse_recipe_id(&raw_id)?;
    debug!(id, "fetching recipe");
    Ok(Json(state.store.get(id)?))
}

/// PUT /recipes/{id}
pub async fn update_recipe(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Recipe>> {
    let id = parse_recipe_id(&raw_id)?;
    let Json(body) = body?;
    let patch: RecipeUpdate = decode(body, UPDATE_FIELDS)?;
    let recipe = state.store.update(id, patch)?;
    info!(id, "updated recipe via api");
    Ok(Json(recipe))
}

/// DELETE /recipes/{id}
pub async fn delete_recipe(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let id = parse_recipe_id(&raw_id)?;
    let deleted = state.store.delete(id)?;
    info!(id, "deleted recipe via api");
    Ok(Json(deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;

    fn test_state() -> ApiState {
        ApiState {
            store: RecipeStore::new(),
        }
    }

    fn path(id: &str) -> Path<String> {
        Path(id.to_string())
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let Json(body) = health_check().await;
        assert_eq!(body.message, "Healthy");
    }

    #[tokio::test]
    async fn list_recipes_empty() {
        let Json(recipes) = list_recipes(State(test_state())).await;
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn create_and_get_recipe() {
        let state = test_state();

        let resp = create_recipe(
            State(state.clone()),
            Ok(Json(json!({"title": "Pancakes", "color": "#ff0000"}))),
        )
        .await;
        let Json(created) = resp.unwrap();
        assert_eq!(created.id, 1);

        let Json(fetched) = get_recipe(State(state), path("1")).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_invalid_color_is_unprocessable() {
        let state = test_state();
        let resp = create_recipe(
            State(state.clone()),
            Ok(Json(json!({"title": "Soup", "color": "blue"}))),
        )
        .await;

        assert_eq!(resp.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.store.is_empty());
    }

    #[tokio::test]
    async fn get_nonexistent_recipe() {
        let resp = get_recipe(State(test_state()), path("5")).await;
        assert_eq!(resp.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_with_bad_id_is_unprocessable() {
        for raw in ["0", "-1", "abc"] {
            let resp = get_recipe(State(test_state()), path(raw)).await;
            assert_eq!(
                resp.into_response().status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "id {raw}"
            );
        }
    }

    #[tokio::test]
    async fn update_recipe_partial() {
        let state = test_state();
        state
            .store
            .create(RecipeCreate {
                description: "Sweet".to_string(),
                ..RecipeCreate::new("Pancakes")
            })
            .unwrap();

        let patch = json!({"title": "Pancakes v2"});
        let Json(updated) = update_recipe(State(state), path("1"), Ok(Json(patch)))
            .await
            .unwrap();

        assert_eq!(updated.title, "Pancakes v2");
        assert_eq!(updated.description, "Sweet");
    }

    #[tokio::test]
    async fn update_nonexistent_recipe() {
        let resp = update_recipe(
            State(test_state()),
            path("3"),
            Ok(Json(json!({}))),
        )
        .await;
        assert_eq!(resp.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_bad_payload_to_missing_id_is_unprocessable() {
        let resp = update_recipe(
            State(test_state()),
            path("9"),
            Ok(Json(json!({"title": ""}))),
        )
        .await;
        assert_eq!(resp.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn create_wrong_shape_is_unprocessable() {
        let state = test_state();
        let resp = create_recipe(
            State(state.clone()),
            Ok(Json(json!({"title": "Tea", "ingredients": "water"}))),
        )
        .await;
        assert!(matches!(resp, Err(crate::ApiError::InvalidFields(_))));
        assert!(state.store.is_empty());
    }

    #[tokio::test]
    async fn delete_recipe_exists() {
        let state = test_state();
        state.store.create(RecipeCreate::new("Tea")).unwrap();

        let Json(deleted) = delete_recipe(State(state.clone()), path("1")).await.unwrap();
        assert_eq!(deleted, Deleted::new(1));
        assert!(state.store.is_empty());
    }

    #[tokio::test]
    async fn delete_nonexistent_recipe() {
        let resp = delete_recipe(State(test_state()), path("1")).await;
        assert_eq!(resp.into_response().status(), StatusCode::NOT_FOUND);
    }
}
