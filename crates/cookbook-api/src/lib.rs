//! cookbook-api — REST API for Cookbook.
//!
//! Provides axum route handlers over a [`RecipeStore`]. The store is passed
//! in when the router is built; handlers never reach for global state.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Health check |
//! | GET | `/recipes` | List recipes, ordered by id |
//! | POST | `/recipes` | Create a recipe |
//! | GET | `/recipes/{id}` | Get a recipe |
//! | PUT | `/recipes/{id}` | Partially update a recipe |
//! | DELETE | `/recipes/{id}` | Delete a recipe |
//!
//! Bad path ids and bad bodies answer 422, missing recipes 404.

pub mod body;
pub mod error;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use cookbook_store::RecipeStore;

pub use error::{ApiError, ApiResult};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: RecipeStore,
}

/// Build the complete API router.
pub fn build_router(store: RecipeStore) -> Router {
    let state = ApiState { store };

    Router::new()
        .route("/", get(handlers::health_check))
        .route(
            "/recipes",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route(
            "/recipes/{id}",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .with_state(state)
}
