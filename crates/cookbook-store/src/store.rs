//! RecipeStore — process-lifetime recipe storage.
//!
//! Provides typed CRUD operations over recipes. Records live in a `BTreeMap`
//! keyed by id, so listing is naturally ordered. Ids come from a counter
//! that only moves forward; a deleted id is never handed out again.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::types::*;

/// Thread-safe in-memory recipe store.
#[derive(Clone)]
pub struct RecipeStore {
    inner: Arc<Mutex<Inner>>,
}

/// Map and counter share one lock so id allocation and writes are atomic.
struct Inner {
    recipes: BTreeMap<RecipeId, Recipe>,
    next_id: RecipeId,
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeStore {
    /// Create an empty store. The first recipe gets id 1.
    pub fn new() -> Self {
        debug!("recipe store created");
        Self {
            inner: Arc::new(Mutex::new(Inner {
                recipes: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Writes happen only after validation and cannot panic halfway, so a
        // poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All recipes in ascending id order.
    pub fn list(&self) -> Vec<Recipe> {
        let inner = self.lock();
        inner.recipes.values().cloned().collect()
    }

    /// Number of stored recipes.
    pub fn len(&self) -> usize {
        self.lock().recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate and insert a new recipe, assigning the next id.
    pub fn create(&self, payload: RecipeCreate) -> StoreResult<Recipe> {
        if let Err(e) = payload.validate() {
            debug!(error = %e, "create rejected");
            return Err(e.into());
        }

        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let recipe = payload.into_recipe(id, now());
        inner.recipes.insert(id, recipe.clone());
        info!(id, title = %recipe.title, "recipe created");
        Ok(recipe)
    }

    /// Fetch a recipe by id.
    pub fn get(&self, id: RecipeId) -> StoreResult<Recipe> {
        self.lock()
            .recipes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Merge the supplied fields over an existing recipe.
    ///
    /// The payload is checked before the id is looked up, so a bad payload
    /// fails with `Validation` even for a missing id. Nothing is written
    /// unless every supplied field is valid. `updated_at` is refreshed even
    /// when no field was supplied.
    pub fn update(&self, id: RecipeId, patch: RecipeUpdate) -> StoreResult<Recipe> {
        if let Err(e) = patch.validate() {
            debug!(id, error = %e, "update rejected");
            return Err(e.into());
        }

        let mut inner = self.lock();
        let recipe = inner
            .recipes
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        let fields = patch.provided();
        patch.apply_to(recipe);
        // Never move backwards, even if the wall clock does.
        recipe.updated_at = now().max(recipe.updated_at);

        info!(id, fields, "recipe updated");
        Ok(recipe.clone())
    }

    /// Remove a recipe permanently. Its id is not reused.
    pub fn delete(&self, id: RecipeId) -> StoreResult<Deleted> {
        let mut inner = self.lock();
        if inner.recipes.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        info!(id, remaining = inner.recipes.len(), "recipe deleted");
        Ok(Deleted::new(id))
    }
}

/// Current UTC time at the precision timestamps are serialized with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
