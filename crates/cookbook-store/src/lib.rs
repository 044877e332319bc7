//! cookbook-store — in-memory recipe store for Cookbook.
//!
//! Holds recipe records keyed by an auto-incrementing integer id for the
//! lifetime of the process. Nothing is persisted.
//!
//! # Architecture
//!
//! The id->recipe map and the id counter live behind one mutex, so id
//! allocation, updates and deletes are atomic with respect to each other.
//! Every payload is validated in full before the lock is taken for writing.
//!
//! The `RecipeStore` is `Clone` + `Send` + `Sync` (backed by `Arc`) and can be
//! shared across async tasks. Clones share state; separately constructed
//! stores are independent.

pub mod error;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{FieldError, StoreError, StoreResult, ValidationError};
pub use store::RecipeStore;
pub use types::*;
