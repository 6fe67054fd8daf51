//! Storage abstraction for users, swipes, and the two ledgers
//!
//! Request handlers only ever see the [`Store`] trait. Two backends
//! implement it with identical observable behavior: an in-process map store
//! and a SQLite store. The backend is chosen at startup and owned by the
//! application state, never held in module globals.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Swipe, User};

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Backend-agnostic persistence operations
///
/// Lookups return `Ok(None)` on a miss; existence policy (conflict vs not
/// found) lives in the handlers. `put` operations are full-record upserts,
/// matching the replace semantics of the update endpoints.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a user by UNI
    async fn get_user(&self, uni: &str) -> StoreResult<Option<User>>;

    /// Insert or fully replace a user record
    async fn put_user(&self, user: &User) -> StoreResult<()>;

    /// Remove a user, reporting whether a record existed
    async fn delete_user(&self, uni: &str) -> StoreResult<bool>;

    /// Fetch a slice of users in storage iteration order
    async fn list_users(&self, offset: u64, limit: u64) -> StoreResult<Vec<User>>;

    /// Fetch a swipe by id
    async fn get_swipe(&self, swipe_id: i64) -> StoreResult<Option<Swipe>>;

    /// Insert or fully replace a swipe record
    async fn put_swipe(&self, swipe: &Swipe) -> StoreResult<()>;

    /// Current swipe-ledger balance for a UNI, `None` if never referenced
    async fn swipe_balance(&self, uni: &str) -> StoreResult<Option<i64>>;

    /// Adjust a UNI's swipe-ledger balance by `delta`, creating the entry
    /// at 0 first if absent. Returns the new balance; balances may go
    /// negative.
    async fn adjust_swipe_balance(&self, uni: &str, delta: i64) -> StoreResult<i64>;

    /// Accumulated points for a UNI, `None` if no entry exists
    async fn points(&self, uni: &str) -> StoreResult<Option<i64>>;

    /// Insert or replace a UNI's points entry
    async fn set_points(&self, uni: &str, points: i64) -> StoreResult<()>;
}
