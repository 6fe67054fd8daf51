//! SQLite storage backend
//!
//! Handles pool setup, schema migration, and all table access. The schema
//! lives in `migrations/` and is embedded at compile time; statements run
//! one at a time on startup.

use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::models::{Swipe, User};
use crate::store::{Store, StoreError, StoreResult};

/// SQLite-backed [`Store`] over a connection pool
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `db_path` and run
    /// migrations
    pub async fn new(db_path: &str) -> StoreResult<Self> {
        if let Some(parent) = PathBuf::from(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Database(sqlx::Error::Io(e)))?;
            }
        }

        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to SQLite database at: {}", db_path);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Execute the embedded schema, statement by statement
    async fn run_migrations(&self) -> StoreResult<()> {
        let schema = include_str!("../../migrations/001_create_tables.sql");
        for statement in schema.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_user(&self, uni: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT uni, password_hash, num_of_swipes_given, num_of_swipes_received \
             FROM users WHERE uni = ?",
        )
        .bind(uni)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn put_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (uni, password_hash, num_of_swipes_given, num_of_swipes_received) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(uni) DO UPDATE SET \
                 password_hash = excluded.password_hash, \
                 num_of_swipes_given = excluded.num_of_swipes_given, \
                 num_of_swipes_received = excluded.num_of_swipes_received",
        )
        .bind(&user.uni)
        .bind(&user.password_hash)
        .bind(user.num_of_swipes_given)
        .bind(user.num_of_swipes_received)
        .execute(&self.pool)
        .await?;

        debug!("Stored user: {}", user.uni);
        Ok(())
    }

    async fn delete_user(&self, uni: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE uni = ?")
            .bind(uni)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self, offset: u64, limit: u64) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT uni, password_hash, num_of_swipes_given, num_of_swipes_received \
             FROM users ORDER BY rowid LIMIT ? OFFSET ?",
        )
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_swipe(&self, swipe_id: i64) -> StoreResult<Option<Swipe>> {
        let swipe = sqlx::query_as::<_, Swipe>(
            "SELECT swipe_id, donor_uni, user_uni, exchange_date FROM swipes WHERE swipe_id = ?",
        )
        .bind(swipe_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(swipe)
    }

    async fn put_swipe(&self, swipe: &Swipe) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO swipes (swipe_id, donor_uni, user_uni, exchange_date) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(swipe_id) DO UPDATE SET \
                 donor_uni = excluded.donor_uni, \
                 user_uni = excluded.user_uni, \
                 exchange_date = excluded.exchange_date",
        )
        .bind(swipe.swipe_id)
        .bind(&swipe.donor_uni)
        .bind(&swipe.user_uni)
        .bind(&swipe.exchange_date)
        .execute(&self.pool)
        .await?;

        debug!("Stored swipe: {}", swipe.swipe_id);
        Ok(())
    }

    async fn swipe_balance(&self, uni: &str) -> StoreResult<Option<i64>> {
        let balance =
            sqlx::query_scalar::<_, i64>("SELECT balance FROM swipe_ledger WHERE uni = ?")
                .bind(uni)
                .fetch_optional(&self.pool)
                .await?;

        Ok(balance)
    }

    async fn adjust_swipe_balance(&self, uni: &str, delta: i64) -> StoreResult<i64> {
        let balance = sqlx::query_scalar::<_, i64>(
            "INSERT INTO swipe_ledger (uni, balance) VALUES (?, ?) \
             ON CONFLICT(uni) DO UPDATE SET balance = balance + excluded.balance \
             RETURNING balance",
        )
        .bind(uni)
        .bind(delta)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn points(&self, uni: &str) -> StoreResult<Option<i64>> {
        let points = sqlx::query_scalar::<_, i64>("SELECT points FROM donor_points WHERE uni = ?")
            .bind(uni)
            .fetch_optional(&self.pool)
            .await?;

        Ok(points)
    }

    async fn set_points(&self, uni: &str, points: i64) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO donor_points (uni, points) VALUES (?, ?) \
             ON CONFLICT(uni) DO UPDATE SET points = excluded.points",
        )
        .bind(uni)
        .bind(points)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
