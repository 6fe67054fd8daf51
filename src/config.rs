//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Async-update behavior
    pub updates: UpdateConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Which storage backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local maps, nothing survives a restart
    Memory,
    /// SQLite database file
    Sqlite,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Selected backend
    pub backend: StorageBackend,
    /// SQLite database path (ignored by the memory backend)
    pub db_path: String,
}

/// Async-update configuration
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Artificial latency applied before each async counter update, in
    /// milliseconds
    pub async_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8002),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            storage: StorageConfig {
                backend: match env::var("STORAGE_BACKEND").as_deref() {
                    Ok("memory") => StorageBackend::Memory,
                    _ => StorageBackend::Sqlite,
                },
                db_path: env::var("DATABASE_PATH")
                    .unwrap_or_else(|_| "data/care2share.db".to_string()),
            },
            updates: UpdateConfig {
                async_delay_ms: env::var("ASYNC_UPDATE_DELAY_MS")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(1000),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl UpdateConfig {
    /// The artificial latency as a [`Duration`]
    pub fn async_delay(&self) -> Duration {
        Duration::from_millis(self.async_delay_ms)
    }
}
