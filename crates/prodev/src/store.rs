//! Connection layer: MySQL first, SQLite as the fallback.

use serde::{Deserialize, Serialize};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Connection};
use std::path::Path;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

use crate::config::DatabaseConfig;
use crate::error::{ProdevError, Result};
use crate::query_log::logged;
use crate::user::{
    InMemoryUserRepository, MySqlUserRepository, SqliteUserRepository, UserRepository,
};

/// Backend serving a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Mysql,
    Sqlite,
    Memory,
}

/// Which backend `Store::connect` should use
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// MySQL if reachable, SQLite otherwise
    #[default]
    Auto,
    Mysql,
    Sqlite,
}

fn mysql_server_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
}

/// Create the MySQL database if it does not exist.
///
/// Connects to the server without selecting a database.
pub async fn create_database(config: &DatabaseConfig) -> Result<()> {
    let mut conn = tokio::time::timeout(
        config.connect_timeout(),
        mysql_server_options(config).connect(),
    )
    .await
    .map_err(|_| ProdevError::connection("mysql", "timed out connecting to server"))?
    .map_err(|e| ProdevError::connection("mysql", e))?;

    // Identifiers cannot be bound as parameters.
    let sql = format!(
        "CREATE DATABASE IF NOT EXISTS `{}`",
        config.name.replace('`', "``")
    );
    let result = logged(&sql, sqlx::query(&sql).execute(&mut conn)).await;
    conn.close()
        .await
        .map_err(|e| ProdevError::connection("mysql", e))?;
    result.map_err(|e| ProdevError::connection("mysql", e))?;

    tracing::info!(database = %config.name, "Database created or already exists");
    Ok(())
}

/// Create a MySQL pool bound to the configured database
pub async fn connect_mysql(config: &DatabaseConfig) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout())
        .connect_with(mysql_server_options(config).database(&config.name))
        .await
        .map_err(|e| ProdevError::connection("mysql", e))
}

/// Create a SQLite pool, creating the file if missing
pub async fn connect_sqlite(path: &Path, config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout())
        .connect_with(options)
        .await
        .map_err(|e| ProdevError::connection("sqlite", e))
}

/// A connected repository and the backend behind it
#[derive(Clone)]
pub struct Store {
    backend: Backend,
    repository: Arc<dyn UserRepository>,
}

impl Store {
    /// Wrap an existing repository
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            backend: repository.backend(),
            repository,
        }
    }

    /// In-memory store for tests and dry runs
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUserRepository::new()))
    }

    /// Connect according to `preference`.
    ///
    /// With [`BackendPreference::Auto`], any failure reaching MySQL (server
    /// down, bad credentials, database cannot be created) falls back to the
    /// SQLite file.
    pub async fn connect(config: &DatabaseConfig, preference: BackendPreference) -> Result<Self> {
        match preference {
            BackendPreference::Mysql => Self::connect_mysql(config).await,
            BackendPreference::Sqlite => Self::connect_sqlite(config).await,
            BackendPreference::Auto => match Self::connect_mysql(config).await {
                Ok(store) => Ok(store),
                Err(e) => {
                    tracing::warn!(
                        "MySQL server not available, falling back to SQLite: {}",
                        e
                    );
                    Self::connect_sqlite(config).await
                }
            },
        }
    }

    async fn connect_mysql(config: &DatabaseConfig) -> Result<Self> {
        create_database(config).await?;
        let pool = connect_mysql(config).await?;
        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected to MySQL"
        );
        Ok(Self::new(Arc::new(MySqlUserRepository::new(pool))))
    }

    async fn connect_sqlite(config: &DatabaseConfig) -> Result<Self> {
        let pool = connect_sqlite(&config.sqlite_path, config).await?;
        tracing::info!(path = %config.sqlite_path.display(), "Connected to SQLite");
        Ok(Self::new(Arc::new(SqliteUserRepository::new(pool))))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn repository(&self) -> Arc<dyn UserRepository> {
        Arc::clone(&self.repository)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
