//! Scoped SQLite sessions.
//!
//! A [`DatabaseSession`] owns one connection and one open transaction. Calling
//! [`DatabaseSession::close`] commits; dropping the session without closing it
//! rolls the transaction back.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::query::Query;
use sqlx::{Sqlite, Transaction};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::query_log::logged;
use crate::user::sqlite_repository::user_from_row;
use crate::user::{User, UserError, UserResult};

/// A positional query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl SqlParam {
    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            SqlParam::Int(value) => query.bind(*value),
            SqlParam::Text(value) => query.bind(value.as_str()),
        }
    }
}

/// Integers in canonical form bind as integers, anything else as text.
///
/// `"007"` and `"+5"` stay text so zero-padded codes keep their digits.
impl FromStr for SqlParam {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(value) if value.to_string() == s => SqlParam::Int(value),
            _ => SqlParam::Text(s.to_string()),
        })
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Int(value) => write!(f, "{}", value),
            SqlParam::Text(value) => write!(f, "'{}'", value),
        }
    }
}

fn bind_all<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| param.bind(query))
}

/// One connection, one transaction
pub struct DatabaseSession {
    path: PathBuf,
    pool: SqlitePool,
    tx: Transaction<'static, Sqlite>,
}

impl DatabaseSession {
    /// Open `path` (creating it if needed) and begin a transaction
    pub async fn open(path: &Path) -> UserResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(UserError::from_sqlx)?;
        let tx = pool.begin().await.map_err(UserError::from_sqlx)?;

        tracing::debug!(path = %path.display(), "Session opened");
        Ok(Self {
            path: path.to_path_buf(),
            pool,
            tx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a query returning `user_id, name, email, age` rows
    pub async fn fetch_users(&mut self, sql: &str, params: &[SqlParam]) -> UserResult<Vec<User>> {
        let rows = logged(sql, bind_all(sql, params).fetch_all(&mut *self.tx))
            .await
            .map_err(UserError::from_sqlx)?;

        rows.iter().map(user_from_row).collect()
    }

    /// Run a statement, returning the number of rows it touched
    pub async fn execute(&mut self, sql: &str, params: &[SqlParam]) -> UserResult<u64> {
        let result = logged(sql, bind_all(sql, params).execute(&mut *self.tx))
            .await
            .map_err(UserError::from_sqlx)?;

        Ok(result.rows_affected())
    }

    /// Commit and release the connection
    pub async fn close(self) -> UserResult<()> {
        let Self { path, pool, tx } = self;
        tx.commit().await.map_err(UserError::from_sqlx)?;
        pool.close().await;

        tracing::debug!(path = %path.display(), "Session committed and closed");
        Ok(())
    }
}

impl fmt::Debug for DatabaseSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSession")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Open `path`, hand the session to `f`, commit if `f` succeeds.
///
/// On error the session is dropped and its transaction rolled back.
pub async fn with_session<T, F>(path: &Path, f: F) -> UserResult<T>
where
    F: for<'s> FnOnce(&'s mut DatabaseSession) -> BoxFuture<'s, UserResult<T>>,
{
    let mut session = DatabaseSession::open(path).await?;
    let value = f(&mut session).await?;
    session.close().await?;
    Ok(value)
}

/// A single query run in its own session
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteQuery {
    pub path: PathBuf,
    pub query: String,
    pub params: Vec<SqlParam>,
}

impl ExecuteQuery {
    pub fn new(path: impl Into<PathBuf>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = SqlParam>) -> Self {
        self.params.extend(params);
        self
    }

    /// Open a session, run the query, close the session
    pub async fn run(&self) -> UserResult<Vec<User>> {
        let mut session = DatabaseSession::open(&self.path).await?;
        let users = session.fetch_users(&self.query, &self.params).await?;
        session.close().await?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_from_strings() {
        assert_eq!("25".parse::<SqlParam>().unwrap(), SqlParam::Int(25));
        assert_eq!("-3".parse::<SqlParam>().unwrap(), SqlParam::Int(-3));
        assert_eq!(
            "alice@example.com".parse::<SqlParam>().unwrap(),
            SqlParam::Text("alice@example.com".to_string())
        );
        assert_eq!(
            "2.5".parse::<SqlParam>().unwrap(),
            SqlParam::Text("2.5".to_string())
        );
        assert_eq!("0".parse::<SqlParam>().unwrap(), SqlParam::Int(0));
    }

    #[test]
    fn padded_numbers_stay_text() {
        assert_eq!(
            "007".parse::<SqlParam>().unwrap(),
            SqlParam::Text("007".to_string())
        );
        assert_eq!(
            "+5".parse::<SqlParam>().unwrap(),
            SqlParam::Text("+5".to_string())
        );
        assert_eq!(
            "-0".parse::<SqlParam>().unwrap(),
            SqlParam::Text("-0".to_string())
        );
    }

    #[test]
    fn params_display_for_logging() {
        assert_eq!(SqlParam::Int(42).to_string(), "42");
        assert_eq!(SqlParam::from("ann").to_string(), "'ann'");
    }

    #[test]
    fn execute_query_builder() {
        let query = ExecuteQuery::new("users.db", "SELECT * FROM user_data WHERE age > ?")
            .param(25i64)
            .param("x");
        assert_eq!(query.params, vec![SqlParam::Int(25), SqlParam::Text("x".into())]);
    }
}
