use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{MySql, QueryBuilder, Row};

use super::{
    INSERT_CHUNK_SIZE, User, UserError, UserId, UserRepository, UserResult, age_from_column,
    bind_value,
};
use crate::query_log::{log_query, logged};
use crate::store::Backend;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS user_data (
        user_id CHAR(36) NOT NULL,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        age DECIMAL(5,0) NOT NULL,
        PRIMARY KEY (user_id),
        INDEX idx_user_id (user_id)
    ) ENGINE=InnoDB
"#;

const SELECT_USERS: &str = "SELECT user_id, name, email, CAST(age AS SIGNED) AS age FROM user_data ORDER BY user_id";

const SELECT_USER: &str = "SELECT user_id, name, email, CAST(age AS SIGNED) AS age FROM user_data WHERE user_id = ?";

const SELECT_OLDER_THAN: &str =
    "SELECT user_id, name, email, CAST(age AS SIGNED) AS age FROM user_data WHERE age > ? ORDER BY user_id";

const SELECT_PAGE: &str =
    "SELECT user_id, name, email, CAST(age AS SIGNED) AS age FROM user_data ORDER BY user_id LIMIT ? OFFSET ?";

const SELECT_AGES: &str = "SELECT CAST(age AS SIGNED) AS age FROM user_data";

const COUNT_USERS: &str = "SELECT COUNT(*) FROM user_data";

const INSERT_USER: &str = "INSERT INTO user_data (user_id, name, email, age) VALUES (?, ?, ?, ?)";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySqlUserRepository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Decode a `user_id, name, email, age` row
fn user_from_row(row: &MySqlRow) -> UserResult<User> {
    let user_id: String = row.try_get("user_id").map_err(UserError::from_sqlx)?;
    let age: i64 = row.try_get("age").map_err(UserError::from_sqlx)?;

    Ok(User {
        user_id: UserId::from_string(user_id),
        name: row.try_get("name").map_err(UserError::from_sqlx)?,
        email: row.try_get("email").map_err(UserError::from_sqlx)?,
        age: age_from_column(age)?,
    })
}

fn users_from_rows(rows: Vec<MySqlRow>) -> UserResult<Vec<User>> {
    rows.iter().map(user_from_row).collect()
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    fn backend(&self) -> Backend {
        Backend::Mysql
    }

    async fn create_schema(&self) -> UserResult<()> {
        logged(CREATE_TABLE, sqlx::query(CREATE_TABLE).execute(&self.pool))
            .await
            .map_err(UserError::from_sqlx)?;

        tracing::info!("Table user_data created successfully");
        Ok(())
    }

    async fn insert_many(&self, users: &[User]) -> UserResult<u64> {
        if users.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(UserError::from_sqlx)?;

        // Duplicates count as affected rows under FOUND_ROWS; diff the table size.
        let before = logged(
            COUNT_USERS,
            sqlx::query_scalar::<_, i64>(COUNT_USERS).fetch_one(&mut *tx),
        )
        .await
        .map_err(UserError::from_sqlx)?;

        for chunk in users.chunks(INSERT_CHUNK_SIZE) {
            let mut builder = QueryBuilder::<MySql>::new(
                "INSERT INTO user_data (user_id, name, email, age) ",
            );
            builder.push_values(chunk, |mut row, user| {
                row.push_bind(user.user_id.as_str())
                    .push_bind(user.name.as_str())
                    .push_bind(user.email.as_str())
                    .push_bind(i64::from(user.age));
            });
            builder.push(" ON DUPLICATE KEY UPDATE user_id = user_id");

            let sql = builder.sql().to_string();
            logged(&sql, builder.build().execute(&mut *tx))
                .await
                .map_err(UserError::from_sqlx)?;
        }

        let after = logged(
            COUNT_USERS,
            sqlx::query_scalar::<_, i64>(COUNT_USERS).fetch_one(&mut *tx),
        )
        .await
        .map_err(UserError::from_sqlx)?;
        let inserted = (after - before).max(0) as u64;

        tx.commit().await.map_err(UserError::from_sqlx)?;

        tracing::debug!(
            rows = users.len(),
            inserted,
            "Bulk insert into user_data finished (mysql)"
        );
        Ok(inserted)
    }

    async fn create(&self, user: User) -> UserResult<User> {
        logged(
            INSERT_USER,
            sqlx::query(INSERT_USER)
                .bind(user.user_id.as_str())
                .bind(user.name.as_str())
                .bind(user.email.as_str())
                .bind(i64::from(user.age))
                .execute(&self.pool),
        )
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserError::AlreadyExists(user.user_id.to_string())
            }
            other => UserError::from_sqlx(other),
        })?;

        Ok(user)
    }

    async fn get(&self, id: &UserId) -> UserResult<User> {
        let row = logged(
            SELECT_USER,
            sqlx::query(SELECT_USER)
                .bind(id.as_str())
                .fetch_optional(&self.pool),
        )
        .await
        .map_err(UserError::from_sqlx)?
        .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        user_from_row(&row)
    }

    async fn count(&self) -> UserResult<u64> {
        let total = logged(
            COUNT_USERS,
            sqlx::query_scalar::<_, i64>(COUNT_USERS).fetch_one(&self.pool),
        )
        .await
        .map_err(UserError::from_sqlx)?;

        Ok(total.max(0) as u64)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let rows = logged(SELECT_USERS, sqlx::query(SELECT_USERS).fetch_all(&self.pool))
            .await
            .map_err(UserError::from_sqlx)?;

        users_from_rows(rows)
    }

    async fn list_older_than(&self, age: u32) -> UserResult<Vec<User>> {
        let rows = logged(
            SELECT_OLDER_THAN,
            sqlx::query(SELECT_OLDER_THAN)
                .bind(i64::from(age))
                .fetch_all(&self.pool),
        )
        .await
        .map_err(UserError::from_sqlx)?;

        users_from_rows(rows)
    }

    async fn fetch_page(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let rows = logged(
            SELECT_PAGE,
            sqlx::query(SELECT_PAGE)
                .bind(bind_value(limit))
                .bind(bind_value(offset))
                .fetch_all(&self.pool),
        )
        .await
        .map_err(UserError::from_sqlx)?;

        users_from_rows(rows)
    }

    fn stream_all(&self) -> BoxStream<'_, UserResult<User>> {
        log_query(SELECT_USERS);
        sqlx::query(SELECT_USERS)
            .fetch(&self.pool)
            .map(|row| {
                row.map_err(UserError::from_sqlx)
                    .and_then(|row| user_from_row(&row))
            })
            .boxed()
    }

    fn stream_ages(&self) -> BoxStream<'_, UserResult<u32>> {
        log_query(SELECT_AGES);
        sqlx::query_scalar::<_, i64>(SELECT_AGES)
            .fetch(&self.pool)
            .map(|age| age.map_err(UserError::from_sqlx).and_then(age_from_column))
            .boxed()
    }
}
