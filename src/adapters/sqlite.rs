use crate::domain::model::BookRecord;
use crate::domain::ports::BookStore;
use crate::utils::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Books table on SQLite, for local runs and tests.
pub struct SqliteBookStore {
    pool: SqlitePool,
    table: String,
    create_sql: String,
    insert_sql: String,
}

impl SqliteBookStore {
    pub async fn connect(database_url: &str, table: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // every connection to an in-memory database opens a fresh one
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let max_connections = if in_memory { 1 } else { max_connections };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self::from_pool(pool, table))
    }

    /// `table` must already be a validated identifier.
    pub fn from_pool(pool: SqlitePool, table: &str) -> Self {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL UNIQUE,
                price TEXT,
                rating TEXT
            )
            "#
        );
        let insert_sql = format!(
            r#"
            INSERT INTO {table} (title, price, rating)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (title) DO NOTHING
            "#
        );

        Self {
            pool,
            table: table.to_string(),
            create_sql,
            insert_sql,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn row_count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

impl BookStore for SqliteBookStore {
    async fn ensure_table(&self) -> Result<()> {
        sqlx::query(&self.create_sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_or_ignore(&self, book: &BookRecord) -> Result<bool> {
        let result = sqlx::query(&self.insert_sql)
            .bind(&book.title)
            .bind(&book.price)
            .bind(&book.rating)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
