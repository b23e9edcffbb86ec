use crate::domain::model::BookRecord;
use crate::domain::ports::BookStore;
use crate::utils::error::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Books table on PostgreSQL.
pub struct PostgresBookStore {
    pool: PgPool,
    table: String,
    create_sql: String,
    insert_sql: String,
}

impl PostgresBookStore {
    pub async fn connect(database_url: &str, table: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool, table))
    }

    /// `table` must already be a validated identifier.
    pub fn from_pool(pool: PgPool, table: &str) -> Self {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id SERIAL PRIMARY KEY,
                title TEXT NOT NULL UNIQUE,
                price TEXT,
                rating TEXT
            )
            "#
        );
        let insert_sql = format!(
            r#"
            INSERT INTO {table} (title, price, rating)
            VALUES ($1, $2, $3)
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

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn row_count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

impl BookStore for PostgresBookStore {
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
