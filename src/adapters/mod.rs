// Adapters layer: concrete implementations for external systems (http source, storage backends).

pub mod http;
pub mod postgres;
pub mod sqlite;

use crate::domain::model::BookRecord;
use crate::domain::ports::BookStore;
use crate::utils::error::Result;
use crate::utils::validation::{validate_database_url, validate_identifier};

pub use postgres::PostgresBookStore;
pub use sqlite::SqliteBookStore;

/// Storage backend picked from the database URL scheme.
pub enum DatabaseStore {
    Postgres(PostgresBookStore),
    Sqlite(SqliteBookStore),
}

impl DatabaseStore {
    pub async fn connect(database_url: &str, table: &str, max_connections: u32) -> Result<Self> {
        validate_database_url("database_url", database_url)?;
        validate_identifier("table", table)?;

        if database_url.starts_with("sqlite:") {
            tracing::debug!("Opening SQLite store, table '{}'", table);
            let store = SqliteBookStore::connect(database_url, table, max_connections).await?;
            Ok(Self::Sqlite(store))
        } else {
            tracing::debug!("Opening PostgreSQL store, table '{}'", table);
            let store = PostgresBookStore::connect(database_url, table, max_connections).await?;
            Ok(Self::Postgres(store))
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Sqlite(_) => "sqlite",
        }
    }

    pub async fn row_count(&self) -> Result<i64> {
        match self {
            Self::Postgres(store) => store.row_count().await,
            Self::Sqlite(store) => store.row_count().await,
        }
    }
}

impl BookStore for DatabaseStore {
    async fn ensure_table(&self) -> Result<()> {
        match self {
            Self::Postgres(store) => store.ensure_table().await,
            Self::Sqlite(store) => store.ensure_table().await,
        }
    }

    async fn insert_or_ignore(&self, book: &BookRecord) -> Result<bool> {
        match self {
            Self::Postgres(store) => store.insert_or_ignore(book).await,
            Self::Sqlite(store) => store.insert_or_ignore(book).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    #[tokio::test]
    async fn test_connect_dispatches_on_scheme() {
        let store = DatabaseStore::connect("sqlite::memory:", "books", 1).await.unwrap();
        assert_eq!(store.backend(), "sqlite");

        store.ensure_table().await.unwrap();
        let book = BookRecord::new("Sea Travels", "£10.00", "Three").unwrap();
        assert!(store.insert_or_ignore(&book).await.unwrap());
        assert_eq!(store.row_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_connect_rejects_unknown_scheme_and_bad_table() {
        let err = DatabaseStore::connect("mysql://localhost/books", "books", 1)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));

        let err = DatabaseStore::connect("sqlite::memory:", "books;--", 1)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
    }
}
