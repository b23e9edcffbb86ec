use crate::domain::model::{BookRecord, LoadSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Relational target for book rows.
pub trait BookStore: Send + Sync {
    /// Creates the table if it does not exist yet.
    fn ensure_table(&self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Inserts one row; a title that is already stored is ignored.
    /// Returns whether a row was written.
    fn insert_or_ignore(
        &self,
        book: &BookRecord,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// CSS selectors describing the catalogue markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    pub book: String,
    pub title_link: String,
    pub price: String,
    pub rating: String,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            book: "article.product_pod".to_string(),
            title_link: "h3 a".to_string(),
            price: "p.price_color".to_string(),
            rating: "p.star-rating".to_string(),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn selectors(&self) -> SelectorSet;
    fn database_url(&self) -> &str;
    fn table_name(&self) -> &str;
    fn max_connections(&self) -> u32;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<BookRecord>>;
    async fn transform(&self, records: Vec<BookRecord>) -> Result<Vec<BookRecord>>;
    async fn load(&self, records: &[BookRecord]) -> Result<LoadSummary>;
}
