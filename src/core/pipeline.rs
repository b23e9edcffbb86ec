use crate::adapters::http::{build_client, fetch_page};
use crate::core::parser::CatalogueParser;
use crate::core::transform::dedup_by_title;
use crate::core::{BookRecord, BookStore, ConfigProvider, LoadSummary, Pipeline};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

/// Catalogue page → deduplicated books → books table.
pub struct BooksPipeline<S: BookStore, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    parser: CatalogueParser,
}

impl<S: BookStore, C: ConfigProvider> BooksPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = build_client(config.request_timeout(), config.user_agent())?;
        let parser = CatalogueParser::new(&config.selectors())?;
        Ok(Self {
            storage,
            config,
            client,
            parser,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: BookStore, C: ConfigProvider> Pipeline for BooksPipeline<S, C> {
    /// Never fails: an unreachable source is logged and reported as zero books.
    async fn extract(&self) -> Result<Vec<BookRecord>> {
        let url = self.config.source_url();

        let body = match fetch_page(&self.client, url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("⚠️ Failed to retrieve the catalogue page {}: {}", url, e);
                return Ok(Vec::new());
            }
        };

        let books = self.parser.parse(&body);
        if books.is_empty() {
            tracing::warn!("⚠️ No complete book listings found at {}", url);
        } else {
            tracing::debug!("Parsed {} book listings from {}", books.len(), url);
        }

        Ok(books)
    }

    async fn transform(&self, records: Vec<BookRecord>) -> Result<Vec<BookRecord>> {
        let before = records.len();
        let unique = dedup_by_title(records);

        if unique.len() < before {
            tracing::debug!("Dropped {} duplicate titles", before - unique.len());
        }

        Ok(unique)
    }

    async fn load(&self, records: &[BookRecord]) -> Result<LoadSummary> {
        self.storage.ensure_table().await?;

        if records.is_empty() {
            return Err(EtlError::EmptyInput);
        }

        let mut summary = LoadSummary::default();
        for book in records {
            let inserted = self.storage.insert_or_ignore(book).await?;
            summary.attempted += 1;
            if inserted {
                summary.inserted += 1;
            } else {
                summary.skipped += 1;
                tracing::debug!("Title already stored: {}", book.title);
            }
            tracing::info!("Inserted book: {}", book.title);
        }

        Ok(summary)
    }
}
