use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::Result;

/// Rating recorded when the rating element carries no label token.
pub const NO_RATING: &str = "No rating";

/// One catalogue listing. `title` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub price: String,
    pub rating: String,
}

impl BookRecord {
    /// Trims every field and rejects the candidate if any of them ends up empty.
    pub fn new(title: &str, price: &str, rating: &str) -> Option<Self> {
        let (title, price, rating) = (title.trim(), price.trim(), rating.trim());
        if title.is_empty() || price.is_empty() || rating.is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            price: price.to_string(),
            rating: rating.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub attempted: usize,
    pub inserted: usize,
    /// Rows ignored because the title was already stored.
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub extracted: usize,
    pub unique: usize,
    pub load: LoadSummary,
}

impl RunReport {
    /// Pretty JSON for `toml-etl --json-report`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
