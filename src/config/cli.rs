use crate::config::{
    validate_provider, validate_schedule, DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_SOURCE_URL, DEFAULT_TABLE, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT,
};
use crate::core::scheduler::SchedulePolicy;
use crate::core::{ConfigProvider, SelectorSet};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "books-etl")]
#[command(about = "Scrape a book catalogue page and store new titles in a database")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL, hide_env_values = true)]
    pub database_url: String,

    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value_t = 2, help = "Extra attempts per failed stage")]
    pub retries: u32,

    #[arg(long, default_value_t = 60)]
    pub retry_delay_seconds: u64,

    #[arg(long, default_value_t = 86_400, help = "Seconds between scheduled runs")]
    pub interval_seconds: u64,

    #[arg(long, default_value = "etl")]
    pub owner: String,

    #[arg(long, help = "Hold the first scheduled run until this RFC 3339 time")]
    pub start_at: Option<DateTime<Utc>>,

    #[arg(long, help = "Keep running on the schedule instead of running once")]
    pub schedule: bool,

    #[arg(long, help = "Log stage timings and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn schedule_policy(&self) -> SchedulePolicy {
        SchedulePolicy {
            owner: self.owner.clone(),
            retries: self.retries,
            retry_delay: Duration::from_secs(self.retry_delay_seconds),
            interval: Duration::from_secs(self.interval_seconds),
            start_at: self.start_at,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn source_url(&self) -> &str {
        &self.source_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn selectors(&self) -> SelectorSet {
        SelectorSet::default()
    }

    fn database_url(&self) -> &str {
        &self.database_url
    }

    fn table_name(&self) -> &str {
        &self.table
    }

    fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        validate_schedule(&self.schedule_policy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["books-etl", "--database-url", "sqlite::memory:"]);

        assert_eq!(config.source_url(), DEFAULT_SOURCE_URL);
        assert_eq!(config.table_name(), "books");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.schedule);

        let policy = config.schedule_policy();
        assert_eq!(policy, SchedulePolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::parse_from([
            "books-etl",
            "--source-url",
            "http://localhost:8080/index.html",
            "--database-url",
            "sqlite://books.db",
            "--table",
            "travel_books",
            "--retries",
            "0",
            "--interval-seconds",
            "3600",
            "--start-at",
            "2025-01-12T00:00:00Z",
            "--schedule",
        ]);

        assert_eq!(config.source_url(), "http://localhost:8080/index.html");
        assert_eq!(config.table_name(), "travel_books");
        assert!(config.schedule);

        let policy = config.schedule_policy();
        assert_eq!(policy.retries, 0);
        assert_eq!(policy.interval, Duration::from_secs(3600));
        assert_eq!(
            policy.start_at.unwrap().to_rfc3339(),
            "2025-01-12T00:00:00+00:00"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = CliConfig::parse_from([
            "books-etl",
            "--database-url",
            "sqlite::memory:",
            "--table",
            "books; DROP TABLE books",
        ]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from([
            "books-etl",
            "--database-url",
            "sqlite::memory:",
            "--interval-seconds",
            "0",
        ]);
        assert!(config.validate().is_err());
    }
}
