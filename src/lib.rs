pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{DatabaseStore, PostgresBookStore, SqliteBookStore};
pub use core::{
    etl::EtlEngine,
    pipeline::BooksPipeline,
    retry::RetryPolicy,
    scheduler::{SchedulePolicy, Scheduler},
};
pub use domain::model::{BookRecord, LoadSummary, RunReport};
pub use utils::error::{EtlError, Result};
