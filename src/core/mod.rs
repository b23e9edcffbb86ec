pub mod etl;
pub mod parser;
pub mod pipeline;
pub mod retry;
pub mod scheduler;
pub mod transform;

pub use crate::domain::model::{BookRecord, LoadSummary, RunReport, NO_RATING};
pub use crate::domain::ports::{BookStore, ConfigProvider, Pipeline, SelectorSet};
pub use crate::utils::error::Result;
