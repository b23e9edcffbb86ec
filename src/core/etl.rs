use crate::core::retry::{retry_stage, RetryPolicy};
use crate::core::{Pipeline, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    retry: RetryPolicy,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            retry: RetryPolicy::default(),
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn monitor(&self) -> &RunMonitor {
        &self.monitor
    }

    /// One run. Each stage's return value is the next stage's input.
    pub async fn run(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let run_started = Instant::now();
        tracing::info!("Starting ETL run {}", run_id);

        // Extract
        let stage = Instant::now();
        let raw = retry_stage("extract", self.retry, || self.pipeline.extract()).await?;
        tracing::info!("Extracted {} records", raw.len());
        self.monitor.stage_finished("extract", stage, raw.len());
        let extracted = raw.len();

        // Transform
        let stage = Instant::now();
        let books = self.pipeline.transform(raw).await?;
        tracing::info!("Transformed into {} unique records", books.len());
        self.monitor.stage_finished("transform", stage, books.len());

        // Load
        let stage = Instant::now();
        let load = retry_stage("load", self.retry, || self.pipeline.load(&books)).await?;
        tracing::info!(
            "Loaded {} records ({} new, {} already stored)",
            load.attempted,
            load.inserted,
            load.skipped
        );
        self.monitor.stage_finished("load", stage, load.attempted);
        self.monitor.log_final_stats(run_started);

        Ok(RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            extracted,
            unique: books.len(),
            load,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BookRecord, LoadSummary};
    use crate::utils::error::EtlError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedPipeline {
        extracted: Vec<BookRecord>,
        load_failures: AtomicU32,
        load_calls: AtomicU32,
        loaded: Mutex<Vec<BookRecord>>,
    }

    #[async_trait::async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn extract(&self) -> Result<Vec<BookRecord>> {
            Ok(self.extracted.clone())
        }

        async fn transform(&self, records: Vec<BookRecord>) -> Result<Vec<BookRecord>> {
            Ok(crate::core::transform::dedup_by_title(records))
        }

        async fn load(&self, records: &[BookRecord]) -> Result<LoadSummary> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            if records.is_empty() {
                return Err(EtlError::EmptyInput);
            }
            if self.load_failures.load(Ordering::SeqCst) > 0 {
                self.load_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(EtlError::StorageError(sqlx::Error::PoolTimedOut));
            }
            self.loaded.lock().unwrap().extend_from_slice(records);
            Ok(LoadSummary {
                attempted: records.len(),
                inserted: records.len(),
                skipped: 0,
            })
        }
    }

    fn book(title: &str) -> BookRecord {
        BookRecord::new(title, "£1.00", "One").unwrap()
    }

    fn quick_retries() -> RetryPolicy {
        RetryPolicy::new(2, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_run_hands_deduplicated_records_to_load() {
        let pipeline = ScriptedPipeline {
            extracted: vec![book("A"), book("B"), book("A")],
            ..Default::default()
        };
        let engine = EtlEngine::new(pipeline).with_retry_policy(quick_retries());

        let report = engine.run().await.unwrap();

        assert_eq!(report.extracted, 3);
        assert_eq!(report.unique, 2);
        assert_eq!(report.load.inserted, 2);
        assert!(report.finished_at >= report.started_at);
        assert_eq!(*engine.pipeline().loaded.lock().unwrap(), vec![book("A"), book("B")]);
    }

    #[tokio::test]
    async fn test_run_retries_transient_load_failures() {
        let pipeline = ScriptedPipeline {
            extracted: vec![book("A")],
            load_failures: AtomicU32::new(2),
            ..Default::default()
        };
        let engine = EtlEngine::new(pipeline).with_retry_policy(quick_retries());

        let report = engine.run().await.unwrap();

        assert_eq!(report.load.attempted, 1);
        assert_eq!(engine.pipeline().load_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_monitor_times_each_run_from_its_start() {
        let pipeline = ScriptedPipeline {
            extracted: vec![book("A")],
            ..Default::default()
        };
        let engine = EtlEngine::new_with_monitoring(pipeline, true).with_retry_policy(quick_retries());
        tokio::time::sleep(Duration::from_millis(300)).await;

        for _ in 0..2 {
            engine.run().await.unwrap();
            let took = engine.monitor().last_run().unwrap();
            assert!(took < Duration::from_millis(100), "run reported as {:?}", took);
        }
    }

    #[tokio::test]
    async fn test_run_with_nothing_extracted_fails_with_empty_input() {
        let engine =
            EtlEngine::new(ScriptedPipeline::default()).with_retry_policy(quick_retries());

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, EtlError::EmptyInput));
        assert_eq!(engine.pipeline().load_calls.load(Ordering::SeqCst), 1);
    }
}
