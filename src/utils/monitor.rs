use std::sync::Mutex;
use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Process memory sampled with sysinfo.
#[cfg(feature = "cli")]
struct MemoryProbe {
    system: Mutex<System>,
    pid: Pid,
    peak_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl MemoryProbe {
    fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();
        Some(Self {
            system: Mutex::new(system),
            pid,
            peak_mb: Mutex::new(0),
        })
    }

    /// Returns (current, peak) resident memory in MB.
    fn sample(&self) -> Option<(u64, u64)> {
        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        let current = system.process(self.pid)?.memory() / 1024 / 1024;

        let mut peak = self.peak_mb.lock().ok()?;
        *peak = (*peak).max(current);
        Some((current, *peak))
    }
}

/// Stage timings for one engine, optionally with memory figures.
pub struct RunMonitor {
    enabled: bool,
    last_run: Mutex<Option<Duration>>,
    #[cfg(feature = "cli")]
    probe: Option<MemoryProbe>,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_run: Mutex::new(None),
            #[cfg(feature = "cli")]
            probe: if enabled { MemoryProbe::new() } else { None },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Duration of the most recent run passed to `log_final_stats`.
    pub fn last_run(&self) -> Option<Duration> {
        self.last_run.lock().ok().and_then(|last| *last)
    }

    pub fn stage_finished(&self, stage: &str, stage_started: Instant, records: usize) {
        let took = stage_started.elapsed();
        tracing::debug!(stage, records, took_ms = took.as_millis() as u64, "stage finished");

        if !self.enabled {
            return;
        }

        #[cfg(feature = "cli")]
        {
            if let Some((current, peak)) = self.probe.as_ref().and_then(MemoryProbe::sample) {
                tracing::info!(
                    "📊 {} - {} records in {:?}, memory {}MB (peak {}MB)",
                    stage,
                    records,
                    took,
                    current,
                    peak
                );
                return;
            }
        }

        tracing::info!("📊 {} - {} records in {:?}", stage, records, took);
    }

    /// `run_started` is taken at the top of each run; one monitor serves every
    /// scheduled run of an engine.
    pub fn log_final_stats(&self, run_started: Instant) -> Duration {
        let took = run_started.elapsed();
        if let Ok(mut last) = self.last_run.lock() {
            *last = Some(took);
        }

        if self.enabled {
            tracing::info!("📊 Run finished in {:?}", took);
        }
        took
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
