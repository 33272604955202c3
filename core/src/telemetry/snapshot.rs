//! telemetry/snapshot.rs
//!
//! Immutable view of a session's counters and timings.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::telemetry::counters::SessionCounters;
use crate::telemetry::timers::{TelemetryTimer, StageTimes, Stage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: SessionCounters,
    /// `bytes_compressed / bytes_payload`; 0 when nothing moved.
    pub compression_ratio: f64,
    pub throughput_payload_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &SessionCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_payload > 0 {
            counters.bytes_compressed as f64 / counters.bytes_payload as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_payload as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            compression_ratio,
            throughput_payload_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.iter().map(|(_, d)| *d).sum()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.stage_times.contains(*s))
    }

    /// Stage times are measured inside the session's lifetime, so they can
    /// never exceed the elapsed total.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
            && self.counters.bytes_from_cache <= self.counters.bytes_payload
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
