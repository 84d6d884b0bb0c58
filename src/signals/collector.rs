use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::config::EngineConfig;
use crate::models::{InteractionSample, RawSignals};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Bounded window of raw interaction samples.
///
/// The buffer keeps the last `max_samples` samples or the last
/// `max_sample_age_secs` seconds relative to the newest sample, whichever is
/// smaller. Eviction is FIFO. Insertion keeps the window approximately
/// time-ordered so clock jitter from the caller cannot poison the
/// speed/frequency math downstream.
pub struct SignalCollector {
    samples: VecDeque<InteractionSample>,
    session_started_at: DateTime<Utc>,
    dropped_count: u64,
    max_samples: usize,
    max_age: Duration,
}

impl SignalCollector {
    pub fn new(session_started_at: DateTime<Utc>, config: &EngineConfig) -> Self {
        Self {
            samples: VecDeque::with_capacity(config.max_samples.min(1024)),
            session_started_at,
            dropped_count: 0,
            max_samples: config.max_samples.max(1),
            max_age: Duration::seconds(config.max_sample_age_secs.min(i64::MAX as u64) as i64),
        }
    }

    /// Append a sample. Malformed samples are dropped silently and counted;
    /// there are no error states on this path.
    pub fn record(&mut self, sample: InteractionSample) {
        if !sample.is_well_formed() {
            self.dropped_count += 1;
            log_debug!(
                "dropped malformed sample ({:?}, value {}), {} dropped so far",
                sample.kind,
                sample.value,
                self.dropped_count
            );
            return;
        }

        // Common case: timestamps arrive in order, append at the tail.
        // Jittered samples are walked backwards to their slot.
        match self.samples.back() {
            Some(last) if sample.timestamp < last.timestamp => {
                let mut index = self.samples.len();
                while index > 0 && self.samples[index - 1].timestamp > sample.timestamp {
                    index -= 1;
                }
                self.samples.insert(index, sample);
            }
            _ => self.samples.push_back(sample),
        }

        self.evict();
    }

    /// Non-blocking best-effort snapshot of the window contents.
    pub fn snapshot(&self) -> RawSignals {
        RawSignals {
            samples: self.samples.iter().cloned().collect(),
            session_started_at: self.session_started_at,
            dropped_count: self.dropped_count,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    fn evict(&mut self) {
        while self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }

        if let Some(newest) = self.samples.back().map(|s| s.timestamp) {
            let horizon = newest - self.max_age;
            while self
                .samples
                .front()
                .is_some_and(|s| s.timestamp < horizon)
            {
                self.samples.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SampleKind;
    use chrono::TimeZone;

    fn collector_with(max_samples: usize, max_age_secs: u64) -> SignalCollector {
        let config = EngineConfig {
            max_samples,
            max_sample_age_secs: max_age_secs,
            ..EngineConfig::default()
        };
        SignalCollector::new(start(), &config)
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn sample_at(offset_secs: i64, kind: SampleKind, value: f64) -> InteractionSample {
        InteractionSample::new(start() + Duration::seconds(offset_secs), kind, value)
    }

    #[test]
    fn evicts_fifo_at_capacity() {
        let mut collector = collector_with(3, 3_600);
        for offset in 0..5 {
            collector.record(sample_at(offset, SampleKind::Click, 1.0));
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.samples.len(), 3);
        assert_eq!(
            snapshot.samples[0].timestamp,
            start() + Duration::seconds(2)
        );
    }

    #[test]
    fn evicts_samples_past_the_time_horizon() {
        let mut collector = collector_with(100, 60);
        collector.record(sample_at(0, SampleKind::Click, 1.0));
        collector.record(sample_at(10, SampleKind::Click, 1.0));
        collector.record(sample_at(120, SampleKind::Click, 1.0));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.samples.len(), 2);
        assert_eq!(
            snapshot.samples[0].timestamp,
            start() + Duration::seconds(10)
        );
    }

    #[test]
    fn reorders_jittered_timestamps_on_insert() {
        let mut collector = collector_with(100, 3_600);
        collector.record(sample_at(0, SampleKind::Scroll, 100.0));
        collector.record(sample_at(20, SampleKind::Scroll, 100.0));
        collector.record(sample_at(10, SampleKind::Scroll, 100.0));

        let offsets: Vec<i64> = collector
            .snapshot()
            .samples
            .iter()
            .map(|s| (s.timestamp - start()).num_seconds())
            .collect();
        assert_eq!(offsets, vec![0, 10, 20]);
    }

    #[test]
    fn drops_and_counts_malformed_samples() {
        let mut collector = collector_with(100, 3_600);
        collector.record(sample_at(0, SampleKind::Scroll, f64::NAN));
        collector.record(sample_at(1, SampleKind::FocusPause, -5.0));
        collector.record(sample_at(2, SampleKind::Click, 1.0));

        assert_eq!(collector.len(), 1);
        assert_eq!(collector.dropped_count(), 2);
        assert_eq!(collector.snapshot().dropped_count, 2);
    }
}
