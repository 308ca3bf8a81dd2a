use crate::features::bmx::parser::parse;
use crate::features::bmx::transform::build_metric;
use crate::shared::traits::{MetricSink, StatusSource, Validatable};
use log::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Nothing was fetched or nothing parsed; no metrics were produced.
    Idle,
    Reported,
}

/// What the scheduler should do after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleControl {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub state: CycleState,
    /// Metrics accepted by the sink.
    pub reported: usize,
    /// Stats whose value could not be converted.
    pub skipped: usize,
    /// Metrics the sink refused.
    pub failed: usize,
    pub control: CycleControl,
}

impl CycleOutcome {
    pub fn should_stop(&self) -> bool {
        self.control == CycleControl::Stop
    }
}

/// One fetch, parse, classify, transform and report pass.
pub struct PollCycle<S, K> {
    source: S,
    sink: K,
    single_run: bool,
}

impl<S: StatusSource, K: MetricSink> PollCycle<S, K> {
    pub fn new(source: S, sink: K, single_run: bool) -> Self {
        Self {
            source,
            sink,
            single_run,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn run_cycle(&self) -> CycleOutcome {
        let control = if self.single_run {
            CycleControl::Stop
        } else {
            CycleControl::Continue
        };
        let mut outcome = CycleOutcome {
            state: CycleState::Idle,
            reported: 0,
            skipped: 0,
            failed: 0,
            control,
        };

        let lines = self.source.fetch_lines();
        if lines.is_empty() {
            debug!("No status data from {}", self.source.describe());
            return outcome;
        }

        let stats = parse(&lines);
        if stats.is_empty() {
            debug!("No stats found in {} status lines", lines.len());
            return outcome;
        }

        outcome.state = CycleState::Reported;
        for (key, value) in &stats {
            let metric = match build_metric(key, value) {
                Ok(metric) => metric,
                Err(e) => {
                    warn!("Skipping {}: {}", key, e);
                    outcome.skipped += 1;
                    continue;
                }
            };
            if let Err(reason) = metric.validate() {
                warn!("Skipping {}: {}", key, reason);
                outcome.skipped += 1;
                continue;
            }
            match self.sink.report(&metric) {
                Ok(()) => outcome.reported += 1,
                Err(e) => {
                    error!("Failed to report {}: {}", metric.path, e);
                    outcome.failed += 1;
                }
            }
        }

        if let Err(e) = self.sink.flush() {
            error!("Failed to flush metrics: {}", e);
        }

        debug!(
            "Cycle finished: {} reported, {} skipped, {} failed",
            outcome.reported, outcome.skipped, outcome.failed
        );
        outcome
    }
}
