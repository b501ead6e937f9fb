//! Sampler loop
//!
//! Each cycle collects one record and emits it. A failure whose kind the
//! [`RecoveryPolicy`] tolerates is written to the log as an annotated line
//! and the loop carries on; anything else ends the run. Either way the loop
//! then sleeps for the interval.

use crate::collector::CycleCollector;
use crate::error::{ErrorKind, ProbeError, RecoveryPolicy};
use crate::output::CsvEmitter;
use crate::probe::{HttpFetcher, Pinger};
use crate::util::time;
use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the last cycle left the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Cycle collected and emitted a record
    Sampling,
    /// Cycle failed and the failure was logged
    ErrorLogged,
}

/// Result of a single cycle that did not end the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Recorded,
    Recovered(ErrorKind),
}

impl CycleOutcome {
    pub fn state(&self) -> SamplerState {
        match self {
            CycleOutcome::Recorded => SamplerState::Sampling,
            CycleOutcome::Recovered(_) => SamplerState::ErrorLogged,
        }
    }
}

/// Counters over a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub recorded: u64,
    pub recovered: u64,
}

/// Drives the collect, emit, sleep cycle
pub struct Sampler<F, P, W: Write, C: Write> {
    collector: CycleCollector<F, P>,
    emitter: CsvEmitter<W, C>,
    policy: RecoveryPolicy,
    interval: Duration,
    max_cycles: Option<u64>,
}

impl<F, P, W, C> Sampler<F, P, W, C>
where
    F: HttpFetcher,
    P: Pinger,
    W: Write,
    C: Write,
{
    pub fn new(
        collector: CycleCollector<F, P>,
        emitter: CsvEmitter<W, C>,
        policy: RecoveryPolicy,
        interval: Duration,
    ) -> Self {
        Self {
            collector,
            emitter,
            policy,
            interval,
            max_cycles: None,
        }
    }

    /// Stop after `max` cycles instead of running forever
    pub fn with_max_cycles(mut self, max: Option<u64>) -> Self {
        self.max_cycles = max;
        self
    }

    pub fn emitter(&self) -> &CsvEmitter<W, C> {
        &self.emitter
    }

    /// Run one cycle
    ///
    /// Returns `Err` only for failures outside the recovery policy, or when
    /// the log itself cannot be written.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, ProbeError> {
        match self.collector.collect() {
            Ok(record) => {
                self.emitter.emit_record(&record)?;
                debug!(ping_ms = record.ping_ms, status = record.page.status, "sample recorded");
                Ok(CycleOutcome::Recorded)
            }
            Err(err) if self.policy.is_recoverable(&err) => {
                let kind = err.kind();
                self.emitter.emit_error(&time::now(), &err)?;
                warn!(%kind, error = %err, "cycle failed, continuing");
                Ok(CycleOutcome::Recovered(kind))
            }
            Err(err) => Err(err),
        }
    }

    /// Loop until a fatal error, or until `max_cycles` cycles have run
    pub fn run(&mut self) -> Result<RunSummary, ProbeError> {
        let mut summary = RunSummary::default();

        loop {
            match self.run_cycle()? {
                CycleOutcome::Recorded => summary.recorded += 1,
                CycleOutcome::Recovered(_) => summary.recovered += 1,
            }
            summary.cycles += 1;

            if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                info!(
                    cycles = summary.cycles,
                    recorded = summary.recorded,
                    recovered = summary.recovered,
                    "cycle limit reached"
                );
                return Ok(summary);
            }

            thread::sleep(self.interval);
        }
    }
}
