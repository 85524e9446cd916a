//! Clock driver
//!
//! Issues exactly one `tick()` per cadence period while a session runs and
//! hands every result to a `Feedback` sink. The driver owns the only
//! mutable borrow of the session for the whole run.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::animation;
use crate::feedback::Feedback;
use crate::session::{BreathingSession, SessionSummary, TickReport};

/// Why a driven session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The requested number of cycles completed
    CycleTarget,
    /// The requested number of seconds elapsed
    TimeLimit,
    /// The shutdown future resolved first
    Interrupted,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::CycleTarget => "cycle target reached",
            StopReason::TimeLimit => "time limit reached",
            StopReason::Interrupted => "interrupted",
        }
    }
}

/// Result of a driven session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub reason: StopReason,
    pub summary: SessionSummary,
}

/// Drives a session from a steady interval
#[derive(Debug, Clone)]
pub struct Driver {
    cadence: Duration,
    cycle_target: Option<u64>,
    time_limit: Option<u64>,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Driver {
    pub fn new(cadence: Duration) -> Self {
        Self {
            cadence,
            cycle_target: None,
            time_limit: None,
        }
    }

    /// Stop once this many cycles have completed
    pub fn with_cycle_target(mut self, cycles: u64) -> Self {
        self.cycle_target = Some(cycles);
        self
    }

    /// Stop once this many session seconds have elapsed
    pub fn with_time_limit(mut self, seconds: u64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    fn finished(&self, report: &TickReport) -> Option<StopReason> {
        if self.cycle_target.is_some_and(|t| report.completed_cycles >= t) {
            return Some(StopReason::CycleTarget);
        }
        if self.time_limit.is_some_and(|t| report.elapsed_seconds >= t) {
            return Some(StopReason::TimeLimit);
        }
        None
    }

    /// Run the session until a target is reached or `shutdown` resolves.
    ///
    /// Starts the session if it is idle and always leaves it stopped. The
    /// first tick lands one cadence period after the call.
    pub async fn run<F>(
        &self,
        session: &mut BreathingSession,
        feedback: &mut dyn Feedback,
        shutdown: F,
    ) -> Outcome
    where
        F: Future<Output = ()>,
    {
        if session.start() {
            info!(
                "Breathing session started ({}, {}s cycle)",
                session.pattern(),
                session.cycle_length()
            );
        }

        let mut ticker = interval_at(Instant::now() + self.cadence, self.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let reason = match self.finished(&session.snapshot()) {
            Some(reason) => reason,
            None => loop {
                tokio::select! {
                    biased;

                    _ = &mut shutdown => break StopReason::Interrupted,
                    _ = ticker.tick() => {
                        let report = session.tick();
                        let frame = animation::frame(session.pattern(), report.elapsed_seconds);
                        feedback.on_tick(&report, &frame);

                        if report.cycle_just_completed {
                            debug!("Cycle {} complete at {}s", report.completed_cycles, report.elapsed_seconds);
                            feedback.on_cycle_complete(report.completed_cycles);
                        }

                        if let Some(reason) = self.finished(&report) {
                            break reason;
                        }
                    }
                }
            },
        };

        let summary = session.stop();
        info!(
            "Breathing session ended: {} after {}s, {} cycles",
            reason.as_str(),
            summary.elapsed_seconds,
            summary.completed_cycles
        );

        Outcome { reason, summary }
    }
}
