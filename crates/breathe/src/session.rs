//! Breathing session state machine
//!
//! A session counts elapsed seconds against a fixed inhale/hold/exhale
//! pattern. The phase and the completed-cycle count are always derived
//! from the counter, never advanced separately, so anything rendered from
//! the same counter cannot drift from the logical phase.
//!
//! The session performs no I/O and holds no clock. A driver calls `tick()`
//! once per second while the session is active; callers serialize access.

use serde::{Deserialize, Serialize};

use crate::pattern::{BreathPattern, Phase};

/// Observable state, including the idle state before `start()` and after `stop()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Inhale,
    Hold,
    Exhale,
}

impl From<Phase> for SessionState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Inhale => SessionState::Inhale,
            Phase::Hold => SessionState::Hold,
            Phase::Exhale => SessionState::Exhale,
        }
    }
}

/// What a tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub elapsed_seconds: u64,
    pub phase: Phase,
    pub completed_cycles: u64,
    /// True only on the tick that finished a full cycle
    pub cycle_just_completed: bool,
}

/// The session as it was just before `stop()` reset it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub pattern: BreathPattern,
    pub elapsed_seconds: u64,
    pub completed_cycles: u64,
    /// Whether the session was running when stopped
    pub was_active: bool,
}

/// A single breathing session
#[derive(Debug, Clone)]
pub struct BreathingSession {
    pattern: BreathPattern,
    elapsed_seconds: u64,
    completed_cycles: u64,
    active: bool,
}

impl Default for BreathingSession {
    fn default() -> Self {
        Self::new(BreathPattern::default())
    }
}

impl BreathingSession {
    /// Create an idle session for the given pattern
    pub fn new(pattern: BreathPattern) -> Self {
        Self {
            pattern,
            elapsed_seconds: 0,
            completed_cycles: 0,
            active: false,
        }
    }

    /// Begin the session from the start of an inhale.
    ///
    /// Returns false and changes nothing if the session is already running.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.elapsed_seconds = 0;
        self.completed_cycles = 0;
        true
    }

    /// Deactivate and reset to the start of an inhale, whatever the prior state
    pub fn stop(&mut self) -> SessionSummary {
        let summary = SessionSummary {
            pattern: self.pattern,
            elapsed_seconds: self.elapsed_seconds,
            completed_cycles: self.completed_cycles,
            was_active: self.active,
        };
        self.active = false;
        self.elapsed_seconds = 0;
        self.completed_cycles = 0;
        summary
    }

    /// Advance one second. A no-op while idle.
    pub fn tick(&mut self) -> TickReport {
        if !self.active {
            return self.snapshot();
        }

        self.elapsed_seconds += 1;
        let cycle_just_completed = self.pattern.position(self.elapsed_seconds) == 0;
        if cycle_just_completed {
            self.completed_cycles += 1;
        }

        TickReport {
            cycle_just_completed,
            ..self.snapshot()
        }
    }

    /// Current state without advancing
    pub fn snapshot(&self) -> TickReport {
        TickReport {
            elapsed_seconds: self.elapsed_seconds,
            phase: self.current_phase(),
            completed_cycles: self.completed_cycles,
            cycle_just_completed: false,
        }
    }

    pub fn current_phase(&self) -> Phase {
        Phase::at(&self.pattern, self.elapsed_seconds)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pattern(&self) -> &BreathPattern {
        &self.pattern
    }

    pub fn cycle_length(&self) -> u64 {
        self.pattern.cycle_length()
    }

    pub fn state(&self) -> SessionState {
        if self.active {
            self.current_phase().into()
        } else {
            SessionState::Idle
        }
    }

    /// Seconds already spent in the current phase
    pub fn seconds_into_phase(&self) -> u64 {
        let position = self.pattern.position(self.elapsed_seconds);
        position - self.pattern.phase_start(self.current_phase())
    }

    /// Seconds remaining before the next phase begins
    pub fn seconds_left_in_phase(&self) -> u64 {
        let phase = self.current_phase();
        self.pattern.duration(phase) as u64 - self.seconds_into_phase()
    }
}
