//! Feedback sinks
//!
//! The clock driver reports every tick and every completed cycle to a
//! `Feedback` implementation. The terminal bell stands in for a haptic pulse.

use std::io::Write;

use crate::animation::Frame;
use crate::session::TickReport;

/// Receives tick and cycle events from a running session
pub trait Feedback {
    /// Called after every tick
    fn on_tick(&mut self, _report: &TickReport, _frame: &Frame) {}

    /// Called once per completed cycle, after `on_tick`
    fn on_cycle_complete(&mut self, _cycles: u64) {}
}

/// Rings the terminal bell once per completed cycle
pub struct TerminalBell<W: Write> {
    out: W,
    enabled: bool,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self { out, enabled }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Feedback for TerminalBell<W> {
    fn on_cycle_complete(&mut self, cycles: u64) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            tracing::debug!("bell after cycle {} failed: {}", cycles, e);
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct Recorder {
    pub ticks: Vec<TickReport>,
    pub frames: Vec<Frame>,
    pub cycles: Vec<u64>,
}

impl Feedback for Recorder {
    fn on_tick(&mut self, report: &TickReport, frame: &Frame) {
        self.ticks.push(*report);
        self.frames.push(*frame);
    }

    fn on_cycle_complete(&mut self, cycles: u64) {
        self.cycles.push(cycles);
    }
}

/// Forwards each event to two sinks in order
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: Feedback, B: Feedback> Feedback for Tee<A, B> {
    fn on_tick(&mut self, report: &TickReport, frame: &Frame) {
        self.first.on_tick(report, frame);
        self.second.on_tick(report, frame);
    }

    fn on_cycle_complete(&mut self, cycles: u64) {
        self.first.on_cycle_complete(cycles);
        self.second.on_cycle_complete(cycles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation;
    use crate::pattern::BreathPattern;
    use crate::session::BreathingSession;

    #[test]
    fn test_bell_rings_per_cycle() {
        let mut bell = TerminalBell::new(Vec::new(), true);
        bell.on_cycle_complete(1);
        bell.on_cycle_complete(2);
        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn test_disabled_bell_is_silent() {
        let mut bell = TerminalBell::new(Vec::new(), false);
        bell.on_cycle_complete(1);
        assert!(bell.into_inner().is_empty());
    }

    #[test]
    fn test_bell_ignores_ticks() {
        let pattern = BreathPattern::default();
        let mut session = BreathingSession::new(pattern);
        session.start();
        let report = session.tick();

        let mut bell = TerminalBell::new(Vec::new(), true);
        bell.on_tick(&report, &animation::frame(&pattern, report.elapsed_seconds));
        assert!(bell.into_inner().is_empty());
    }

    #[test]
    fn test_tee_forwards_to_both() {
        let mut tee = Tee {
            first: Recorder::default(),
            second: TerminalBell::new(Vec::new(), true),
        };
        tee.on_cycle_complete(3);
        assert_eq!(tee.first.cycles, vec![3]);
        assert_eq!(tee.second.into_inner(), b"\x07".to_vec());
    }
}
