//! breathe - Guided breathing sessions
//!
//! "Slow down, one cycle at a time."
//!
//! The core is a small state machine that counts seconds against an
//! inhale/hold/exhale pattern:
//! - Patterns and presets (box 4-4-4, relax 4-7-8, calm 5-2-7, energize 3-1-3)
//! - The session: start, tick, stop, with the phase derived from the counter
//! - Animation frames computed from the same counter
//! - Feedback sinks for ticks and completed cycles
//! - A tokio clock driver that ticks once per second
//!
//! Commands:
//! - start [PATTERN]: Run a guided session (default: box breathing)
//! - presets: List the named patterns
//! - timeline [PATTERN]: Print the phase for every second of a session
//! - config: Show or initialize the configuration

pub mod animation;
pub mod clock;
pub mod feedback;
pub mod pattern;
pub mod session;

pub use clock::{Driver, Outcome, StopReason};
pub use feedback::{Feedback, Recorder, TerminalBell};
pub use pattern::{BreathPattern, PatternError, Phase, Preset};
pub use session::{BreathingSession, SessionState, SessionSummary, TickReport};
