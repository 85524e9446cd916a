//! Visual parameters for the breathing animation
//!
//! Scale and opacity are computed from the same elapsed-second counter the
//! session uses, so the picture always matches the logical phase.

use serde::Serialize;

use crate::pattern::{BreathPattern, Phase};

/// Scale at the bottom of an exhale
pub const MIN_SCALE: f64 = 0.6;
/// Scale at the top of an inhale and throughout the hold
pub const MAX_SCALE: f64 = 1.0;

const MIN_OPACITY: f64 = 0.5;
const MAX_OPACITY: f64 = 1.0;

/// One frame of the animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub phase: Phase,
    /// Fraction of the current phase already elapsed, in [0, 1)
    pub progress: f64,
    pub scale: f64,
    pub opacity: f64,
    /// Whole seconds before the next phase begins
    pub seconds_left: u64,
}

/// Frame for a given elapsed second
pub fn frame(pattern: &BreathPattern, elapsed: u64) -> Frame {
    let phase = Phase::at(pattern, elapsed);
    let into = pattern.position(elapsed) - pattern.phase_start(phase);
    let duration = pattern.duration(phase) as u64;
    let progress = into as f64 / duration as f64;

    let span = MAX_SCALE - MIN_SCALE;
    let scale = match phase {
        Phase::Inhale => MIN_SCALE + span * progress,
        Phase::Hold => MAX_SCALE,
        Phase::Exhale => MAX_SCALE - span * progress,
    };

    let level = (scale - MIN_SCALE) / span;
    let opacity = MIN_OPACITY + (MAX_OPACITY - MIN_OPACITY) * level;

    Frame {
        phase,
        progress,
        scale,
        opacity,
        seconds_left: duration - into,
    }
}

impl Frame {
    /// Render the scale as a bar of `width` columns
    pub fn bar(&self, width: usize) -> String {
        let filled = ((width as f64) * self.scale).round() as usize;
        let filled = filled.min(width);
        format!(
            "{}{}",
            "\u{2588}".repeat(filled),
            "\u{2591}".repeat(width - filled)
        )
    }
}
