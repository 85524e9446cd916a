//! Breathing patterns and phases
//!
//! A pattern is the three phase durations in seconds, written `I-H-E`
//! (inhale, hold, exhale). Presets name the patterns most people use.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Pattern construction and parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("{phase} duration must be at least one second")]
    ZeroDuration { phase: Phase },

    #[error("Expected three durations like 4-7-8, got '{0}'")]
    Malformed(String),

    #[error("Invalid duration: '{0}'")]
    InvalidNumber(String),

    #[error("Unknown preset: '{0}' (try: box, relax, calm, energize)")]
    UnknownPreset(String),
}

/// One segment of the breathing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    /// Phase for a given elapsed second.
    ///
    /// Boundaries are closed below and open above, so a second landing
    /// exactly on a boundary belongs to the next phase.
    pub fn at(pattern: &BreathPattern, elapsed: u64) -> Self {
        let position = pattern.position(elapsed);
        if position < pattern.phase_start(Phase::Hold) {
            Phase::Inhale
        } else if position < pattern.phase_start(Phase::Exhale) {
            Phase::Hold
        } else {
            Phase::Exhale
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
        }
    }

    /// Instruction shown to the person breathing
    pub fn cue(&self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in",
            Phase::Hold => "Hold",
            Phase::Exhale => "Breathe out",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Inhale => "Inhale",
            Phase::Hold => "Hold",
            Phase::Exhale => "Exhale",
        };
        f.pad(name)
    }
}

/// Phase durations in seconds, all positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PatternFields")]
pub struct BreathPattern {
    inhale: u32,
    hold: u32,
    exhale: u32,
}

#[derive(Deserialize)]
struct PatternFields {
    inhale: u32,
    hold: u32,
    exhale: u32,
}

impl TryFrom<PatternFields> for BreathPattern {
    type Error = PatternError;

    fn try_from(fields: PatternFields) -> Result<Self, Self::Error> {
        BreathPattern::new(fields.inhale, fields.hold, fields.exhale)
    }
}

impl Default for BreathPattern {
    fn default() -> Self {
        Preset::Box.pattern()
    }
}

impl BreathPattern {
    pub fn new(inhale: u32, hold: u32, exhale: u32) -> Result<Self, PatternError> {
        for (phase, secs) in [
            (Phase::Inhale, inhale),
            (Phase::Hold, hold),
            (Phase::Exhale, exhale),
        ] {
            if secs == 0 {
                return Err(PatternError::ZeroDuration { phase });
            }
        }
        Ok(Self {
            inhale,
            hold,
            exhale,
        })
    }

    pub fn inhale(&self) -> u32 {
        self.inhale
    }

    pub fn hold(&self) -> u32 {
        self.hold
    }

    pub fn exhale(&self) -> u32 {
        self.exhale
    }

    /// Duration of a single phase in seconds
    pub fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
        }
    }

    /// Seconds in one full inhale-hold-exhale cycle
    pub fn cycle_length(&self) -> u64 {
        self.inhale as u64 + self.hold as u64 + self.exhale as u64
    }

    /// Position of `elapsed` within its cycle
    pub fn position(&self, elapsed: u64) -> u64 {
        elapsed % self.cycle_length()
    }

    /// Second within the cycle at which `phase` begins
    pub fn phase_start(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Inhale => 0,
            Phase::Hold => self.inhale as u64,
            Phase::Exhale => self.inhale as u64 + self.hold as u64,
        }
    }
}

impl fmt::Display for BreathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.inhale, self.hold, self.exhale)
    }
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\s*[-/:\s]\s*").unwrap())
}

impl FromStr for BreathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = separator().split(trimmed).collect();
        if parts.len() != 3 {
            return Err(PatternError::Malformed(trimmed.to_string()));
        }

        let mut secs = [0u32; 3];
        for (slot, part) in secs.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| PatternError::InvalidNumber(part.to_string()))?;
        }

        BreathPattern::new(secs[0], secs[1], secs[2])
    }
}

/// Named breathing patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Box: 4-4-4, even and steady
    Box,
    /// Relax: 4-7-8, long hold and slow release
    Relax,
    /// Calm: 5-2-7, exhale longer than inhale
    Calm,
    /// Energize: 3-1-3, short and brisk
    Energize,
}

impl Preset {
    pub fn all() -> [Preset; 4] {
        [Preset::Box, Preset::Relax, Preset::Calm, Preset::Energize]
    }

    /// The durations this preset stands for
    pub fn pattern(&self) -> BreathPattern {
        let (inhale, hold, exhale) = match self {
            Preset::Box => (4, 4, 4),
            Preset::Relax => (4, 7, 8),
            Preset::Calm => (5, 2, 7),
            Preset::Energize => (3, 1, 3),
        };
        BreathPattern {
            inhale,
            hold,
            exhale,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Box => "box",
            Preset::Relax => "relax",
            Preset::Calm => "calm",
            Preset::Energize => "energize",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "box" => Some(Preset::Box),
            "relax" => Some(Preset::Relax),
            "calm" => Some(Preset::Calm),
            "energize" => Some(Preset::Energize),
            _ => None,
        }
    }

    /// Get a description of this preset
    pub fn description(&self) -> &'static str {
        match self {
            Preset::Box => "Even rhythm for steady focus",
            Preset::Relax => "Long hold and slow exhale, for winding down",
            Preset::Calm => "Extended exhale to settle the nerves",
            Preset::Energize => "Quick cycles to wake up",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Box
    }
}

/// Resolve a pattern from an explicit `I-H-E` string or a preset name.
///
/// An explicit pattern wins over the preset.
pub fn resolve(pattern: Option<&str>, preset: &str) -> Result<BreathPattern, PatternError> {
    match pattern {
        Some(text) => text.parse(),
        None => Preset::from_str(preset)
            .map(|p| p.pattern())
            .ok_or_else(|| PatternError::UnknownPreset(preset.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_box() {
        let pattern = BreathPattern::default();
        assert_eq!(pattern, BreathPattern::new(4, 4, 4).unwrap());
        assert_eq!(pattern.cycle_length(), 12);
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(
            BreathPattern::new(4, 0, 4),
            Err(PatternError::ZeroDuration { phase: Phase::Hold })
        );
        assert_eq!(
            BreathPattern::new(0, 4, 4),
            Err(PatternError::ZeroDuration {
                phase: Phase::Inhale
            })
        );
    }

    #[test]
    fn test_phase_boundaries_asymmetric() {
        let pattern = BreathPattern::new(5, 3, 7).unwrap();
        assert_eq!(pattern.cycle_length(), 15);
        assert_eq!(Phase::at(&pattern, 0), Phase::Inhale);
        assert_eq!(Phase::at(&pattern, 4), Phase::Inhale);
        assert_eq!(Phase::at(&pattern, 5), Phase::Hold);
        assert_eq!(Phase::at(&pattern, 7), Phase::Hold);
        assert_eq!(Phase::at(&pattern, 8), Phase::Exhale);
        assert_eq!(Phase::at(&pattern, 14), Phase::Exhale);
        assert_eq!(Phase::at(&pattern, 15), Phase::Inhale);
    }

    #[test]
    fn test_phase_is_periodic() {
        for pattern in Preset::all().iter().map(|p| p.pattern()) {
            let cycle = pattern.cycle_length();
            for elapsed in 0..(cycle * 3) {
                assert_eq!(
                    Phase::at(&pattern, elapsed),
                    Phase::at(&pattern, elapsed + cycle),
                    "pattern {} at {}",
                    pattern,
                    elapsed
                );
            }
        }
    }

    #[test]
    fn test_parse_separators() {
        let expected = BreathPattern::new(4, 7, 8).unwrap();
        assert_eq!("4-7-8".parse::<BreathPattern>().unwrap(), expected);
        assert_eq!("4/7/8".parse::<BreathPattern>().unwrap(), expected);
        assert_eq!("4 7 8".parse::<BreathPattern>().unwrap(), expected);
        assert_eq!(" 4:7:8 ".parse::<BreathPattern>().unwrap(), expected);
        assert_eq!("4 - 7 - 8".parse::<BreathPattern>().unwrap(), expected);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "4-4".parse::<BreathPattern>(),
            Err(PatternError::Malformed("4-4".to_string()))
        );
        assert_eq!(
            "4-4-4-4".parse::<BreathPattern>(),
            Err(PatternError::Malformed("4-4-4-4".to_string()))
        );
        assert_eq!(
            "a-b-c".parse::<BreathPattern>(),
            Err(PatternError::InvalidNumber("a".to_string()))
        );
        assert_eq!(
            "4-0-4".parse::<BreathPattern>(),
            Err(PatternError::ZeroDuration { phase: Phase::Hold })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Preset::Relax.pattern().to_string(), "4-7-8");
        assert_eq!(Phase::Exhale.to_string(), "Exhale");
    }

    #[test]
    fn test_preset_roundtrip() {
        for preset in Preset::all() {
            assert_eq!(Preset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(Preset::from_str("RELAX"), Some(Preset::Relax));
        assert_eq!(Preset::from_str("nope"), None);
    }

    #[test]
    fn test_serde_validates() {
        let pattern: BreathPattern =
            serde_json::from_str(r#"{"inhale":5,"hold":3,"exhale":7}"#).unwrap();
        assert_eq!(pattern.to_string(), "5-3-7");

        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, r#"{"inhale":5,"hold":3,"exhale":7}"#);

        let bad = serde_json::from_str::<BreathPattern>(r#"{"inhale":5,"hold":0,"exhale":7}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(None, "calm").unwrap(), Preset::Calm.pattern());
        assert_eq!(
            resolve(Some("6-2-6"), "calm").unwrap(),
            BreathPattern::new(6, 2, 6).unwrap()
        );
        assert_eq!(
            resolve(None, "sleepy"),
            Err(PatternError::UnknownPreset("sleepy".to_string()))
        );
    }

    #[test]
    fn test_phase_start() {
        let pattern = BreathPattern::new(5, 3, 7).unwrap();
        assert_eq!(pattern.phase_start(Phase::Inhale), 0);
        assert_eq!(pattern.phase_start(Phase::Hold), 5);
        assert_eq!(pattern.phase_start(Phase::Exhale), 8);
    }
}
