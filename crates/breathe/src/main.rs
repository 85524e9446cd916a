//! breathe - Guided breathing sessions in the terminal
//!
//! "Slow down, one cycle at a time."
//!
//! Usage:
//!   breathe start [PATTERN]       Run a guided session (default: box 4-4-4)
//!   breathe start --preset relax  Run the 4-7-8 preset
//!   breathe start --cycles 5      Stop after five cycles
//!   breathe presets               List the named patterns
//!   breathe timeline [PATTERN]    Print the phase for every second
//!   breathe config [--init]       Show or initialize the configuration

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::Write;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use breathe::animation::{self, Frame};
use breathe::clock::{Driver, Outcome};
use breathe::feedback::{Feedback, TerminalBell, Tee};
use breathe::pattern::{self, BreathPattern, Phase, Preset};
use breathe::session::{BreathingSession, TickReport};
use breathe_core::{format, Config, Paths};

/// Breathe - Guided inhale/hold/exhale sessions
#[derive(Parser)]
#[command(name = "breathe")]
#[command(about = "Guided breathing sessions driven by an inhale/hold/exhale timer")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Between deep work sessions, before a hard conversation, or whenever
    you need a minute to reset.

PRESETS:
    box         4-4-4 (default)
    relax       4-7-8
    calm        5-2-7
    energize    3-1-3

EXAMPLES:
    breathe start                   # Box breathing until Ctrl-C
    breathe start 4-7-8 --cycles 4  # Four cycles of 4-7-8
    breathe start --preset calm -m 5
    breathe timeline 5-3-7          # Dry run, one line per second
    breathe start --json            # One JSON object per tick

ALIASES:
    breathe s    # start
    breathe ls   # presets
    breathe tl   # timeline
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a guided breathing session
    #[command(alias = "s")]
    Start {
        /// Phase durations in seconds, inhale-hold-exhale (e.g. 4-7-8)
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,

        /// Use a named preset instead of an explicit pattern
        #[arg(long, conflicts_with = "pattern")]
        preset: Option<String>,

        /// Stop after this many cycles
        #[arg(short, long)]
        cycles: Option<u64>,

        /// Stop after this many minutes
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(..=MAX_MINUTES))]
        minutes: Option<u64>,

        /// Don't ring the bell after each cycle
        #[arg(long)]
        quiet_bell: bool,

        /// Print one JSON object per tick instead of the breathing bar
        #[arg(long)]
        json: bool,
    },

    /// List the named breathing patterns
    #[command(alias = "ls")]
    Presets,

    /// Print the phase for every second without waiting
    #[command(alias = "tl")]
    Timeline {
        /// Phase durations in seconds, inhale-hold-exhale (e.g. 4-7-8)
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,

        /// Use a named preset instead of an explicit pattern
        #[arg(long, conflicts_with = "pattern")]
        preset: Option<String>,

        /// Number of cycles to print (at most 100)
        #[arg(
            short,
            long,
            default_value = "1",
            value_parser = clap::value_parser!(u64).range(1..=MAX_TIMELINE_CYCLES)
        )]
        cycles: u64,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

/// Longest session `start --minutes` accepts (one week)
const MAX_MINUTES: u64 = 7 * 24 * 60;

/// Most cycles `timeline` prints
const MAX_TIMELINE_CYCLES: u64 = 100;

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const BLUE: &str = "\x1b[0;34m";
const YELLOW: &str = "\x1b[0;33m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

fn phase_color(phase: Phase) -> &'static str {
    match phase {
        Phase::Inhale => CYAN,
        Phase::Hold => YELLOW,
        Phase::Exhale => BLUE,
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the breathing bar
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = Paths::new();
    let config = Config::load(&paths.config_file())?;

    match cli.command {
        Some(Commands::Start {
            pattern,
            preset,
            cycles,
            minutes,
            quiet_bell,
            json,
        }) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cmd_start(
                &config, pattern, preset, cycles, minutes, quiet_bell, json,
            ))
        }
        Some(Commands::Presets) => cmd_presets(&config),
        Some(Commands::Timeline {
            pattern,
            preset,
            cycles,
        }) => cmd_timeline(&config, pattern, preset, cycles),
        Some(Commands::Config { init }) => cmd_config(&paths, &config, init),
        None => cmd_presets(&config),
    }
}

/// Pick the pattern: explicit pattern, then preset flag, then config
fn resolve_pattern(
    config: &Config,
    pattern: Option<String>,
    preset: Option<String>,
) -> Result<BreathPattern> {
    if let Some(text) = pattern {
        return Ok(text.parse::<BreathPattern>()?);
    }
    if let Some(name) = preset {
        return Ok(pattern::resolve(None, &name)?);
    }
    pattern::resolve(config.pattern.as_deref(), &config.default_preset)
        .context("Invalid pattern in config")
}

/// Session seconds for a `--minutes` limit
fn time_limit_seconds(minutes: u64) -> Result<u64> {
    if minutes > MAX_MINUTES {
        bail!("Time limit of {} minutes is too long (max {})", minutes, MAX_MINUTES);
    }
    minutes
        .checked_mul(60)
        .with_context(|| format!("Time limit of {} minutes is too long", minutes))
}

/// Seconds covered by a timeline of `cycles` cycles
fn timeline_seconds(pattern: &BreathPattern, cycles: u64) -> Result<u64> {
    if cycles > MAX_TIMELINE_CYCLES {
        bail!(
            "Timeline of {} cycles is too long (max {})",
            cycles,
            MAX_TIMELINE_CYCLES
        );
    }
    pattern
        .cycle_length()
        .checked_mul(cycles)
        .with_context(|| format!("Timeline of {} cycles is too long", cycles))
}

/// Renders each tick on a single, rewritten terminal line
struct BreathingBar {
    pattern: BreathPattern,
    width: usize,
    json: bool,
}

impl BreathingBar {
    fn line(&self, report: &TickReport, frame: &Frame) -> String {
        let cue = format!("{:<11}", report.phase.cue());
        format!(
            "  {} [{}] {:>2}s   {}  {}",
            color(&format!("{}{}", BOLD, phase_color(report.phase)), &cue),
            frame.bar(self.width),
            frame.seconds_left,
            color(CYAN, "Cycles:"),
            report.completed_cycles
        )
    }
}

impl Feedback for BreathingBar {
    fn on_tick(&mut self, report: &TickReport, frame: &Frame) {
        let mut out = std::io::stdout().lock();
        let written = if self.json {
            let value = serde_json::json!({
                "pattern": self.pattern.to_string(),
                "tick": report,
                "frame": frame,
            });
            writeln!(out, "{}", value)
        } else {
            write!(out, "\r\x1b[2K{}", self.line(report, frame))
        };
        if let Err(e) = written.and_then(|_| out.flush()) {
            warn!("Failed to draw tick: {}", e);
        }
    }
}

/// Run a guided session until the target is reached or Ctrl-C
async fn cmd_start(
    config: &Config,
    pattern: Option<String>,
    preset: Option<String>,
    cycles: Option<u64>,
    minutes: Option<u64>,
    quiet_bell: bool,
    json: bool,
) -> Result<()> {
    let pattern = resolve_pattern(config, pattern, preset)?;

    let mut driver = Driver::new(config.cadence());
    if let Some(n) = cycles {
        driver = driver.with_cycle_target(n);
    }
    if let Some(m) = minutes {
        driver = driver.with_time_limit(time_limit_seconds(m)?);
    }

    let mut session = BreathingSession::new(pattern);
    let started_at = Local::now();

    if !json {
        println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "BREATHE"));
        println!();
        println!("  {}  {}", color(CYAN, "Pattern:"), pattern);
        println!(
            "  {}    {}",
            color(CYAN, "Cycle:"),
            format::duration(pattern.cycle_length())
        );
        if let Some(n) = cycles {
            println!("  {}   {}", color(CYAN, "Target:"), format::count(n, "cycle"));
        }
        if let Some(m) = minutes {
            println!("  {}    {} minutes", color(CYAN, "Limit:"), m);
        }
        println!();
        println!("Press Ctrl-C to stop");
        println!();

        // Show the opening inhale before the first tick lands
        let opening = session.snapshot();
        let bar = BreathingBar {
            pattern,
            width: config.bar_width(),
            json,
        };
        print!("{}", bar.line(&opening, &animation::frame(&pattern, 0)));
        std::io::stdout().flush()?;
    }

    let mut feedback = Tee {
        first: BreathingBar {
            pattern,
            width: config.bar_width(),
            json,
        },
        second: TerminalBell::new(std::io::stdout(), config.bell && !quiet_bell && !json),
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let outcome = driver.run(&mut session, &mut feedback, shutdown).await;

    if json {
        println!(
            "{}",
            serde_json::to_string(&outcome).context("Failed to serialize session outcome")?
        );
    } else {
        print_summary(&outcome, started_at);
    }

    Ok(())
}

fn print_summary(outcome: &Outcome, started_at: chrono::DateTime<Local>) {
    let summary = &outcome.summary;

    println!();
    println!();
    println!(
        "{} Session ended ({})",
        color(GREEN, "[ok]"),
        outcome.reason.as_str()
    );
    println!(
        "  {}  {}",
        color(CYAN, "Started:"),
        started_at.format("%H:%M")
    );
    println!(
        "  {} {}",
        color(CYAN, "Duration:"),
        format::duration(summary.elapsed_seconds)
    );
    println!(
        "  {}   {}",
        color(CYAN, "Cycles:"),
        format::count(summary.completed_cycles, "full cycle")
    );
}

/// List the named presets
fn cmd_presets(config: &Config) -> Result<()> {
    println!("{}Breathing Presets{}", BOLD, NC);
    println!();

    for preset in Preset::all() {
        let pattern = preset.pattern();
        let marker = if preset.as_str() == config.default_preset && config.pattern.is_none() {
            color(GREEN, "*")
        } else {
            " ".to_string()
        };
        println!(
            "{} {:<10} {:<7} {:>4}  {}",
            marker,
            color(CYAN, preset.as_str()),
            pattern.to_string(),
            format::duration(pattern.cycle_length()),
            preset.description()
        );
    }

    if let Some(ref custom) = config.pattern {
        println!();
        println!("  {} {}", color(CYAN, "Configured pattern:"), custom);
    }

    Ok(())
}

/// Dry-run a session, one line per second
fn cmd_timeline(
    config: &Config,
    pattern: Option<String>,
    preset: Option<String>,
    cycles: u64,
) -> Result<()> {
    let pattern = resolve_pattern(config, pattern, preset)?;
    let total = timeline_seconds(&pattern, cycles)?;

    let mut session = BreathingSession::new(pattern);
    session.start();

    println!(
        "{}Timeline for {} ({}){}",
        BOLD,
        pattern,
        format::count(cycles, "cycle"),
        NC
    );
    println!();

    for _ in 0..total {
        let now = session.snapshot();
        let frame = animation::frame(&pattern, now.elapsed_seconds);
        println!(
            "  {}  {}  [{}]",
            format::clock(now.elapsed_seconds),
            color(phase_color(now.phase), &format!("{:<6}", now.phase)),
            frame.bar(config.bar_width().min(20))
        );

        let report = session.tick();
        if report.cycle_just_completed {
            println!(
                "  {}",
                color(GREEN, &format!("-- cycle {} complete --", report.completed_cycles))
            );
        }
    }

    session.stop();
    Ok(())
}

/// Show or initialize the configuration
fn cmd_config(paths: &Paths, config: &Config, init: bool) -> Result<()> {
    let path = paths.config_file();

    if init {
        if path.exists() {
            bail!(
                "Config already exists: {}. Edit it or remove it first.",
                path.display()
            );
        }
        Config::default().save(&path)?;
        println!("{} Wrote {}", color(GREEN, "[ok]"), path.display());
        return Ok(());
    }

    let pattern = resolve_pattern(config, None, None)?;

    println!("  {}     {}", color(CYAN, "File:"), path.display());
    if !path.exists() {
        println!("            (not created, using defaults)");
    }
    println!("  {}  {}", color(CYAN, "Pattern:"), pattern);
    println!("  {}     {}", color(CYAN, "Bell:"), if config.bell { "on" } else { "off" });
    println!("  {}  {}ms", color(CYAN, "Cadence:"), config.cadence().as_millis());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(config).context("Failed to serialize config")?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_with_tty() {
        // Just verify the color function doesn't panic
        let result = color(GREEN, "test");
        assert!(result.contains("test"));
    }

    #[test]
    fn test_resolve_pattern_precedence() {
        let config = Config {
            pattern: Some("6-2-6".to_string()),
            ..Config::default()
        };

        let explicit = resolve_pattern(&config, Some("4-7-8".to_string()), None).unwrap();
        assert_eq!(explicit, Preset::Relax.pattern());

        let preset = resolve_pattern(&config, None, Some("calm".to_string())).unwrap();
        assert_eq!(preset, Preset::Calm.pattern());

        let configured = resolve_pattern(&config, None, None).unwrap();
        assert_eq!(configured, BreathPattern::new(6, 2, 6).unwrap());

        let fallback = resolve_pattern(&Config::default(), None, None).unwrap();
        assert_eq!(fallback, BreathPattern::default());
    }

    #[test]
    fn test_oversized_limits_are_errors() {
        let err = time_limit_seconds(u64::MAX / 2).unwrap_err();
        assert!(err.to_string().contains("too long"));
        assert_eq!(time_limit_seconds(5).unwrap(), 300);

        let pattern = BreathPattern::default();
        let err = timeline_seconds(&pattern, u64::MAX / 2).unwrap_err();
        assert!(err.to_string().contains("too long"));
        assert_eq!(timeline_seconds(&pattern, 2).unwrap(), 24);
    }

    #[test]
    fn test_huge_timeline_returns_error() {
        let result = cmd_timeline(&Config::default(), None, None, u64::MAX / 2);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_huge_minutes_returns_error() {
        let result = cmd_start(
            &Config::default(),
            None,
            None,
            Some(0),
            Some(u64::MAX / 2),
            true,
            true,
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_caps_cycles_and_minutes() {
        assert!(Cli::try_parse_from(["breathe", "timeline", "--cycles", "1000000000"]).is_err());
        assert!(Cli::try_parse_from(["breathe", "timeline", "--cycles", "0"]).is_err());
        assert!(Cli::try_parse_from(["breathe", "timeline", "--cycles", "100"]).is_ok());
        assert!(Cli::try_parse_from(["breathe", "start", "-m", "99999999999"]).is_err());
        assert!(Cli::try_parse_from(["breathe", "start", "-m", "20"]).is_ok());
    }

    #[test]
    fn test_invalid_config_pattern_is_rejected() {
        let config = Config {
            pattern: Some("4-0-4".to_string()),
            ..Config::default()
        };
        let err = resolve_pattern(&config, None, None).unwrap_err();
        assert!(err.to_string().contains("Invalid pattern in config"));
    }

    #[test]
    fn test_bar_line_mentions_cue_and_cycles() {
        let pattern = BreathPattern::default();
        let bar = BreathingBar {
            pattern,
            width: 10,
            json: false,
        };
        let mut session = BreathingSession::new(pattern);
        session.start();
        for _ in 0..5 {
            session.tick();
        }
        let report = session.snapshot();
        let line = bar.line(&report, &animation::frame(&pattern, report.elapsed_seconds));
        assert!(line.contains("Hold"));
        assert!(line.contains("Cycles:"));
        assert!(line.contains(" 3s"));
    }
}
