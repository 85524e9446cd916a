//! Breathe Core - Shared functionality for the breathe tool
//!
//! Paths, user configuration and text formatting used by the CLI.

pub mod config;
pub mod format;
pub mod paths;

pub use config::Config;
pub use paths::Paths;
