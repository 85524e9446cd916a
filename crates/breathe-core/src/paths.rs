//! Standard paths used by breathe

use std::path::{Path, PathBuf};

/// Standard breathe paths
pub struct Paths {
    /// Config directory (~/.config/breathe)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("breathe");

        Self { config }
    }

    /// Paths rooted at an explicit config directory
    pub fn with_config_dir(dir: &Path) -> Self {
        Self {
            config: dir.to_path_buf(),
        }
    }

    /// Location of the user config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        let paths = Paths::with_config_dir(Path::new("/tmp/breathe-test"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/breathe-test/config.json")
        );
    }

    #[test]
    fn test_default_dir_is_named_breathe() {
        let paths = Paths::new();
        assert!(paths.config.ends_with("breathe"));
    }
}
