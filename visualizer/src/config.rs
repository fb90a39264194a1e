//! Configuration loading for the visualizer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, VizError};

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pathviz.toml";

/// Largest accepted `rows`.
pub const MAX_ROWS: usize = 1024;

/// Visualizer settings
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VizConfig {
    /// Cells per side (default: 50)
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Requested window width in pixels (default: 800)
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Pause after each search step in milliseconds (default: 0)
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Window title (default: "A* Visualisation")
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_rows() -> usize {
    pathviz_core::DEFAULT_SIZE
}
fn default_window_width() -> u32 {
    800
}
fn default_step_delay_ms() -> u64 {
    0
}
fn default_title() -> String {
    "A* Visualisation".to_string()
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            window_width: default_window_width(),
            step_delay_ms: default_step_delay_ms(),
            title: default_title(),
        }
    }
}

impl VizConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VizError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        let config: VizConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration for a run: the explicit `path` if given,
    /// else [`DEFAULT_CONFIG_FILE`] if it exists, else defaults.
    pub fn discover(path: Option<PathBuf>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load(&p);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(local);
        }
        log::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_ROWS).contains(&self.rows) {
            return Err(VizError::Invalid(format!(
                "rows must be between 2 and {MAX_ROWS}, got {}",
                self.rows
            )));
        }
        if self.cell_width() < 1 {
            return Err(VizError::Invalid(format!(
                "window_width {} is too small for {} rows",
                self.window_width, self.rows
            )));
        }
        Ok(())
    }

    /// Side of one cell in pixels; rounds down.
    pub fn cell_width(&self) -> u32 {
        match u32::try_from(self.rows) {
            Ok(rows) if rows > 0 => self.window_width / rows,
            _ => 0,
        }
    }

    /// Window side actually covered by cells.
    pub fn pixel_width(&self) -> u32 {
        self.cell_width() * self.rows as u32
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = VizConfig::default();
        assert_eq!(c.rows, 50);
        assert_eq!(c.window_width, 800);
        assert_eq!(c.cell_width(), 16);
        assert_eq!(c.step_delay(), Duration::ZERO);
        assert_eq!(c.title, "A* Visualisation");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(VizConfig::parse("").unwrap(), VizConfig::default());
    }

    #[test]
    fn overrides() {
        let c = VizConfig::parse("rows = 30\nstep_delay_ms = 5\n").unwrap();
        assert_eq!(c.rows, 30);
        assert_eq!(c.window_width, 800);
        assert_eq!(c.cell_width(), 26);
        assert_eq!(c.pixel_width(), 780);
        assert_eq!(c.step_delay(), Duration::from_millis(5));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            VizConfig::parse("rows = 1"),
            Err(VizError::Invalid(_))
        ));
        assert!(matches!(
            VizConfig::parse("rows = 100000\nwindow_width = 4000000000"),
            Err(VizError::Invalid(_))
        ));
        assert!(VizConfig::parse("rows = 1024\nwindow_width = 2048").is_ok());
        assert!(matches!(
            VizConfig::parse("rows = 100\nwindow_width = 99"),
            Err(VizError::Invalid(_))
        ));
        assert!(matches!(
            VizConfig::parse("rows = \"many\""),
            Err(VizError::Toml(_))
        ));
        assert!(matches!(
            VizConfig::parse("colour = \"red\""),
            Err(VizError::Toml(_))
        ));
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let dir = std::env::temp_dir().join(format!("pathviz-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("viz.toml");
        std::fs::write(&path, "title = \"demo\"\n").unwrap();

        let c = VizConfig::load(&path).unwrap();
        assert_eq!(c.title, "demo");
        assert_eq!(VizConfig::discover(Some(path.clone())).unwrap(), c);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(VizConfig::load(&path), Err(VizError::Config(_))));
        let _ = std::fs::remove_dir(&dir);
    }
}
