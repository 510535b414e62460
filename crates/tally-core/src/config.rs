//! Store configuration for tally
//!
//! Configuration is stored in `.tally/config.toml`.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{Result, TallyError};

pub use types::{FontStep, ReportConfig, ScoringConfig, StoreConfig, STORE_FORMAT_VERSION};

impl StoreConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;
        config.report.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TallyError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl ReportConfig {
    /// Reject geometry the layout engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("report.margin", self.margin),
            ("report.rank_width", self.rank_width),
            ("report.name_width", self.name_width),
            ("report.total_width", self.total_width),
            ("report.min_criterion_width", self.min_criterion_width),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(TallyError::invalid_value(name, value));
            }
        }
        if self.min_font_size.is_nan() || self.min_font_size <= 0.0 {
            return Err(TallyError::invalid_value(
                "report.min_font_size",
                self.min_font_size,
            ));
        }
        if self.max_header_font_size < self.min_font_size {
            return Err(TallyError::invalid_value(
                "report.max_header_font_size",
                self.max_header_font_size,
            ));
        }
        Ok(())
    }

    /// Body font size for a grid of the given shape
    pub fn body_font_size(&self, criteria: usize, rows: usize) -> f64 {
        let mut size = self.base_font_size;
        for step in &self.font_steps {
            if criteria > step.criteria_over || rows > step.rows_over {
                size = step.size;
            }
        }
        size.max(self.min_font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.version, STORE_FORMAT_VERSION);
        assert_eq!(config.scoring.default_event_name, "Main Event");
        assert_eq!(config.report.min_criterion_width, 18.0);
        assert_eq!(config.report.landscape_criteria_over, 4);
        assert_eq!(config.report.landscape_rows_over, 15);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = StoreConfig::default();
        config.report.title = "Spring Festival".to_string();
        config.save(&path).unwrap();

        let loaded = StoreConfig::load(&path).unwrap();
        assert_eq!(loaded.version, config.version);
        assert_eq!(loaded.report.title, "Spring Festival");
        assert_eq!(loaded.report.font_steps, config.report.font_steps);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report]\nbase_font_size = 11.0\n").unwrap();

        let loaded = StoreConfig::load(&path).unwrap();
        assert_eq!(loaded.report.base_font_size, 11.0);
        assert_eq!(loaded.report.name_width, 50.0);
        assert_eq!(loaded.scoring.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_negative_width_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report]\nname_width = -4.0\n").unwrap();

        assert!(matches!(
            StoreConfig::load(&path),
            Err(TallyError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_body_font_steps_down() {
        let report = ReportConfig::default();
        assert_eq!(report.body_font_size(3, 10), 10.0);
        assert_eq!(report.body_font_size(6, 10), 9.0);
        assert_eq!(report.body_font_size(3, 41), 8.0);
        assert_eq!(report.body_font_size(12, 100), 7.0);
    }
}
