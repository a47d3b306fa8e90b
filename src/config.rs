use std::path::PathBuf;
use std::time::Duration;

use crate::export::ExportOptions;
use crate::scraper::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL};
use crate::utils::DEFAULT_WINDOW_DAYS;

/// Everything a run needs besides the reference date.
#[derive(Debug, Clone)]
pub struct Settings {
    pub url: String,
    pub timeout: Duration,
    pub window_days: u32,
    pub export: ExportOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            window_days: DEFAULT_WINDOW_DAYS,
            export: ExportOptions::default(),
        }
    }
}

impl Settings {
    pub fn with_output(mut self, output_dir: Option<PathBuf>, file_name: Option<String>) -> Self {
        self.export = ExportOptions {
            output_dir,
            file_name,
        };
        self
    }

    pub fn validate(self) -> Result<Self, String> {
        if self.url.trim().is_empty() {
            return Err("URL must not be empty".to_string());
        }
        if self.timeout.is_zero() {
            return Err("Timeout must be greater than 0".to_string());
        }
        if let Some(name) = &self.export.file_name
            && (name.trim().is_empty() || name.contains(['/', '\\']))
        {
            return Err(format!("Invalid file name '{name}'"));
        }
        Ok(self)
    }
}
