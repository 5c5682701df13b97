//! Environment-driven settings.
//!
//! Values come from the process environment (a `.env` file is loaded by the
//! binary before [`Settings::from_env`] runs). CLI flags override them.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::predictor::PredictionConfig;

/// Which FUSER dataset to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Train,
    Test,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Train => f.write_str("train"),
            Mode::Test => f.write_str("test"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub train_dir: PathBuf,
    pub test_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub log_file_path: PathBuf,
    pub prediction: PredictionConfig,
}

impl Settings {
    pub const DEFAULT_TRAIN_DIR: &'static str = "data/FUSER/FUSER_train/";
    pub const DEFAULT_TEST_DIR: &'static str = "data/FUSER/FUSER_test/";
    pub const DEFAULT_OUTPUT_DIR: &'static str = "submissions/";
    pub const DEFAULT_LOG_LEVEL: &'static str = "info";
    pub const DEFAULT_LOG_FILE: &'static str = "logs/arrival_forecast.log";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, falling back to the
    /// defaults for missing or empty values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            train_dir: get("FUSER_TRAIN_DIR", Self::DEFAULT_TRAIN_DIR).into(),
            test_dir: get("FUSER_TEST_DIR", Self::DEFAULT_TEST_DIR).into(),
            output_dir: get("SUBMISSION_OUTPUT_DIR", Self::DEFAULT_OUTPUT_DIR).into(),
            log_level: get("LOG_LEVEL", Self::DEFAULT_LOG_LEVEL).to_lowercase(),
            log_file_path: get("LOG_FILE_PATH", Self::DEFAULT_LOG_FILE).into(),
            prediction: PredictionConfig::default(),
        }
    }

    pub fn data_dir(&self, mode: Mode) -> &Path {
        match mode {
            Mode::Train => &self.train_dir,
            Mode::Test => &self.test_dir,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.data_dir(Mode::Train), Path::new("data/FUSER/FUSER_train/"));
        assert_eq!(settings.data_dir(Mode::Test), Path::new("data/FUSER/FUSER_test/"));
        assert_eq!(settings.output_dir, PathBuf::from("submissions/"));
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.prediction, PredictionConfig::default());
    }

    #[test]
    fn test_lookup_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FUSER_TEST_DIR", "/data/test"),
            ("SUBMISSION_OUTPUT_DIR", "/out"),
            ("LOG_LEVEL", "DEBUG"),
            ("FUSER_TRAIN_DIR", "  "),
        ]);
        let settings = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.data_dir(Mode::Test), Path::new("/data/test"));
        assert_eq!(settings.data_dir(Mode::Train), Path::new(Settings::DEFAULT_TRAIN_DIR));
        assert_eq!(settings.output_dir, PathBuf::from("/out"));
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Train.to_string(), "train");
        assert_eq!(Mode::Test.to_string(), "test");
    }
}
