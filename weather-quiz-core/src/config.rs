use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{answers::Questions, source::http::RetryPolicy};

pub const DEFAULT_BASE_URL: &str =
    "http://weather-api.eba-jgjmjs6p.eu-west-2.elasticbeanstalk.com/api/weather";
pub const DEFAULT_CITIES_URL: &str =
    "http://weather-api.eba-jgjmjs6p.eu-west-2.elasticbeanstalk.com/api/cities/";
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// How much the client trusts the shape of fetched forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeValidation {
    /// Every forecast must hold seven days of 24 readings.
    #[default]
    Strict,
    /// Use whatever the source returns.
    Lenient,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// output_dir = "/tmp/answers"
/// retries = 2
///
/// [questions.temperature]
/// city = "bath"
/// day = "wednesday"
/// hour = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forecasts are fetched from `{base_url}/{id}/{city}`.
    pub base_url: String,
    pub cities_url: String,

    /// Where `answers.json` goes. Defaults to the current directory.
    pub output_dir: PathBuf,

    pub validation: ShapeValidation,

    /// Extra attempts after a transient failure. Zero means fail fast.
    pub retries: u32,
    pub retry_delay_ms: u64,

    /// Per-request timeout; no timeout when absent.
    pub timeout_secs: Option<u64>,

    pub questions: Questions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cities_url: DEFAULT_CITIES_URL.to_string(),
            output_dir: PathBuf::from("."),
            validation: ShapeValidation::default(),
            retries: 0,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            timeout_secs: None,
            questions: Questions::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-quiz", "weather-quiz")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy { retries: self.retries, delay: Duration::from_millis(self.retry_delay_ms) }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weekday;
    use std::io::Write;

    #[test]
    fn defaults_fail_fast_without_timeout() {
        let cfg = Config::default();

        assert_eq!(cfg.retry_policy().retries, 0);
        assert_eq!(cfg.timeout(), None);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert_eq!(cfg.validation, ShapeValidation::Strict);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
retries = 3
retry_delay_ms = 10
validation = "lenient"

[questions.pressure]
city = "leeds"
threshold = 990
day = "monday"
"#
        )
        .unwrap();

        let cfg = Config::load_from(file.path()).unwrap();

        assert_eq!(cfg.retries, 3);
        assert_eq!(cfg.retry_policy().delay, Duration::from_millis(10));
        assert_eq!(cfg.validation, ShapeValidation::Lenient);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.questions.pressure.city, "leeds");
        assert_eq!(cfg.questions.pressure.day, Weekday::Monday);
        assert_eq!(cfg.questions.temperature, Questions::default().temperature);
    }

    #[test]
    fn invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retries = \"many\"").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
