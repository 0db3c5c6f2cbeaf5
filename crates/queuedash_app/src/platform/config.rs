use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use queuedash_client::{FetchSettings, DEFAULT_POLL_INTERVAL};
use queuedash_core::creators::{DEFAULT_JOBS_LIMIT, DEFAULT_STAT_BUCKETS};
use queuedash_core::BucketSecs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

#[derive(Parser, Debug, Default)]
#[command(name = "queuedash")]
#[command(version)]
#[command(about = "Terminal dashboard for a background job queue")]
pub struct Args {
    /// RON configuration file; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the job-queue API (e.g. http://localhost:8080)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Number of jobs listed per refresh
    #[arg(long)]
    pub limit: Option<u32>,

    /// Queue stat buckets in seconds (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub buckets: Option<Vec<BucketSecs>>,

    /// Where log output goes
    #[arg(long, value_enum)]
    pub log_destination: Option<LogDestination>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub jobs_limit: u32,
    pub stat_buckets: Vec<BucketSecs>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_body_bytes: u64,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: "http://localhost:8080".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            jobs_limit: DEFAULT_JOBS_LIMIT,
            stat_buckets: DEFAULT_STAT_BUCKETS.to_vec(),
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_body_bytes: fetch.max_bytes,
            log_destination: LogDestination::File,
            log_file: PathBuf::from("./queuedash.log"),
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the config file if given, then command-line overrides.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(interval_ms) = args.interval_ms {
            self.poll_interval_ms = interval_ms;
        }
        if let Some(limit) = args.limit {
            self.jobs_limit = limit;
        }
        if let Some(buckets) = &args.buckets {
            self.stat_buckets = buckets.clone();
        }
        if let Some(destination) = args.log_destination {
            self.log_destination = destination;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        }
        if self.jobs_limit == 0 {
            return Err(ConfigError::Invalid("jobs_limit must be > 0".into()));
        }
        if self.stat_buckets.is_empty() {
            return Err(ConfigError::Invalid("stat_buckets must not be empty".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_body_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;

    #[test]
    fn defaults_match_dashboard_conventions() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.jobs_limit, 20);
        assert_eq!(config.stat_buckets, vec![300, 600, 1800, 3600]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_ron_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"(base_url: "http://queue.internal:9000", stat_buckets: [60, 120], log_destination: Both)"#
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://queue.internal:9000");
        assert_eq!(config.stat_buckets, vec![60, 120]);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.jobs_limit, 20);
    }

    #[test]
    fn flags_override_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"(poll_interval_ms: 5000, jobs_limit: 50)"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::parse_from([
            "queuedash",
            "--config",
            path.as_str(),
            "--limit",
            "10",
            "--buckets",
            "30,90",
            "--log-destination",
            "terminal",
        ]);
        let config = DashboardConfig::resolve(&args).unwrap();

        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.jobs_limit, 10);
        assert_eq!(config.stat_buckets, vec![30, 90]);
        assert_eq!(config.log_destination, LogDestination::Terminal);
    }

    #[test]
    fn missing_file_and_bad_values_are_errors() {
        let err = DashboardConfig::from_file(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let err = DashboardConfig::from_ron("(jobs_limit: \"many\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let args = Args {
            interval_ms: Some(0),
            ..Args::default()
        };
        let err = DashboardConfig::resolve(&args).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
