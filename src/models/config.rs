//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Seen-set persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Periodic trigger settings
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Career pages to crawl
    #[serde(default = "defaults::sources")]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(AppError::config("No sources configured"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(AppError::config("crawler.user_agents is empty"));
        }
        if self.crawler.politeness_min_ms > self.crawler.politeness_max_ms {
            return Err(AppError::config(
                "crawler.politeness_min_ms must not exceed crawler.politeness_max_ms",
            ));
        }
        if self.schedule.interval_hours == 0 {
            return Err(AppError::config("schedule.interval_hours must be > 0"));
        }
        if self.storage.seen_file.trim().is_empty() {
            return Err(AppError::config("storage.seen_file is empty"));
        }
        for source in &self.sources {
            source.validate()?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            storage: StorageConfig::default(),
            schedule: ScheduleConfig::default(),
            notify: NotifyConfig::default(),
            sources: defaults::sources(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent pool; one is picked at random per request
    #[serde(default = "defaults::user_agents")]
    pub user_agents: Vec<String>,

    /// Lower bound of the pause after each source, in milliseconds
    #[serde(default = "defaults::politeness_min")]
    pub politeness_min_ms: u64,

    /// Upper bound of the pause after each source, in milliseconds
    #[serde(default = "defaults::politeness_max")]
    pub politeness_max_ms: u64,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Politeness bounds as a `Politeness` value.
    pub fn politeness(&self) -> Politeness {
        Politeness::new(
            Duration::from_millis(self.politeness_min_ms),
            Duration::from_millis(self.politeness_max_ms),
        )
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout(),
            user_agents: defaults::user_agents(),
            politeness_min_ms: defaults::politeness_min(),
            politeness_max_ms: defaults::politeness_max(),
        }
    }
}

/// Randomized pause inserted after each source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Politeness {
    min: Duration,
    max: Duration,
}

impl Politeness {
    /// Bounds are reordered if given backwards.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draw a delay uniformly from `[min, max]`.
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::random_range(min..=max))
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }
}

/// Seen-set persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Seen-set file name, relative to the storage directory
    #[serde(default = "defaults::seen_file")]
    pub seen_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seen_file: defaults::seen_file(),
        }
    }
}

/// Periodic trigger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hours between cycles
    #[serde(default = "defaults::interval_hours")]
    pub interval_hours: u64,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours.saturating_mul(60 * 60))
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_hours: defaults::interval_hours(),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    /// Who the digest is addressed to
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Extraction strategy used for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Card containers with separate title and link elements
    #[serde(alias = "google")]
    Structured,
    /// Card containers whose first link carries the title
    #[serde(alias = "microsoft")]
    Simplified,
    /// Flat scan over anchors
    #[default]
    #[serde(other)]
    Generic,
}

/// A career page to crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Employer name, recorded as the posting's company
    pub name: String,

    /// Base for resolving relative links
    pub base_url: String,

    /// Page fetched each cycle
    pub search_url: String,

    /// Extraction strategy
    #[serde(default)]
    pub adapter: AdapterKind,
}

impl SourceConfig {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        search_url: impl Into<String>,
        adapter: AdapterKind,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            search_url: search_url.into(),
            adapter,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::config("source with empty name"));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            AppError::config(format!("source '{}': invalid base_url: {e}", self.name))
        })?;
        url::Url::parse(&self.search_url).map_err(|e| {
            AppError::config(format!("source '{}': invalid search_url: {e}", self.name))
        })?;
        Ok(())
    }
}

mod defaults {
    use super::{AdapterKind, SourceConfig};

    // Crawler defaults
    pub fn timeout() -> u64 {
        15
    }
    pub fn user_agents() -> Vec<String> {
        vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".into(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15".into(),
            "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0".into(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0".into(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0".into(),
        ]
    }
    pub fn politeness_min() -> u64 {
        3000
    }
    pub fn politeness_max() -> u64 {
        6000
    }

    // Storage defaults
    pub fn seen_file() -> String {
        "seen_jobs.json".into()
    }

    // Schedule defaults
    pub fn interval_hours() -> u64 {
        3
    }

    // Source defaults
    pub fn sources() -> Vec<SourceConfig> {
        vec![
            SourceConfig::new(
                "Google",
                "https://careers.google.com",
                "https://careers.google.com/jobs/results/?degree=BACHELORS&employment_type=INTERN&category=SOFTWARE_ENGINEERING&company=Google&hl=en_US&jlo=en_US&location=United%20States&page=1&sort_by=date",
                AdapterKind::Structured,
            ),
            SourceConfig::new(
                "Microsoft",
                "https://careers.microsoft.com",
                "https://careers.microsoft.com/v2/global/en/jobs?pg=1&pgSz=20&o=Relevance&l=en_us&s=Students%20and%20graduates&t=US%20Citizenship%20Requirement%3DNot%20Required%20-%20US%20Citizenship%3DNot%20Required&t=Employment%20Type%3DInternship&f=Internships",
                AdapterKind::Simplified,
            ),
            SourceConfig::new(
                "Amazon",
                "https://amazon.jobs",
                "https://amazon.jobs/en/search?base_query=software+engineer+intern&offset=0&category=software-development&loc_query=United%20States&job_type=Internship&sort=recent",
                AdapterKind::Generic,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_no_sources() {
        let mut config = Config::default();
        config.sources.clear();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn interval_saturates_on_huge_hours() {
        let schedule = ScheduleConfig {
            interval_hours: u64::MAX,
        };
        assert_eq!(schedule.interval(), Duration::from_secs(u64::MAX));
        assert_eq!(
            ScheduleConfig::default().interval(),
            Duration::from_secs(3 * 60 * 60)
        );
    }

    #[test]
    fn validate_rejects_inverted_politeness() {
        let mut config = Config::default();
        config.crawler.politeness_min_ms = 10;
        config.crawler.politeness_max_ms = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.sources[0].base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_sources_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            timeout_secs = 5

            [[sources]]
            name = "Acme"
            base_url = "https://acme.example"
            search_url = "https://acme.example/careers"
            adapter = "google"

            [[sources]]
            name = "Initech"
            base_url = "https://initech.example"
            search_url = "https://initech.example/jobs"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.timeout_secs, 5);
        assert_eq!(config.crawler.politeness_min_ms, 3000);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].adapter, AdapterKind::Structured);
        assert_eq!(config.sources[1].adapter, AdapterKind::Generic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_adapter_falls_back_to_generic() {
        let source: SourceConfig = toml::from_str(
            r#"
            name = "Amazon"
            base_url = "https://amazon.jobs"
            search_url = "https://amazon.jobs/en/search"
            adapter = "amazon"
            "#,
        )
        .unwrap();
        assert_eq!(source.adapter, AdapterKind::Generic);
    }

    #[test]
    fn politeness_sample_within_bounds() {
        let politeness = Politeness::new(Duration::from_millis(5), Duration::from_millis(10));
        for _ in 0..50 {
            let d = politeness.sample();
            assert!(d >= Duration::from_millis(5) && d <= Duration::from_millis(10));
        }
        assert_eq!(Politeness::none().sample(), Duration::ZERO);
        assert!(Politeness::none().is_zero());
    }
}
