use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for ArchiveLinks
///
/// Every section and key is optional; missing values fall back to the defaults
/// documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub scheduler: SchedulerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Remote archive endpoints and the time budgets used against them
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ArchiveConfig {
    /// Capture endpoint; the encoded target URL is appended as a path segment
    pub save_endpoint: String,

    /// Availability endpoint; the target URL is passed as the `url` query parameter
    pub availability_endpoint: String,

    /// Timeout for each capture request (milliseconds, default 12000)
    pub submit_timeout_ms: u64,

    /// Timeout for each availability check (milliseconds, default 8000)
    pub availability_timeout_ms: u64,

    /// Wall-clock budget for polling one link (milliseconds, default 45000)
    pub preserve_deadline_ms: u64,

    /// Maximum availability checks per link (default 8)
    pub poll_attempts: u32,

    /// Pause between availability checks (milliseconds, default 3000)
    pub poll_delay_ms: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            save_endpoint: "https://web.archive.org/save".to_string(),
            availability_endpoint: "https://archive.org/wayback/available".to_string(),
            submit_timeout_ms: 12_000,
            availability_timeout_ms: 8_000,
            preserve_deadline_ms: 45_000,
            poll_attempts: 8,
            poll_delay_ms: 3_000,
        }
    }
}

impl ArchiveConfig {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn availability_timeout(&self) -> Duration {
        Duration::from_millis(self.availability_timeout_ms)
    }

    pub fn preserve_deadline(&self) -> Duration {
        Duration::from_millis(self.preserve_deadline_ms)
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SchedulerConfig {
    /// Maximum number of links processed at once (default 5)
    pub max_concurrent_saves: usize,

    /// Startup offset between consecutive workers (milliseconds, default 350)
    pub worker_stagger_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_saves: 5,
            worker_stagger_ms: 350,
        }
    }
}

impl SchedulerConfig {
    pub fn worker_stagger(&self) -> Duration {
        Duration::from_millis(self.worker_stagger_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the client
    pub name: String,

    /// Version of the client
    pub version: String,

    /// URL with information about the client
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "ArchiveLinks".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the CSV results file
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "archivelinks-results.csv".to_string(),
        }
    }
}
