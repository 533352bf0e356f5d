use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::SeatCountPolicy;
use crate::retry::RetryConfig;
use crate::Result;

pub const ENV_PREFIX: &str = "SEAT_LAYOUT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub snapshot_dir: Option<String>,
    pub request_timeout_ms: u64,
    pub retry_attempts: u32,
    pub failure_threshold: u32,
    pub recovery_timeout_secs: u64,
    pub headers: HashMap<String, String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            snapshot_dir: None,
            request_timeout_ms: 5_000,
            retry_attempts: 3,
            failure_threshold: 5,
            recovery_timeout_secs: 30,
            headers: HashMap::new(),
        }
    }
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_secs(self.recovery_timeout_secs)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::seat_source(self.retry_attempts)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub seat_count_policy: SeatCountPolicy,
    pub show_legend: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub application_id: String,
    pub source: SourceConfig,
    pub layout: LayoutConfig,
    pub additional_properties: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_id: "bus-seat-layout".to_string(),
            source: SourceConfig::default(),
            layout: LayoutConfig::default(),
            additional_properties: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Layers `SEAT_LAYOUT__SECTION__KEY` environment variables over `self`.
    pub fn apply_env_overrides(self) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        self.apply_overrides(&settings)
    }

    pub fn apply_overrides(mut self, settings: &config::Config) -> Result<Self> {
        if let Ok(id) = settings.get_string("application_id") {
            self.application_id = id;
        }
        if let Ok(url) = settings.get_string("source.base_url") {
            debug!("Overriding seat source URL: {}", url);
            self.source.base_url = Some(url);
        }
        if let Ok(dir) = settings.get_string("source.snapshot_dir") {
            self.source.snapshot_dir = Some(dir);
        }
        if let Ok(timeout) = settings.get::<u64>("source.request_timeout_ms") {
            self.source.request_timeout_ms = timeout;
        }
        if let Ok(attempts) = settings.get::<u32>("source.retry_attempts") {
            self.source.retry_attempts = attempts;
        }
        if let Ok(threshold) = settings.get::<u32>("source.failure_threshold") {
            self.source.failure_threshold = threshold;
        }
        if let Ok(secs) = settings.get::<u64>("source.recovery_timeout_secs") {
            self.source.recovery_timeout_secs = secs;
        }
        if let Ok(policy) = settings.get_string("layout.seat_count_policy") {
            self.layout.seat_count_policy = policy.parse()?;
        }
        if let Ok(show) = settings.get_bool("layout.show_legend") {
            self.layout.show_legend = show;
        }
        Ok(self)
    }
}
