// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! Configuration is stored in TOML format via `confy`. Every field has a serde
//! default so older or hand-edited files keep loading.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use status_client::{MonitorConfig, PollerConfig, DEFAULT_REGISTRY_URL};

/// Application name used for the config file location
const APP_NAME: &str = "service-monitor";

/// Environment variable overriding the configured registry URL
pub const REGISTRY_URL_ENV: &str = "STATUS_REGISTRY_URL";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Base URL of the status registry
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Delay between scheduled polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Poll as soon as watching starts instead of after one interval
    #[serde(default = "default_true")]
    pub fetch_immediately: bool,

    /// Per-request timeout, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            registry_url: default_registry_url(),
            poll_interval_ms: default_poll_interval_ms(),
            fetch_immediately: true,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating the default file on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, "config", self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, "config")
    }

    /// Resolve the registry URL: environment variable first, then config
    pub fn resolve_registry_url(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.registry_url.clone())
    }

    /// Apply the environment override in place
    pub fn apply_env(&mut self) {
        self.registry_url = self.resolve_registry_url(std::env::var(REGISTRY_URL_ENV).ok());
    }

    /// Build the library configuration
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            registry_url: self.registry_url.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            poller: PollerConfig {
                interval: Duration::from_millis(self.poll_interval_ms),
                fetch_immediately: self.fetch_immediately,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: AppConfig = toml::from_str("registry_url = \"http://registry:9000\"").unwrap();
        assert_eq!(config.registry_url, "http://registry:9000");
        assert_eq!(config.poll_interval_ms, 5_000);
        assert!(config.fetch_immediately);
        assert_eq!(config.config_version, 1);
    }

    #[test]
    fn test_env_takes_precedence() {
        let config = AppConfig::default();
        assert_eq!(
            config.resolve_registry_url(Some("http://env:1".to_string())),
            "http://env:1"
        );
        assert_eq!(config.resolve_registry_url(Some(String::new())), DEFAULT_REGISTRY_URL);
        assert_eq!(config.resolve_registry_url(None), DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn test_monitor_config_conversion() {
        let config = AppConfig {
            poll_interval_ms: 250,
            fetch_immediately: false,
            request_timeout_ms: 1_500,
            ..Default::default()
        };
        let monitor = config.monitor_config();
        assert_eq!(monitor.poller.interval, Duration::from_millis(250));
        assert!(!monitor.poller.fetch_immediately);
        assert_eq!(monitor.request_timeout, Duration::from_millis(1_500));
    }
}
