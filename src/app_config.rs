//! `conf.json`: language preferences, provider credentials and timings.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::language_utils::{LanguageId, LanguagePreferences};
use crate::providers::ProviderTag;
use crate::providers::{baidu, caiyun, tencent, youdao};

/// Lower bound of the lookup debounce delay
pub const MIN_DELAY_FETCH_MS: u64 = 50;

/// Upper bound of the lookup debounce delay
pub const MAX_DELAY_FETCH_MS: u64 = 600;

/// Default help link shown next to failures
pub const DEFAULT_HELP_URL: &str = "https://github.com/Haojen/raycast-Parrot#error-code-information";

/// Contents of `conf.json`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// First preferred language, the default target
    #[serde(default = "default_language1")]
    pub language1: String,

    /// Second preferred language
    #[serde(default = "default_language2")]
    pub language2: String,

    /// Debounce delay before a typed query is sent, clamped to 50..=600
    #[serde(default = "default_delay_fetch_ms")]
    pub delay_fetch_ms: u64,

    /// Retry policy for retryable primary errors
    #[serde(default)]
    pub retry: RetryConfig,

    /// Budget for each enrichment call
    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,

    /// Window in which the same clipboard text is not looked up again
    #[serde(default = "default_clipboard_query_window_ms")]
    pub clipboard_query_window_ms: u64,

    /// Help link shown with failures
    #[serde(default = "default_help_url")]
    pub help_url: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend credentials and endpoints
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,
}

/// Backoff growth between retries
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry
    Fixed,
    /// Delay doubles with every retry
    #[default]
    Exponential,
}

/// Retry configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum retries after the first request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff: Backoff::default(),
        }
    }
}

/// Credentials and endpoint of one backend
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // youdao | baidu | tencent | caiyun
    #[serde(rename = "type")]
    pub provider_type: String,

    // app key, app id, secret id or token depending on the backend
    #[serde(default = "String::new")]
    pub app_key: String,

    // unused by Caiyun
    #[serde(default = "String::new")]
    pub app_secret: String,

    // empty means the public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    // Tencent only
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderConfig {
    // @param tag: Provider tag
    // @returns: Provider config with defaults and empty credentials
    pub fn new(tag: ProviderTag) -> Self {
        let (endpoint, region) = match tag {
            ProviderTag::Youdao => (youdao::DEFAULT_ENDPOINT, None),
            ProviderTag::Baidu => (baidu::DEFAULT_ENDPOINT, None),
            ProviderTag::Tencent => (tencent::DEFAULT_ENDPOINT, Some(tencent::DEFAULT_REGION.to_string())),
            ProviderTag::Caiyun => (caiyun::DEFAULT_ENDPOINT, None),
        };

        Self {
            provider_type: tag.to_lowercase_string(),
            app_key: String::new(),
            app_secret: String::new(),
            endpoint: endpoint.to_string(),
            region,
            timeout_secs: default_timeout_secs(),
            enabled: true,
        }
    }

    /// Parsed provider type
    pub fn tag(&self) -> Result<ProviderTag> {
        self.provider_type.parse()
    }

    /// Whether credentials are filled in for this provider
    pub fn has_credentials(&self) -> bool {
        match self.tag() {
            Ok(ProviderTag::Caiyun) => !self.app_key.is_empty(),
            Ok(_) => !self.app_key.is_empty() && !self.app_secret.is_empty(),
            Err(_) => false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language1() -> String {
    "en".to_string()
}

fn default_language2() -> String {
    "zh-CHS".to_string()
}

fn default_delay_fetch_ms() -> u64 {
    400
}

fn default_max_retries() -> u32 {
    3
}

fn default_enrichment_timeout_ms() -> u64 {
    5000
}

fn default_clipboard_query_window_ms() -> u64 {
    5000
}

fn default_help_url() -> String {
    DEFAULT_HELP_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_available_providers() -> Vec<ProviderConfig> {
    let mut providers = vec![ProviderConfig::new(ProviderTag::Youdao)];
    providers.extend(ProviderTag::ENRICHMENT_ORDER.iter().map(|tag| ProviderConfig::new(*tag)));
    providers
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config =
            serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json).context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// The two preferred languages
    pub fn preferences(&self) -> LanguagePreferences {
        LanguagePreferences::new(LanguageId::from(self.language1.as_str()), LanguageId::from(self.language2.as_str()))
    }

    /// Debounce delay clamped to its allowed range
    pub fn effective_delay(&self) -> Duration {
        Duration::from_millis(self.delay_fetch_ms.clamp(MIN_DELAY_FETCH_MS, MAX_DELAY_FETCH_MS))
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }

    pub fn clipboard_query_window(&self) -> Duration {
        Duration::from_millis(self.clipboard_query_window_ms)
    }

    /// Get a specific provider configuration by tag
    pub fn get_provider_config(&self, tag: ProviderTag) -> Option<&ProviderConfig> {
        let provider_str = tag.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type.to_lowercase() == provider_str)
    }

    /// Get a provider configuration that is enabled and has credentials
    pub fn get_active_provider_config(&self, tag: ProviderTag) -> Option<&ProviderConfig> {
        self.get_provider_config(tag).filter(|p| p.enabled && p.has_credentials())
    }

    /// Reject configurations a lookup cannot run with
    pub fn validate(&self) -> Result<()> {
        // Languages: known, concrete and distinct
        self.preferences().validate()?;

        if self.enrichment_timeout_ms == 0 {
            return Err(anyhow!("enrichment_timeout_ms must be greater than zero"));
        }

        for provider in &self.available_providers {
            provider.tag()?;
            if !provider.endpoint.is_empty() {
                url::Url::parse(&provider.endpoint)
                    .with_context(|| format!("Invalid endpoint for {}: {}", provider.provider_type, provider.endpoint))?;
            }
        }

        // The primary provider is mandatory
        let youdao = self
            .get_provider_config(ProviderTag::Youdao)
            .ok_or_else(|| anyhow!("A youdao provider entry is required"))?;
        if !youdao.enabled {
            return Err(anyhow!("The youdao provider cannot be disabled"));
        }
        if !youdao.has_credentials() {
            return Err(anyhow!("Youdao app_key and app_secret are required"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            language1: default_language1(),
            language2: default_language2(),
            delay_fetch_ms: default_delay_fetch_ms(),
            retry: RetryConfig::default(),
            enrichment_timeout_ms: default_enrichment_timeout_ms(),
            clipboard_query_window_ms: default_clipboard_query_window_ms(),
            help_url: default_help_url(),
            log_level: LogLevel::default(),
            available_providers: default_available_providers(),
        }
    }
}
