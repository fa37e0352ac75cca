/*!
 * Common test utilities for the wordlens test suite
 */

use std::sync::Arc;
use std::time::Duration;

use wordlens::app_config::{Backoff, Config};
use wordlens::language_utils::LanguagePreferences;
use wordlens::providers::ProviderTag;
use wordlens::providers::mock::MockProvider;
use wordlens::translation::{Orchestrator, RetryPolicy};

/// The default en / zh-CHS preferences
pub fn en_zh() -> LanguagePreferences {
    LanguagePreferences::new("en", "zh-CHS")
}

/// Retry policy short enough for tests
pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::from_millis(5), Backoff::Fixed)
}

/// Mock primary plus the three enrichment mocks, all echoing by default
pub struct MockSet {
    pub youdao: MockProvider,
    pub baidu: MockProvider,
    pub tencent: MockProvider,
    pub caiyun: MockProvider,
}

impl MockSet {
    pub fn new() -> Self {
        Self {
            youdao: MockProvider::new(ProviderTag::Youdao),
            baidu: MockProvider::new(ProviderTag::Baidu),
            tencent: MockProvider::new(ProviderTag::Tencent),
            caiyun: MockProvider::new(ProviderTag::Caiyun),
        }
    }

    /// Orchestrator wired to the mocks; Baidu doubles as detector
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(Arc::new(self.youdao.clone()), en_zh())
            .with_enrichment(vec![
                Arc::new(self.baidu.clone()),
                Arc::new(self.tencent.clone()),
                Arc::new(self.caiyun.clone()),
            ])
            .with_detector(Arc::new(self.baidu.clone()))
            .with_retry_policy(fast_retry(3))
            .with_enrichment_timeout(Duration::from_millis(200))
    }
}

impl Default for MockSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Default config with Youdao credentials filled in
pub fn config_with_youdao() -> Config {
    let mut config = Config::default();
    for provider in &mut config.available_providers {
        if provider.provider_type == "youdao" {
            provider.app_key = "app-key".to_string();
            provider.app_secret = "app-secret".to_string();
        }
    }
    config
}
