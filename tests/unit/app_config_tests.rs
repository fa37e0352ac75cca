/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;
use tempfile::TempDir;

use wordlens::app_config::{Backoff, Config, LogLevel, MAX_DELAY_FETCH_MS, MIN_DELAY_FETCH_MS};
use wordlens::providers::ProviderTag;

use crate::common::config_with_youdao;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language1, "en");
    assert_eq!(config.language2, "zh-CHS");
    assert_eq!(config.delay_fetch_ms, 400);
    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.backoff, Backoff::Exponential);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.available_providers.len(), 4);

    let tencent = config
        .get_provider_config(ProviderTag::Tencent)
        .expect("Tencent provider config should exist");
    assert_eq!(tencent.region.as_deref(), Some("ap-guangzhou"));
    assert_eq!(tencent.timeout_secs, 10);
}

#[test]
fn test_validate_withoutYoudaoCredentials_shouldFail() {
    assert!(Config::default().validate().is_err());
    assert!(config_with_youdao().validate().is_ok());
}

#[test]
fn test_validate_withInvalidLanguages_shouldFail() {
    let mut config = config_with_youdao();
    config.language1 = "xyz".to_string();
    assert!(config.validate().is_err());

    let mut config = config_with_youdao();
    config.language2 = "auto".to_string();
    assert!(config.validate().is_err());

    let mut config = config_with_youdao();
    config.language2 = "en".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadEndpointOrType_shouldFail() {
    let mut config = config_with_youdao();
    config.available_providers[1].endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = config_with_youdao();
    config.available_providers[2].provider_type = "deepl".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withDisabledYoudao_shouldFail() {
    let mut config = config_with_youdao();
    config.available_providers[0].enabled = false;
    assert!(config.validate().is_err());
}

#[test]
fn test_effective_delay_withOutOfRangeValues_shouldClamp() {
    let mut config = Config::default();

    config.delay_fetch_ms = 1;
    assert_eq!(config.effective_delay(), Duration::from_millis(MIN_DELAY_FETCH_MS));

    config.delay_fetch_ms = 10_000;
    assert_eq!(config.effective_delay(), Duration::from_millis(MAX_DELAY_FETCH_MS));

    config.delay_fetch_ms = 300;
    assert_eq!(config.effective_delay(), Duration::from_millis(300));
}

#[test]
fn test_get_active_provider_config_withoutCredentials_shouldSkip() {
    let mut config = config_with_youdao();
    assert!(config.get_active_provider_config(ProviderTag::Youdao).is_some());
    assert!(config.get_active_provider_config(ProviderTag::Baidu).is_none());

    // Caiyun only needs a token
    let caiyun = config
        .available_providers
        .iter_mut()
        .find(|p| p.provider_type == "caiyun")
        .expect("caiyun entry");
    caiyun.app_key = "token".to_string();
    assert!(config.get_active_provider_config(ProviderTag::Caiyun).is_some());
}

#[test]
fn test_save_and_from_file_withTempFile_shouldPreserveValues() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = config_with_youdao();
    config.language2 = "ja".to_string();
    config.retry.backoff = Backoff::Fixed;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.language2, "ja");
    assert_eq!(loaded.retry.backoff, Backoff::Fixed);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_from_file_withSparseJson_shouldFillDefaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{"available_providers": [{"type": "youdao", "app_key": "k", "app_secret": "s"}]}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.language1, "en");
    assert_eq!(config.enrichment_timeout_ms, 5000);
    assert!(config.available_providers[0].enabled);
    assert_eq!(config.available_providers[0].timeout_secs, 10);
    assert!(config.validate().is_ok());
}

#[test]
fn test_logLevel_fromJson_shouldMapToFilter() {
    let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();

    assert_eq!(level.level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::default().level_filter(), log::LevelFilter::Info);
}
