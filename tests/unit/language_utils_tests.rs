/*!
 * Tests for the language table and language preferences
 */

use wordlens::errors::ErrorKind;
use wordlens::language_utils::{
    LANGUAGES, LanguageId, LanguagePreferences, from_provider_code, is_valid_language_id, language_name,
    provider_code,
};
use wordlens::providers::ProviderTag;

#[test]
fn test_language_table_withEveryRow_shouldHaveUniqueIds() {
    let mut ids: Vec<&str> = LANGUAGES.iter().map(|item| item.id).collect();
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), count);
}

#[test]
fn test_language_name_withKnownAndUnknownIds_shouldResolve() {
    assert_eq!(language_name("ja").unwrap(), "Japanese");
    assert_eq!(language_name("zh-CHS").unwrap(), "Chinese Simplified");
    assert!(language_name("klingon").is_err());
    assert!(is_valid_language_id("auto"));
    assert!(!is_valid_language_id("EN"));
}

#[test]
fn test_provider_code_withUnsupportedLanguage_shouldReportUnsupported() {
    let error = provider_code(ProviderTag::Caiyun, &LanguageId::from("fr")).unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnsupportedLanguage);
    assert_eq!(error.provider, ProviderTag::Caiyun);

    assert!(provider_code(ProviderTag::Baidu, &LanguageId::from("xx")).is_err());
}

#[test]
fn test_from_provider_code_withProviderSpecificCodes_shouldMapBack() {
    assert_eq!(from_provider_code(ProviderTag::Baidu, "jp"), Some(LanguageId::from("ja")));
    assert_eq!(from_provider_code(ProviderTag::Baidu, "fra"), Some(LanguageId::from("fr")));
    assert_eq!(from_provider_code(ProviderTag::Tencent, "zh-TW"), Some(LanguageId::from("zh-CHT")));
    assert_eq!(from_provider_code(ProviderTag::Youdao, "zh-CHS"), Some(LanguageId::from("zh-CHS")));
    assert_eq!(from_provider_code(ProviderTag::Tencent, "swe"), None);
}

#[test]
fn test_preferences_other_withEitherLanguage_shouldReturnTheOpposite() {
    let preferences = LanguagePreferences::new("en", "zh-CHS");
    assert_eq!(preferences.other(&LanguageId::from("en")), &LanguageId::from("zh-CHS"));
    assert_eq!(preferences.other(&LanguageId::from("zh-CHS")), &LanguageId::from("en"));
    // Neither preference: fall back to the first
    assert_eq!(preferences.other(&LanguageId::from("fr")), &LanguageId::from("en"));
}

#[test]
fn test_preferences_validate_withConflictsAndUnknownIds_shouldFail() {
    assert!(LanguagePreferences::new("en", "zh-CHS").validate().is_ok());
    assert!(LanguagePreferences::new("en", "en").validate().is_err());
    assert!(LanguagePreferences::new("auto", "en").validate().is_err());
    assert!(LanguagePreferences::new("en", "xx").validate().is_err());
}
