/*!
 * Tests for the local source-language heuristic
 */

use wordlens::language_utils::{LanguageId, LanguagePreferences};
use wordlens::translation::detect;

use crate::common::en_zh;

#[test]
fn test_detect_withLatinText_shouldReturnEnglish() {
    assert_eq!(detect("good morning!", &en_zh()), LanguageId::from("en"));
    assert_eq!(detect("2024", &en_zh()), LanguageId::from("en"));
}

#[test]
fn test_detect_withChineseText_shouldReturnChinese() {
    assert_eq!(detect("你好，世界", &en_zh()), LanguageId::from("zh-CHS"));
    assert_eq!(detect("hello 世界", &en_zh()), LanguageId::from("zh-CHS"));
}

#[test]
fn test_detect_withOtherScripts_shouldReturnAuto() {
    assert!(detect("こんにちは", &en_zh()).is_auto());
    assert!(detect("Привет", &en_zh()).is_auto());
    assert!(detect("", &en_zh()).is_auto());
}

#[test]
fn test_detect_withoutMatchingPreference_shouldReturnAuto() {
    let preferences = LanguagePreferences::new("ja", "fr");
    assert!(detect("hello", &preferences).is_auto());
    assert!(detect("你好", &preferences).is_auto());
}
