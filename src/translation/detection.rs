/*!
 * Local source-language heuristic.
 *
 * A cheap pre-filter run before the first primary request. It only ever
 * answers with one of the user's preferred languages or `auto`; the
 * provider-backed detector takes over when the primary backend cannot
 * resolve `auto` itself.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language_utils::{LanguageId, LanguagePreferences};

/// Language assumed for text made only of ASCII letters and digits
pub const LATIN_LANGUAGE: &str = "en";

/// Language assumed for text containing CJK ideographs
pub const CHINESE_LANGUAGE: &str = "zh-CHS";

/// General punctuation, supplemental punctuation and ASCII punctuation
static LATIN_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"[\x{2000}-\x{206F}\x{2E00}-\x{2E7F}\\'!"#$%&()*+,\-./:;<=>?@\[\]^_`{|}~]"##).unwrap()
});

/// Full-width CJK punctuation
static CJK_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[。？！，、；：“”‘’（）《》〈〉【】『』「」﹃﹄〔〕…—～﹏￥]").unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

static LATIN_OR_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

static CJK_IDEOGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{4E00}-\x{9FA5}]").unwrap());

/// Remove both punctuation lists from text
pub fn remove_punctuation(text: &str) -> String {
    let without_cjk = CJK_PUNCTUATION.replace_all(text, "");
    LATIN_PUNCTUATION.replace_all(&without_cjk, "").into_owned()
}

/// Remove every whitespace character
pub fn remove_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, "").into_owned()
}

/// Whether text is only ASCII letters and digits once punctuation and whitespace are gone
pub fn is_latin_or_number(text: &str) -> bool {
    LATIN_OR_NUMBER.is_match(&remove_punctuation(&remove_whitespace(text)))
}

/// Whether text contains at least one CJK unified ideograph
pub fn contains_chinese(text: &str) -> bool {
    CJK_IDEOGRAPH.is_match(text)
}

/// Guess the source language of `text`
///
/// Never fails; returns `auto` whenever the guess would fall outside the
/// user's two preferred languages.
pub fn detect(text: &str, preferences: &LanguagePreferences) -> LanguageId {
    if is_latin_or_number(text) && preferences.contains(LATIN_LANGUAGE) {
        LanguageId::from(LATIN_LANGUAGE)
    } else if contains_chinese(text) && preferences.contains(CHINESE_LANGUAGE) {
        LanguageId::from(CHINESE_LANGUAGE)
    } else {
        LanguageId::auto()
    }
}
