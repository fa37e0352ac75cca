/*!
 * Language utilities for the canonical language vocabulary.
 *
 * The canonical ids are the Youdao ids (`"zh-CHS"`, `"en"`, ...). Every other
 * provider owns a column in `LANGUAGES` mapping canonical ids to its own codes.
 */

use std::fmt;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::errors::RequestErrorInfo;
use crate::providers::ProviderTag;

/// Canonical language id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(String);

impl LanguageId {
    /// The "detect automatically" id; valid only as a source language
    pub const AUTO: &'static str = "auto";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn auto() -> Self {
        Self(Self::AUTO.to_string())
    }

    pub fn is_auto(&self) -> bool {
        self.0 == Self::AUTO
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LanguageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for LanguageId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One row of the language table
#[derive(Debug, Clone, Copy)]
pub struct LanguageItem {
    /// Canonical (and Youdao) id
    pub id: &'static str,
    /// English display name
    pub name: &'static str,
    pub baidu: Option<&'static str>,
    pub tencent: Option<&'static str>,
    pub caiyun: Option<&'static str>,
}

const fn item(
    id: &'static str,
    name: &'static str,
    baidu: Option<&'static str>,
    tencent: Option<&'static str>,
    caiyun: Option<&'static str>,
) -> LanguageItem {
    LanguageItem { id, name, baidu, tencent, caiyun }
}

/// Supported languages. Order is the display order of `wordlens languages`.
pub const LANGUAGES: &[LanguageItem] = &[
    item("auto", "Auto Detect", Some("auto"), Some("auto"), Some("auto")),
    item("zh-CHS", "Chinese Simplified", Some("zh"), Some("zh"), Some("zh")),
    item("zh-CHT", "Chinese Traditional", Some("cht"), Some("zh-TW"), None),
    item("en", "English", Some("en"), Some("en"), Some("en")),
    item("ja", "Japanese", Some("jp"), Some("ja"), Some("ja")),
    item("ko", "Korean", Some("kor"), Some("ko"), None),
    item("fr", "French", Some("fra"), Some("fr"), None),
    item("es", "Spanish", Some("spa"), Some("es"), None),
    item("pt", "Portuguese", Some("pt"), Some("pt"), None),
    item("it", "Italian", Some("it"), Some("it"), None),
    item("de", "German", Some("de"), Some("de"), None),
    item("ru", "Russian", Some("ru"), Some("ru"), None),
    item("ar", "Arabic", Some("ara"), Some("ar"), None),
    item("sv", "Swedish", Some("swe"), None, None),
    item("nl", "Dutch", Some("nl"), None, None),
    item("ro", "Romanian", Some("rom"), None, None),
    item("th", "Thai", Some("th"), Some("th"), None),
    item("sk", "Slovak", Some("slo"), None, None),
    item("hu", "Hungarian", Some("hu"), None, None),
    item("el", "Greek", Some("el"), None, None),
    item("da", "Danish", Some("dan"), None, None),
    item("fi", "Finnish", Some("fin"), None, None),
    item("pl", "Polish", Some("pl"), None, None),
    item("cs", "Czech", Some("cs"), None, None),
    item("tr", "Turkish", Some("tr"), Some("tr"), None),
    item("uk", "Ukrainian", Some("ukr"), None, None),
    item("bg", "Bulgarian", Some("bul"), None, None),
    item("id", "Indonesian", Some("id"), Some("id"), None),
    item("ms", "Malay", Some("may"), Some("ms"), None),
    item("vi", "Vietnamese", Some("vie"), Some("vi"), None),
    item("hi", "Hindi", Some("hi"), Some("hi"), None),
    item("fa", "Persian", Some("per"), None, None),
];

/// Find the table row for a canonical id
pub fn find_language(id: &str) -> Option<&'static LanguageItem> {
    LANGUAGES.iter().find(|item| item.id == id)
}

/// Check if an id is part of the canonical vocabulary
pub fn is_valid_language_id(id: &str) -> bool {
    find_language(id).is_some()
}

/// Get the language name from a canonical id
pub fn language_name(id: &str) -> Result<&'static str> {
    find_language(id)
        .map(|item| item.name)
        .ok_or_else(|| anyhow!("Unknown language id: {}", id))
}

fn column(item: &LanguageItem, provider: ProviderTag) -> Option<&'static str> {
    match provider {
        ProviderTag::Youdao => Some(item.id),
        ProviderTag::Baidu => item.baidu,
        ProviderTag::Tencent => item.tencent,
        ProviderTag::Caiyun => item.caiyun,
    }
}

/// Map a canonical id to the provider's own code
pub fn provider_code(provider: ProviderTag, id: &LanguageId) -> Result<&'static str, RequestErrorInfo> {
    find_language(id.as_str())
        .and_then(|item| column(item, provider))
        .ok_or_else(|| RequestErrorInfo::unsupported_language(provider, id.as_str()))
}

/// Map a provider's code back to the canonical id
pub fn from_provider_code(provider: ProviderTag, code: &str) -> Option<LanguageId> {
    LANGUAGES
        .iter()
        .find(|item| column(item, provider) == Some(code))
        .map(|item| LanguageId::from(item.id))
}

/// The user's two preferred languages
///
/// The first is the default translation target; lookups bounce between the
/// two when the text is already written in the current target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreferences {
    pub language1: LanguageId,
    pub language2: LanguageId,
}

impl LanguagePreferences {
    pub fn new(language1: impl Into<LanguageId>, language2: impl Into<LanguageId>) -> Self {
        Self {
            language1: language1.into(),
            language2: language2.into(),
        }
    }

    /// Whether `id` is one of the two preferences
    pub fn contains(&self, id: &str) -> bool {
        self.language1 == id || self.language2 == id
    }

    /// The preference that is not `id`; `language1` when `id` is neither
    pub fn other(&self, id: &LanguageId) -> &LanguageId {
        if *id == self.language1 {
            &self.language2
        } else {
            &self.language1
        }
    }

    /// Both preferences must be distinct, known, concrete languages
    pub fn validate(&self) -> Result<()> {
        for id in [&self.language1, &self.language2] {
            if id.is_auto() {
                return Err(anyhow!("'auto' cannot be a preferred language"));
            }
            if !is_valid_language_id(id.as_str()) {
                return Err(anyhow!("Unknown language id: {}", id));
            }
        }
        if self.language1 == self.language2 {
            return Err(anyhow!(
                "Language Conflict: your first language and second language must be different ({})",
                self.language1
            ));
        }
        Ok(())
    }
}
