/*!
 * Domain model shared by the orchestrator, normalizer and sectioner.
 *
 * `TranslateFormatResult` is the provider-agnostic merge point every backend
 * feeds into; `TranslateDisplayResult` is the presentation-ready expansion of it.
 */

use serde::{Deserialize, Serialize};

use crate::language_utils::LanguageId;
use crate::providers::ProviderTag;

/// The word being looked up and the language pair used for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWordInfo {
    pub word: String,
    pub from_language: LanguageId,
    pub to_language: LanguageId,
    /// Phonetic transcription, when the dictionary knows the word
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_word: Option<bool>,
    /// Exams the word belongs to (e.g. "CET4", "IELTS")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_types: Option<Vec<String>>,
}

impl QueryWordInfo {
    pub fn new(word: impl Into<String>, from_language: impl Into<LanguageId>, to_language: impl Into<LanguageId>) -> Self {
        Self {
            word: word.into(),
            from_language: from_language.into(),
            to_language: to_language.into(),
            phonetic: None,
            is_word: None,
            exam_types: None,
        }
    }

    /// `(from, to)` as a pair of borrowed ids
    pub fn pair(&self) -> (&LanguageId, &LanguageId) {
        (&self.from_language, &self.to_language)
    }
}

/// One translation line contributed by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateItem {
    pub provider: ProviderTag,
    pub text: String,
}

/// A word form such as plural or past tense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordForm {
    pub name: String,
    pub value: String,
}

/// A web dictionary entry: a phrase and its translations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebEntry {
    pub key: String,
    pub value: Vec<String>,
}

/// Canonical, provider-agnostic lookup result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateFormatResult {
    pub query_word_info: QueryWordInfo,
    /// Primary candidates first, then one line per successful enrichment provider
    pub translations: Vec<TranslateItem>,
    pub explanations: Option<Vec<String>>,
    pub forms: Option<Vec<WordForm>>,
    pub web_translation: Option<WebEntry>,
    pub web_phrases: Option<Vec<WebEntry>>,
}

impl TranslateFormatResult {
    /// Whether any dictionary detail is present
    pub fn has_details(&self) -> bool {
        self.explanations.is_some()
            || self.forms.is_some()
            || self.web_translation.is_some()
            || self.web_phrases.is_some()
    }
}

/// Kind of a display section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Translation,
    /// A single provider's line when no dictionary details exist
    Provider(ProviderTag),
    Explanations,
    Forms,
    WebTranslation,
    WebPhrase,
}

impl SectionKind {
    /// Label used as tooltip and default title
    pub fn label(&self) -> &'static str {
        match self {
            Self::Translation => "Translation",
            Self::Provider(tag) => tag.display_name(),
            Self::Explanations => "Explanations",
            Self::Forms => "Forms and Tenses",
            Self::WebTranslation => "Web Translation",
            Self::WebPhrase => "Web Phrase",
        }
    }
}

/// One selectable row of the display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Unique within one display result
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub tooltip: String,
    pub copy_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_types: Option<Vec<String>>,
}

/// A titled group of display items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateDisplayResult {
    pub section_kind: SectionKind,
    pub section_title: Option<String>,
    pub items: Vec<DisplayItem>,
}
