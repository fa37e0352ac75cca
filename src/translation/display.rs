/*!
 * Expand a `TranslateFormatResult` into ordered display sections.
 *
 * Without dictionary details every translation line becomes its own section
 * titled by its provider. With details, only the primary line is kept under
 * "Translation" and the details follow in a fixed order: explanations, word
 * forms, web translation, web phrases. Only the first emitted detail section
 * carries the "Details" title.
 */

use std::collections::HashSet;

use crate::translation::model::{DisplayItem, SectionKind, TranslateDisplayResult, TranslateFormatResult};

/// Title of the first detail section
pub const DETAILS_TITLE: &str = "Details";

/// Separator between the values of a web entry
const WEB_VALUE_SEPARATOR: &str = "；";

/// Separator between word forms inside the brackets
const FORM_SEPARATOR: &str = "   ";

/// Hands out item keys, suffixing duplicates so every key stays unique
#[derive(Default)]
struct KeySet {
    used: HashSet<String>,
}

impl KeySet {
    fn claim(&mut self, base: String) -> String {
        let mut key = base.clone();
        let mut n = 1;
        while !self.used.insert(key.clone()) {
            key = format!("{}#{}", base, n);
            n += 1;
        }
        key
    }
}

/// Emits detail sections, titling only the first one
struct DetailSections<'a> {
    sections: &'a mut Vec<TranslateDisplayResult>,
    titled: bool,
}

impl DetailSections<'_> {
    fn push(&mut self, kind: SectionKind, item: DisplayItem) {
        let section_title = if self.titled { None } else { Some(DETAILS_TITLE.to_string()) };
        self.titled = true;
        self.sections.push(TranslateDisplayResult {
            section_kind: kind,
            section_title,
            items: vec![item],
        });
    }
}

fn one_line(text: &str) -> String {
    text.split('\n').collect()
}

/// Full display: every provider line, or the primary line plus all details
pub fn sectionize(format: &TranslateFormatResult) -> Vec<TranslateDisplayResult> {
    build(format, false)
}

/// Compact display: like `sectionize` but without the enrichment lines
pub fn sectionize_compact(format: &TranslateFormatResult) -> Vec<TranslateDisplayResult> {
    build(format, true)
}

fn build(format: &TranslateFormatResult, compact: bool) -> Vec<TranslateDisplayResult> {
    let mut sections = Vec::new();
    let mut keys = KeySet::default();
    let multiple = !format.has_details();
    let single = format.translations.len() == 1 || compact;

    for (i, translation) in format.translations.iter().enumerate() {
        let title = one_line(&translation.text);
        let (kind, tooltip) = if multiple && !single {
            (SectionKind::Provider(translation.provider), String::new())
        } else if multiple {
            (SectionKind::Translation, String::new())
        } else {
            (SectionKind::Translation, translation.provider.display_name().to_string())
        };

        sections.push(TranslateDisplayResult {
            section_kind: kind,
            section_title: Some(kind.label().to_string()),
            items: vec![DisplayItem {
                key: keys.claim(format!("{}{}", title, i)),
                copy_text: title.clone(),
                title,
                subtitle: None,
                tooltip,
                phonetic: format.query_word_info.phonetic.clone(),
                exam_types: format.query_word_info.exam_types.clone(),
            }],
        });

        if !multiple || compact {
            break;
        }
    }

    let mut details = DetailSections {
        sections: &mut sections,
        titled: false,
    };

    for (i, explanation) in format.explanations.iter().flatten().enumerate() {
        details.push(
            SectionKind::Explanations,
            DisplayItem {
                key: keys.claim(format!("{}{}", explanation, i)),
                title: explanation.clone(),
                subtitle: None,
                tooltip: SectionKind::Explanations.label().to_string(),
                copy_text: explanation.clone(),
                phonetic: None,
                exam_types: None,
            },
        );
    }

    // [ 复数 goods   比较级 better   最高级 best ]
    let forms_text = format
        .forms
        .iter()
        .flatten()
        .map(|form| format!("{} {}", form.name, form.value))
        .collect::<Vec<_>>()
        .join(FORM_SEPARATOR);
    if !forms_text.is_empty() {
        details.push(
            SectionKind::Forms,
            DisplayItem {
                key: keys.claim(forms_text.clone()),
                title: String::new(),
                subtitle: Some(format!("[ {} ]", forms_text)),
                tooltip: SectionKind::Forms.label().to_string(),
                copy_text: forms_text,
                phonetic: None,
                exam_types: None,
            },
        );
    }

    if let Some(web) = &format.web_translation {
        let value = web.value.join(WEB_VALUE_SEPARATOR);
        details.push(
            SectionKind::WebTranslation,
            DisplayItem {
                key: keys.claim(web.key.clone()),
                title: web.key.clone(),
                copy_text: format!("{} {}", web.key, value),
                subtitle: Some(value),
                tooltip: SectionKind::WebTranslation.label().to_string(),
                phonetic: None,
                exam_types: None,
            },
        );
    }

    for (i, phrase) in format.web_phrases.iter().flatten().enumerate() {
        let value = phrase.value.join(WEB_VALUE_SEPARATOR);
        details.push(
            SectionKind::WebPhrase,
            DisplayItem {
                key: keys.claim(format!("{}{}", phrase.key, i)),
                title: phrase.key.clone(),
                copy_text: format!("{} {}", phrase.key, value),
                subtitle: Some(value),
                tooltip: SectionKind::WebPhrase.label().to_string(),
                phonetic: None,
                exam_types: None,
            },
        );
    }

    sections
}
