/*!
 * Merge provider results into one `TranslateFormatResult`.
 */

use log::debug;

use crate::providers::{ProviderPayload, ProviderResult};
use crate::providers::youdao::YoudaoResult;
use crate::translation::model::{QueryWordInfo, TranslateFormatResult, TranslateItem, WebEntry, WordForm};

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

/// Merge the primary result with whichever enrichment results arrived
///
/// The primary's candidates come first in their own order, then one line per
/// successful enrichment provider sorted by provider priority, regardless of
/// the order the slice is in. Dictionary details come from the primary only.
pub fn normalize(primary: &ProviderResult, enrichment: &[Option<ProviderResult>]) -> TranslateFormatResult {
    let mut translations: Vec<TranslateItem> = primary
        .translations
        .iter()
        .map(|text| TranslateItem {
            provider: primary.tag(),
            text: text.clone(),
        })
        .collect();

    let mut extra: Vec<&ProviderResult> = enrichment.iter().flatten().collect();
    extra.sort_by_key(|result| result.tag().priority());
    for result in extra {
        let text = result.joined_text();
        if text.trim().is_empty() {
            debug!("Skipping empty {} line", result.tag());
            continue;
        }
        translations.push(TranslateItem {
            provider: result.tag(),
            text,
        });
    }

    let (from_language, to_language) = primary.reported_languages();

    let mut format = TranslateFormatResult {
        query_word_info: QueryWordInfo::new(primary.query.word.clone(), from_language, to_language),
        translations,
        explanations: None,
        forms: None,
        web_translation: None,
        web_phrases: None,
    };

    if let ProviderPayload::Youdao(youdao) = &primary.payload {
        apply_dictionary(&mut format, youdao);
    }

    format
}

/// Copy phonetic, word forms, explanations and web entries from a Youdao payload
fn apply_dictionary(format: &mut TranslateFormatResult, youdao: &YoudaoResult) {
    format.query_word_info.is_word = youdao.is_word;

    if let Some(basic) = &youdao.basic {
        format.query_word_info.phonetic = basic.phonetic.clone();
        format.query_word_info.exam_types = basic.exam_type.clone().and_then(non_empty);
        format.explanations = basic.explains.clone().and_then(non_empty);
        format.forms = basic.wfs.as_ref().and_then(|wfs| {
            non_empty(
                wfs.iter()
                    .filter_map(|item| item.wf.as_ref())
                    .map(|wf| WordForm {
                        name: wf.name.clone(),
                        value: wf.value.clone(),
                    })
                    .collect(),
            )
        });
    }

    let mut web = youdao
        .web
        .iter()
        .flatten()
        .map(|entry| WebEntry {
            key: entry.key.clone(),
            value: entry.value.clone(),
        });
    format.web_translation = web.next();
    format.web_phrases = non_empty(web.collect());
}
