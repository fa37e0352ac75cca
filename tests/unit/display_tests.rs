/*!
 * Tests for merging provider results and laying them out for display
 */

use wordlens::providers::youdao::YoudaoResult;
use wordlens::providers::{ProviderPayload, ProviderResult, ProviderTag};
use wordlens::providers::mock::MockProvider;
use wordlens::translation::display::DETAILS_TITLE;
use wordlens::translation::{QueryWordInfo, SectionKind, normalize, sectionize, sectionize_compact};

const YOUDAO_GOOD: &str = r#"{
    "errorCode": "0",
    "query": "good",
    "translation": ["好"],
    "l": "en2zh-CHS",
    "isWord": true,
    "basic": {
        "phonetic": "ɡʊd",
        "exam_type": ["CET4", "CET6"],
        "explains": ["adj. 好的；优秀的", "n. 好处；善行"],
        "wfs": [
            {"wf": {"name": "比较级", "value": "better"}},
            {"wf": {"name": "最高级", "value": "best"}}
        ]
    },
    "web": [
        {"key": "good", "value": ["好", "善", "商品"]},
        {"key": "Good Friday", "value": ["耶稣受难日"]}
    ]
}"#;

fn youdao_good() -> ProviderResult {
    let payload: YoudaoResult = serde_json::from_str(YOUDAO_GOOD).unwrap();
    ProviderResult {
        query: QueryWordInfo::new("good", "auto", "zh-CHS"),
        translations: payload.translation.clone(),
        payload: ProviderPayload::Youdao(payload),
    }
}

fn enrichment(tag: ProviderTag, text: &str) -> ProviderResult {
    let query = QueryWordInfo::new("good", "en", "zh-CHS");
    let translations = vec![text.to_string()];
    ProviderResult {
        payload: MockProvider::payload_for(tag, &query, &query.from_language, &query.to_language, &translations),
        query,
        translations,
    }
}

#[test]
fn test_normalize_withYoudaoDictionary_shouldCarryDetails() {
    let format = normalize(&youdao_good(), &[]);

    assert_eq!(format.query_word_info.from_language, "en");
    assert_eq!(format.query_word_info.to_language, "zh-CHS");
    assert_eq!(format.query_word_info.phonetic.as_deref(), Some("ɡʊd"));
    assert_eq!(format.query_word_info.is_word, Some(true));
    assert_eq!(format.explanations.as_ref().map(Vec::len), Some(2));
    assert_eq!(format.forms.as_ref().map(Vec::len), Some(2));
    assert_eq!(format.web_translation.as_ref().map(|w| w.key.as_str()), Some("good"));
    assert_eq!(format.web_phrases.as_ref().map(Vec::len), Some(1));
    assert!(format.has_details());
}

#[test]
fn test_normalize_withEnrichmentOutOfOrder_shouldSortByPriorityAndSkipGaps() {
    let results = vec![
        Some(enrichment(ProviderTag::Caiyun, "好的")),
        None,
        Some(enrichment(ProviderTag::Baidu, "好")),
    ];
    let format = normalize(&youdao_good(), &results);

    let providers: Vec<_> = format.translations.iter().map(|t| t.provider).collect();
    assert_eq!(providers, vec![ProviderTag::Youdao, ProviderTag::Baidu, ProviderTag::Caiyun]);
}

#[test]
fn test_sectionize_withDetails_shouldKeepPrimaryLineAndDetailOrder() {
    let format = normalize(&youdao_good(), &[Some(enrichment(ProviderTag::Baidu, "好"))]);
    let sections = sectionize(&format);

    let kinds: Vec<_> = sections.iter().map(|s| s.section_kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Translation,
            SectionKind::Explanations,
            SectionKind::Explanations,
            SectionKind::Forms,
            SectionKind::WebTranslation,
            SectionKind::WebPhrase,
        ]
    );

    let primary = &sections[0].items[0];
    assert_eq!(primary.title, "好");
    assert_eq!(primary.tooltip, "Youdao");
    assert_eq!(primary.phonetic.as_deref(), Some("ɡʊd"));
    assert_eq!(primary.exam_types.as_ref().map(Vec::len), Some(2));

    assert_eq!(sections[1].section_title.as_deref(), Some(DETAILS_TITLE));
    assert!(sections[2..].iter().all(|s| s.section_title.is_none()));
    assert_eq!(sections[3].items[0].subtitle.as_deref(), Some("[ 比较级 better   最高级 best ]"));
    assert_eq!(sections[4].items[0].subtitle.as_deref(), Some("好；善；商品"));
}

#[test]
fn test_sectionize_withoutDetails_shouldListEveryProvider() {
    let mut primary = youdao_good();
    if let ProviderPayload::Youdao(payload) = &mut primary.payload {
        payload.basic = None;
        payload.web = None;
    }
    let results = vec![
        Some(enrichment(ProviderTag::Baidu, "好")),
        Some(enrichment(ProviderTag::Tencent, "良好")),
    ];
    let format = normalize(&primary, &results);
    assert!(!format.has_details());

    let sections = sectionize(&format);
    let kinds: Vec<_> = sections.iter().map(|s| s.section_kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Provider(ProviderTag::Youdao),
            SectionKind::Provider(ProviderTag::Baidu),
            SectionKind::Provider(ProviderTag::Tencent),
        ]
    );

    let compact = sectionize_compact(&format);
    assert_eq!(compact.len(), 1);
    assert_eq!(compact[0].section_kind, SectionKind::Translation);
}
