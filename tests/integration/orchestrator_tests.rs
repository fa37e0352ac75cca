/*!
 * Integration tests for the lookup orchestrator using mock providers
 */

use std::sync::Arc;

use wordlens::errors::{ErrorKind, LookupError};
use wordlens::language_utils::LanguageId;
use wordlens::providers::ProviderTag;
use wordlens::providers::mock::{MockProvider, MockReply};
use wordlens::translation::{Orchestrator, OrchestratorState};

use crate::common::{MockSet, en_zh, fast_retry};

fn zh() -> LanguageId {
    LanguageId::from("zh-CHS")
}

fn en() -> LanguageId {
    LanguageId::from("en")
}

#[tokio::test]
async fn test_lookup_withHealthyProviders_shouldMergeEveryLineInPriorityOrder() {
    let mocks = MockSet::new();
    let lookup = mocks.orchestrator().lookup("hello", Some(&zh())).await.unwrap();

    assert_eq!(lookup.attempts.len(), 1);
    assert_eq!(lookup.attempts[0].pair(), (&en(), &zh()));

    let providers: Vec<_> = lookup.format.translations.iter().map(|t| t.provider).collect();
    assert_eq!(
        providers,
        vec![ProviderTag::Youdao, ProviderTag::Baidu, ProviderTag::Tencent, ProviderTag::Caiyun]
    );
    assert_eq!(lookup.format.translations[0].text, "[zh-CHS] hello");
    assert!(lookup.enrichment_errors.is_empty());
    assert!(lookup.detection.is_none());

    assert_eq!(
        lookup.transitions,
        vec![
            OrchestratorState::Idle,
            OrchestratorState::Detecting,
            OrchestratorState::Translating { from: en(), to: zh() },
            OrchestratorState::Done,
        ]
    );

    // Enrichment follows the pair the primary reported
    let baidu_requests = mocks.baidu.requests();
    assert_eq!(baidu_requests.len(), 1);
    assert_eq!(baidu_requests[0].pair(), (&en(), &zh()));
}

#[tokio::test]
async fn test_lookup_withTextAlreadyInTarget_shouldFlipToOtherPreference() {
    let mocks = MockSet::new();
    let lookup = mocks.orchestrator().lookup("hello", None).await.unwrap();

    assert_eq!(lookup.attempts.len(), 2);
    assert_eq!(lookup.attempts[0].pair(), (&en(), &en()));
    assert_eq!(lookup.attempts[1].pair(), (&en(), &zh()));
    assert_eq!(lookup.format.query_word_info.to_language, zh());
    assert_eq!(mocks.youdao.calls(), 2);
}

#[tokio::test]
async fn test_lookup_withAutoResolvedToTarget_shouldReissueExplicitPair() {
    let mocks = MockSet::new();
    let lookup = mocks
        .orchestrator()
        .lookup_with_pair("hello", LanguageId::auto(), en())
        .await
        .unwrap();

    assert_eq!(lookup.attempts.len(), 2);
    assert!(lookup.attempts[0].from_language.is_auto());
    assert_eq!(lookup.attempts[1].pair(), (&en(), &zh()));
}

#[tokio::test]
async fn test_lookup_withPersistentSameLanguage_shouldAcceptAfterOneFlip() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao)
        .with_reply(MockReply::pair("en", "en", "hello"))
        .with_reply(MockReply::pair("en", "en", "hello"))
        .with_reply(MockReply::pair("en", "en", "hello"));

    let lookup = mocks.orchestrator().lookup("hello", None).await.unwrap();

    assert_eq!(mocks.youdao.calls(), 2);
    assert_eq!(lookup.format.translations[0].text, "hello");
}

#[tokio::test]
async fn test_lookup_withAcceptedPingPong_shouldEnrichWithLastRequestedPair() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao)
        .with_reply(MockReply::pair("en", "en", "hello"))
        .with_reply(MockReply::pair("en", "en", "hello"));

    mocks.orchestrator().lookup("hello", None).await.unwrap();

    let baidu_requests = mocks.baidu.requests();
    assert_eq!(baidu_requests.len(), 1);
    assert_eq!(baidu_requests[0].pair(), (&en(), &zh()));
    assert_eq!(mocks.tencent.requests()[0].pair(), (&en(), &zh()));
}

#[tokio::test]
async fn test_lookupWithPair_withAutoTarget_shouldFailWithoutRequests() {
    let mocks = MockSet::new();

    let err = mocks
        .orchestrator()
        .lookup_with_pair("hello", en(), LanguageId::auto())
        .await
        .unwrap_err();

    match &err {
        LookupError::Provider(info) => {
            assert_eq!(info.kind, ErrorKind::UnsupportedLanguage);
            assert_eq!(info.provider, ProviderTag::Youdao);
        }
        other => panic!("Expected unsupported language, got {:?}", other),
    }
    assert_eq!(mocks.youdao.calls(), 0);
    assert_eq!(mocks.baidu.calls(), 0);
}

#[tokio::test]
async fn test_lookup_withOneRetryableError_shouldRetryAndSucceed() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao).with_reply(MockReply::error(ProviderTag::Youdao, "207"));

    let lookup = mocks.orchestrator().lookup("hello", Some(&zh())).await.unwrap();

    assert_eq!(mocks.youdao.calls(), 2);
    assert_eq!(lookup.attempts.len(), 2);
    assert!(lookup.transitions.contains(&OrchestratorState::Retrying {
        reason: "207".to_string(),
        retry: 1,
    }));
}

#[tokio::test]
async fn test_lookup_withRetryableErrorsOnly_shouldStopAfterMaxRetries() {
    let mut mocks = MockSet::new();
    let mut youdao = MockProvider::new(ProviderTag::Youdao);
    for _ in 0..10 {
        youdao = youdao.with_reply(MockReply::error(ProviderTag::Youdao, "207"));
    }
    mocks.youdao = youdao;

    let error = mocks.orchestrator().lookup("hello", Some(&zh())).await.unwrap_err();

    match &error {
        LookupError::RetriesExhausted { attempts, last } => {
            assert_eq!(*attempts, 4);
            assert_eq!(last.code, "207");
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
    assert_eq!(error.code(), "207");
    assert_eq!(mocks.youdao.calls(), 4);
    assert_eq!(mocks.baidu.calls(), 0);
}

#[tokio::test]
async fn test_lookup_withNonRetryableError_shouldFailWithoutEnrichment() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao).with_reply(MockReply::error(ProviderTag::Youdao, "108"));

    let error = mocks.orchestrator().lookup("hello", Some(&zh())).await.unwrap_err();

    assert!(matches!(error, LookupError::Provider(_)));
    assert_eq!(error.code(), "108");
    assert_eq!(mocks.youdao.calls(), 1);
    assert_eq!(mocks.baidu.calls(), 0);
    assert_eq!(mocks.tencent.calls(), 0);
}

#[tokio::test]
async fn test_lookup_withSlowAndFailingEnrichment_shouldOmitThoseLines() {
    let mut mocks = MockSet::new();
    mocks.tencent = MockProvider::new(ProviderTag::Tencent).with_delay(1_000);
    mocks.baidu = MockProvider::new(ProviderTag::Baidu).with_reply(MockReply::error(ProviderTag::Baidu, "54003"));

    let lookup = mocks.orchestrator().lookup("hello", Some(&zh())).await.unwrap();

    let providers: Vec<_> = lookup.format.translations.iter().map(|t| t.provider).collect();
    assert_eq!(providers, vec![ProviderTag::Youdao, ProviderTag::Caiyun]);

    assert_eq!(lookup.enrichment_errors.len(), 2);
    let timeout = lookup
        .enrichment_errors
        .iter()
        .find(|e| e.provider == ProviderTag::Tencent)
        .unwrap();
    assert_eq!(timeout.kind, ErrorKind::Timeout);
    assert_eq!(timeout.code, "timeout");
    assert!(lookup.enrichment_errors.iter().any(|e| e.code == "54003"));
}

#[tokio::test]
async fn test_lookup_withoutEnrichmentProviders_shouldReturnPrimaryOnly() {
    let youdao = MockProvider::new(ProviderTag::Youdao);
    let orchestrator = Orchestrator::new(Arc::new(youdao), en_zh()).with_retry_policy(fast_retry(0));

    let lookup = orchestrator.lookup("你好", None).await.unwrap();

    assert_eq!(lookup.format.translations.len(), 1);
    assert_eq!(lookup.attempts[0].pair(), (&zh(), &en()));
}

#[tokio::test]
async fn test_lookup_withUnsupportedAuto_shouldFallBackToRemoteDetection() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao).with_reply(MockReply::error(ProviderTag::Youdao, "102"));
    mocks.baidu = MockProvider::new(ProviderTag::Baidu).detects_as(Some("fr"), true);

    let lookup = mocks
        .orchestrator()
        .lookup_with_pair("bonjour", LanguageId::auto(), zh())
        .await
        .unwrap();

    assert_eq!(mocks.baidu.detect_calls(), 1);
    assert_eq!(lookup.attempts.len(), 2);
    assert_eq!(lookup.attempts[1].pair(), (&LanguageId::from("fr"), &zh()));
    let detection = lookup.detection.unwrap();
    assert_eq!(detection.provider, ProviderTag::Baidu);
    assert!(detection.confirmed);
}

#[tokio::test]
async fn test_lookup_withUnconfirmedDetection_shouldStillUseIt() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao).with_reply(MockReply::error(ProviderTag::Youdao, "102"));
    mocks.baidu = MockProvider::new(ProviderTag::Baidu).detects_as(Some("de"), false);

    let lookup = mocks
        .orchestrator()
        .lookup_with_pair("hallo welt", LanguageId::auto(), zh())
        .await
        .unwrap();

    assert_eq!(lookup.attempts[1].from_language, LanguageId::from("de"));
    assert!(!lookup.detection.unwrap().confirmed);
}

#[tokio::test]
async fn test_lookup_withUnknownDetection_shouldSurfaceOriginalError() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao).with_reply(MockReply::error(ProviderTag::Youdao, "102"));
    mocks.baidu = MockProvider::new(ProviderTag::Baidu).detects_as(None, false);

    let error = mocks
        .orchestrator()
        .lookup_with_pair("???", LanguageId::auto(), zh())
        .await
        .unwrap_err();

    assert_eq!(error.code(), "102");
    assert_eq!(mocks.youdao.calls(), 1);
}

#[tokio::test]
async fn test_lookup_withExplicitSourceAndAmbiguityError_shouldNotDetect() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao).with_reply(MockReply::error(ProviderTag::Youdao, "102"));

    let error = mocks
        .orchestrator()
        .lookup_with_pair("hello", en(), zh())
        .await
        .unwrap_err();

    assert_eq!(error.code(), "102");
    assert_eq!(mocks.baidu.detect_calls(), 0);
}

#[tokio::test]
async fn test_lookup_withDetectorAnsweringAuto_shouldNotRetryTranslation() {
    let mut mocks = MockSet::new();
    mocks.youdao = MockProvider::new(ProviderTag::Youdao).with_reply(MockReply::error(ProviderTag::Youdao, "102"));
    mocks.baidu = MockProvider::new(ProviderTag::Baidu).detects_as(Some("auto"), true);

    let error = mocks
        .orchestrator()
        .lookup_with_pair("x", LanguageId::auto(), zh())
        .await
        .unwrap_err();

    assert_eq!(error.code(), "102");
    assert_eq!(mocks.baidu.detect_calls(), 1);
    assert_eq!(mocks.youdao.calls(), 1);
}
