/*!
 * Scripted mock provider for testing.
 *
 * A `MockProvider` stands in for any backend tag. Replies are queued with
 * `with_reply` and consumed one per call; once the queue is empty the mock
 * echoes the word back as `"[<to>] <word>"` with the requested pair.
 * Clones share the queue, call counter and request log.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::RequestErrorInfo;
use crate::language_utils::{LanguageId, provider_code};
use crate::providers::baidu::BaiduSegment;
use crate::providers::{
    BaiduResult, CaiyunResult, LanguageDetectResult, LanguageDetector, ProviderPayload, ProviderResult, ProviderTag,
    TencentResult, TranslationProvider, YoudaoResult,
};
use crate::translation::model::QueryWordInfo;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Succeed with these candidates and the requested pair (`auto` resolved via `detects_as`)
    Text(Vec<String>),
    /// Succeed with these candidates but report a specific pair
    Pair {
        from: LanguageId,
        to: LanguageId,
        translations: Vec<String>,
    },
    /// Succeed with a hand-built payload
    Payload(ProviderPayload),
    /// Fail with this error
    Error(RequestErrorInfo),
}

impl MockReply {
    pub fn text(text: &str) -> Self {
        Self::Text(vec![text.to_string()])
    }

    pub fn pair(from: &str, to: &str, text: &str) -> Self {
        Self::Pair {
            from: LanguageId::from(from),
            to: LanguageId::from(to),
            translations: vec![text.to_string()],
        }
    }

    /// Provider-reported error with the given code
    pub fn error(provider: ProviderTag, code: &str) -> Self {
        Self::Error(RequestErrorInfo::api(provider, code, format!("Simulated error {}", code)))
    }
}

#[derive(Debug)]
struct MockState {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<QueryWordInfo>>,
    call_count: AtomicUsize,
    detect_count: AtomicUsize,
}

/// Mock provider for testing lookup behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    tag: ProviderTag,
    state: Arc<MockState>,
    delay: Option<Duration>,
    detects_as: Option<LanguageId>,
    detection_confirmed: bool,
    retryable_codes: Vec<String>,
    ambiguity_codes: Vec<String>,
}

impl MockProvider {
    /// Create a mock for a backend tag
    ///
    /// A Youdao mock treats `"207"` as retryable and `"102"` as a detection
    /// ambiguity, like the real adapter.
    pub fn new(tag: ProviderTag) -> Self {
        let (retryable_codes, ambiguity_codes) = if tag == ProviderTag::Youdao {
            (vec!["207".to_string()], vec!["102".to_string()])
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            tag,
            state: Arc::new(MockState {
                replies: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
                detect_count: AtomicUsize::new(0),
            }),
            delay: None,
            detects_as: Some(LanguageId::from("en")),
            detection_confirmed: true,
            retryable_codes,
            ambiguity_codes,
        }
    }

    /// Queue a reply
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.state.replies.lock().push_back(reply);
        self
    }

    /// Delay every call, for timeout and supersede tests
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(delay_ms));
        self
    }

    /// Language reported for `auto` requests and by `detect_language`
    pub fn detects_as(mut self, language: Option<&str>, confirmed: bool) -> Self {
        self.detects_as = language.map(LanguageId::from);
        self.detection_confirmed = confirmed;
        self
    }

    pub fn with_retryable_code(mut self, code: &str) -> Self {
        self.retryable_codes.push(code.to_string());
        self
    }

    /// Number of `translate` calls so far
    pub fn calls(&self) -> usize {
        self.state.call_count.load(Ordering::SeqCst)
    }

    /// Number of `detect_language` calls so far
    pub fn detect_calls(&self) -> usize {
        self.state.detect_count.load(Ordering::SeqCst)
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<QueryWordInfo> {
        self.state.requests.lock().clone()
    }

    /// Build the payload a real backend of `tag` would return
    pub fn payload_for(
        tag: ProviderTag,
        query: &QueryWordInfo,
        from: &LanguageId,
        to: &LanguageId,
        translations: &[String],
    ) -> ProviderPayload {
        let code = |id: &LanguageId| provider_code(tag, id).map(str::to_string).unwrap_or_else(|_| id.to_string());

        match tag {
            ProviderTag::Youdao => ProviderPayload::Youdao(YoudaoResult {
                error_code: "0".to_string(),
                query: query.word.clone(),
                translation: translations.to_vec(),
                l: format!("{}2{}", from, to),
                ..Default::default()
            }),
            ProviderTag::Baidu => ProviderPayload::Baidu(BaiduResult {
                from: Some(code(from)),
                to: Some(code(to)),
                trans_result: Some(
                    translations
                        .iter()
                        .map(|dst| BaiduSegment {
                            src: query.word.clone(),
                            dst: dst.clone(),
                        })
                        .collect(),
                ),
                ..Default::default()
            }),
            ProviderTag::Tencent => ProviderPayload::Tencent(TencentResult {
                target_text: Some(translations.join(" ")),
                source: Some(code(from)),
                target: Some(code(to)),
                ..Default::default()
            }),
            ProviderTag::Caiyun => ProviderPayload::Caiyun(CaiyunResult {
                target: Some(translations.join(" ")),
                ..Default::default()
            }),
        }
    }

    fn candidates(payload: &ProviderPayload) -> Vec<String> {
        match payload {
            ProviderPayload::Youdao(result) => result.translation.clone(),
            ProviderPayload::Baidu(result) => result
                .trans_result
                .as_ref()
                .map(|segments| segments.iter().map(|s| s.dst.clone()).collect())
                .unwrap_or_default(),
            ProviderPayload::Tencent(result) => result.target_text.clone().into_iter().collect(),
            ProviderPayload::Caiyun(result) => result.target.clone().into_iter().collect(),
        }
    }

    fn resolved_from(&self, query: &QueryWordInfo) -> LanguageId {
        match &self.detects_as {
            Some(language) if query.from_language.is_auto() => language.clone(),
            _ => query.from_language.clone(),
        }
    }

    fn success(&self, query: &QueryWordInfo, from: &LanguageId, to: &LanguageId, translations: Vec<String>) -> ProviderResult {
        let payload = Self::payload_for(self.tag, query, from, to, &translations);
        ProviderResult {
            query: query.clone(),
            translations,
            payload,
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn tag(&self) -> ProviderTag {
        self.tag
    }

    async fn translate(&self, query: &QueryWordInfo) -> Result<ProviderResult, RequestErrorInfo> {
        self.state.call_count.fetch_add(1, Ordering::SeqCst);
        self.state.requests.lock().push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.state.replies.lock().pop_front();
        match reply {
            Some(MockReply::Text(translations)) => {
                let from = self.resolved_from(query);
                Ok(self.success(query, &from, &query.to_language, translations))
            }
            Some(MockReply::Pair { from, to, translations }) => Ok(self.success(query, &from, &to, translations)),
            Some(MockReply::Payload(payload)) => Ok(ProviderResult {
                query: query.clone(),
                translations: Self::candidates(&payload),
                payload,
            }),
            Some(MockReply::Error(error)) => Err(error),
            None => {
                let from = self.resolved_from(query);
                let text = format!("[{}] {}", query.to_language, query.word);
                Ok(self.success(query, &from, &query.to_language, vec![text]))
            }
        }
    }

    fn is_retryable(&self, error: &RequestErrorInfo) -> bool {
        self.retryable_codes.contains(&error.code)
    }

    fn is_detection_ambiguity(&self, error: &RequestErrorInfo) -> bool {
        self.ambiguity_codes.contains(&error.code)
    }
}

#[async_trait]
impl LanguageDetector for MockProvider {
    async fn detect_language(&self, text: &str) -> Result<LanguageDetectResult, RequestErrorInfo> {
        self.state.detect_count.fetch_add(1, Ordering::SeqCst);

        let query = QueryWordInfo::new(text, LanguageId::auto(), "zh-CHS");
        let detected = self.detects_as.clone();
        let from = detected.clone().unwrap_or_else(LanguageId::auto);
        let raw = Self::payload_for(self.tag, &query, &from, &query.to_language, &[text.to_string()]);

        Ok(LanguageDetectResult {
            provider: self.tag,
            provider_language: from.to_string(),
            detected_language: detected,
            confirmed: self.detection_confirmed,
            raw,
        })
    }
}
