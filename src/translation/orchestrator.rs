/*!
 * Lookup orchestration.
 *
 * Drives one lookup through `Idle → Detecting → Translating → Retrying → Done | Failed`:
 * - local detection picks the first source language
 * - the primary provider is called, retried on retryable codes, and re-issued
 *   with the other preferred language when it reports `from == to`
 * - once the primary succeeds, the enrichment providers are called concurrently
 *   and whatever succeeds inside its time budget is merged
 */

use anyhow::{Result, anyhow};
use futures::future::join_all;
use log::{debug, error, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Backoff, Config};
use crate::errors::{LookupError, RequestErrorInfo};
use crate::language_utils::{LanguageId, LanguagePreferences, is_valid_language_id};
use crate::providers::{
    Baidu, Caiyun, LanguageDetectResult, LanguageDetector, ProviderResult, ProviderTag, Tencent, TranslationProvider,
    Youdao,
};
use crate::translation::detection::detect;
use crate::translation::model::{QueryWordInfo, TranslateFormatResult};
use crate::translation::normalizer::normalize;

/// Bounded retry policy for retryable primary errors
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first request
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_retries,
            base_delay,
            backoff,
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let factor = 1u32 << retry.saturating_sub(1).min(16);
                self.base_delay.saturating_mul(factor)
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(400), Backoff::Exponential)
    }
}

/// Orchestration state, logged on every transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrchestratorState {
    Idle,
    Detecting,
    Translating { from: LanguageId, to: LanguageId },
    Retrying { reason: String, retry: u32 },
    Done,
    Failed { code: String },
}

/// Records transitions of one lookup
#[derive(Debug)]
struct StateMachine {
    current: OrchestratorState,
    history: Vec<OrchestratorState>,
}

impl StateMachine {
    fn new() -> Self {
        Self {
            current: OrchestratorState::Idle,
            history: vec![OrchestratorState::Idle],
        }
    }

    fn enter(&mut self, next: OrchestratorState) {
        debug!("Lookup state: {:?} -> {:?}", self.current, next);
        self.current = next.clone();
        self.history.push(next);
    }

    fn fail(&mut self, error: LookupError) -> LookupError {
        error!("Lookup failed: {}", error);
        self.enter(OrchestratorState::Failed {
            code: error.code().to_string(),
        });
        error
    }
}

/// Successful lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup {
    pub format: TranslateFormatResult,
    /// Every primary request issued, in order
    pub attempts: Vec<QueryWordInfo>,
    /// Transitions from `Idle` to `Done`
    pub transitions: Vec<OrchestratorState>,
    /// Provider-backed detection, when the fallback was used
    pub detection: Option<LanguageDetectResult>,
    /// Enrichment failures, logged and left out of `format`
    pub enrichment_errors: Vec<RequestErrorInfo>,
}

/// Outcome of the primary phase
struct PrimaryOutcome {
    result: ProviderResult,
    attempts: Vec<QueryWordInfo>,
    detection: Option<LanguageDetectResult>,
}

impl PrimaryOutcome {
    /// Pair for the enrichment calls
    ///
    /// The primary's reported pair, unless it reported `from == to` (an accepted
    /// ping-pong), in which case the last requested pair is used.
    fn enrichment_query(&self, text: &str) -> QueryWordInfo {
        let (from, to) = self.result.reported_languages();
        if from != to {
            return QueryWordInfo::new(text, from, to);
        }
        match self.attempts.last() {
            Some(requested) if !requested.from_language.is_auto() => {
                QueryWordInfo::new(text, requested.from_language.clone(), requested.to_language.clone())
            }
            _ => QueryWordInfo::new(text, from, to),
        }
    }
}

/// Owns the fixed provider set and runs lookups
#[derive(Debug, Clone)]
pub struct Orchestrator {
    primary: Arc<dyn TranslationProvider>,
    enrichment: Vec<Arc<dyn TranslationProvider>>,
    detector: Option<Arc<dyn LanguageDetector>>,
    preferences: LanguagePreferences,
    retry: RetryPolicy,
    enrichment_timeout: Duration,
}

impl Orchestrator {
    /// Create an orchestrator with only a primary provider
    pub fn new(primary: Arc<dyn TranslationProvider>, preferences: LanguagePreferences) -> Self {
        Self {
            primary,
            enrichment: Vec::new(),
            detector: None,
            preferences,
            retry: RetryPolicy::default(),
            enrichment_timeout: Duration::from_millis(5000),
        }
    }

    /// Enrichment providers; results are ordered by provider priority, not by this order
    pub fn with_enrichment(mut self, providers: Vec<Arc<dyn TranslationProvider>>) -> Self {
        self.enrichment = providers;
        self
    }

    /// Provider-backed detector used when the primary cannot resolve `auto`
    pub fn with_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_enrichment_timeout(mut self, timeout: Duration) -> Self {
        self.enrichment_timeout = timeout;
        self
    }

    /// Build the real provider set from configuration
    ///
    /// Enrichment providers without credentials, or disabled, are left out.
    /// Baidu doubles as the language detector when it is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let youdao_config = config
            .get_active_provider_config(ProviderTag::Youdao)
            .ok_or_else(|| anyhow!("Youdao must be enabled with app_key and app_secret"))?;
        let youdao = Youdao::new(
            youdao_config.app_key.clone(),
            youdao_config.app_secret.clone(),
            youdao_config.endpoint.clone(),
            youdao_config.timeout_secs,
        );

        let mut enrichment: Vec<Arc<dyn TranslationProvider>> = Vec::new();
        let mut detector: Option<Arc<dyn LanguageDetector>> = None;

        for tag in ProviderTag::ENRICHMENT_ORDER {
            let Some(provider_config) = config.get_active_provider_config(tag) else {
                debug!("{} is not configured, skipping", tag);
                continue;
            };
            let key = provider_config.app_key.clone();
            let secret = provider_config.app_secret.clone();
            let endpoint = provider_config.endpoint.clone();
            let timeout_secs = provider_config.timeout_secs;

            match tag {
                ProviderTag::Baidu => {
                    let baidu = Arc::new(Baidu::new(key, secret, endpoint, timeout_secs));
                    let baidu_detector: Arc<dyn LanguageDetector> = baidu.clone();
                    detector = Some(baidu_detector);
                    enrichment.push(baidu);
                }
                ProviderTag::Tencent => {
                    let region = provider_config.region.clone().unwrap_or_default();
                    enrichment.push(Arc::new(Tencent::new(key, secret, region, endpoint, timeout_secs)));
                }
                ProviderTag::Caiyun => {
                    enrichment.push(Arc::new(Caiyun::new(key, endpoint, timeout_secs)));
                }
                ProviderTag::Youdao => {}
            }
        }

        let retry = RetryPolicy::new(config.retry.max_retries, config.effective_delay(), config.retry.backoff);
        let mut orchestrator = Self::new(Arc::new(youdao), config.preferences())
            .with_enrichment(enrichment)
            .with_retry_policy(retry)
            .with_enrichment_timeout(config.enrichment_timeout());
        orchestrator.detector = detector;
        Ok(orchestrator)
    }

    pub fn preferences(&self) -> &LanguagePreferences {
        &self.preferences
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Look up text, detecting the source language locally
    ///
    /// # Arguments
    /// * `text` - Word or phrase
    /// * `target` - Target language; `language1` when `None`
    pub async fn lookup(&self, text: &str, target: Option<&LanguageId>) -> Result<Lookup, LookupError> {
        let mut machine = StateMachine::new();
        machine.enter(OrchestratorState::Detecting);
        let from = detect(text, &self.preferences);
        let to = target.cloned().unwrap_or_else(|| self.preferences.language1.clone());
        debug!("Local detection of '{}': {}", text, from);

        self.run(text, from, to, machine).await
    }

    /// Look up text with an explicit pair, skipping local detection
    pub async fn lookup_with_pair(&self, text: &str, from: LanguageId, to: LanguageId) -> Result<Lookup, LookupError> {
        self.run(text, from, to, StateMachine::new()).await
    }

    async fn run(
        &self,
        text: &str,
        from: LanguageId,
        to: LanguageId,
        mut machine: StateMachine,
    ) -> Result<Lookup, LookupError> {
        if to.is_auto() {
            let error = RequestErrorInfo::unsupported_language(self.primary.tag(), to.as_str());
            return Err(machine.fail(LookupError::Provider(error)));
        }

        let outcome = self.translate_primary(text, from, to, &mut machine).await?;
        machine.enter(OrchestratorState::Done);

        let enrichment_query = outcome.enrichment_query(text);
        let (enrichment, enrichment_errors) = self.enrich(&enrichment_query).await;

        Ok(Lookup {
            format: normalize(&outcome.result, &enrichment),
            attempts: outcome.attempts,
            transitions: machine.history,
            detection: outcome.detection,
            enrichment_errors,
        })
    }

    /// Primary phase: translate, retry, flip on ping-pong, fall back to remote detection
    async fn translate_primary(
        &self,
        text: &str,
        mut from: LanguageId,
        mut to: LanguageId,
        machine: &mut StateMachine,
    ) -> Result<PrimaryOutcome, LookupError> {
        let mut tried: HashSet<(LanguageId, LanguageId)> = HashSet::new();
        let mut attempts = Vec::new();
        let mut retries = 0u32;
        let mut detection: Option<LanguageDetectResult> = None;
        let mut detection_used = false;

        loop {
            machine.enter(OrchestratorState::Translating {
                from: from.clone(),
                to: to.clone(),
            });
            let query = QueryWordInfo::new(text, from.clone(), to.clone());
            tried.insert((from.clone(), to.clone()));
            attempts.push(query.clone());

            match self.primary.translate(&query).await {
                Ok(result) => {
                    let (reported_from, reported_to) = result.reported_languages();
                    if reported_from != reported_to {
                        return Ok(PrimaryOutcome {
                            result,
                            attempts,
                            detection,
                        });
                    }

                    // Text is already in the target language; aim at the other preference
                    let flipped = self.preferences.other(&reported_to).clone();
                    if tried.contains(&(reported_from.clone(), flipped.clone())) {
                        warn!(
                            "Ping-pong on {} -> {} already tried, accepting last response",
                            reported_from, flipped
                        );
                        return Ok(PrimaryOutcome {
                            result,
                            attempts,
                            detection,
                        });
                    }
                    debug!("Ping-pong: reported {} -> {}, retrying towards {}", reported_from, reported_to, flipped);
                    from = reported_from;
                    to = flipped;
                }
                Err(e) if self.primary.is_retryable(&e) => {
                    retries += 1;
                    if retries > self.retry.max_retries {
                        let attempts = attempts.len() as u32;
                        return Err(machine.fail(LookupError::RetriesExhausted { attempts, last: e }));
                    }
                    let delay = self.retry.delay_for(retries);
                    machine.enter(OrchestratorState::Retrying {
                        reason: e.code.clone(),
                        retry: retries,
                    });
                    debug!("Retryable error {}, waiting {} ms", e.code, delay.as_millis());
                    tokio::time::sleep(delay).await;
                }
                Err(e) if from.is_auto() && !detection_used && self.primary.is_detection_ambiguity(&e) => {
                    detection_used = true;
                    let Some(detector) = &self.detector else {
                        return Err(machine.fail(LookupError::Provider(e)));
                    };

                    machine.enter(OrchestratorState::Detecting);
                    match detector.detect_language(text).await {
                        Ok(result) => match result.detected_language.clone() {
                            Some(language) if !language.is_auto() && is_valid_language_id(language.as_str()) => {
                                if !result.confirmed {
                                    warn!("Using unconfirmed detection {} for '{}'", language, text);
                                }
                                from = language;
                                detection = Some(result);
                            }
                            _ => {
                                warn!("Detector could not map '{}' to a known language", result.provider_language);
                                return Err(machine.fail(LookupError::Provider(e)));
                            }
                        },
                        Err(detect_error) => {
                            warn!("Language detection failed: {}", detect_error);
                            return Err(machine.fail(LookupError::Provider(e)));
                        }
                    }
                }
                Err(e) => return Err(machine.fail(LookupError::Provider(e))),
            }
        }
    }

    /// Call every enrichment provider concurrently, each bounded by the enrichment timeout
    async fn enrich(&self, query: &QueryWordInfo) -> (Vec<Option<ProviderResult>>, Vec<RequestErrorInfo>) {
        let calls = self.enrichment.iter().map(|provider| {
            let tag = provider.tag();
            async move {
                match tokio::time::timeout(self.enrichment_timeout, provider.translate(query)).await {
                    Ok(result) => result,
                    Err(_) => Err(RequestErrorInfo::timeout(
                        tag,
                        format!("No response within {} ms", self.enrichment_timeout.as_millis()),
                    )),
                }
            }
        });

        let mut results = Vec::with_capacity(self.enrichment.len());
        let mut errors = Vec::new();
        for outcome in join_all(calls).await {
            match outcome {
                Ok(result) => results.push(Some(result)),
                Err(e) => {
                    warn!("Enrichment skipped: {}", e);
                    errors.push(e);
                    results.push(None);
                }
            }
        }
        (results, errors)
    }
}
