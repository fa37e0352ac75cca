/*!
 * Provider implementations for the translation backends.
 *
 * This module contains client implementations for the fixed provider set:
 * - Youdao: primary dictionary and translation provider
 * - Baidu: enrichment provider, also used for language detection
 * - Tencent: enrichment provider
 * - Caiyun: enrichment provider
 */

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Debug};
use std::time::{Duration, Instant};

use crate::errors::RequestErrorInfo;
use crate::language_utils::{LanguageId, from_provider_code};
use crate::translation::model::QueryWordInfo;

pub mod baidu;
pub mod caiyun;
pub mod mock;
pub mod tencent;
pub mod youdao;

pub use baidu::{Baidu, BaiduResult};
pub use caiyun::{Caiyun, CaiyunResult};
pub use tencent::{Tencent, TencentResult};
pub use youdao::{Youdao, YoudaoResult};

/// Identifies a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    Youdao,
    Baidu,
    Tencent,
    Caiyun,
}

impl ProviderTag {
    /// Enrichment providers in the order their lines are shown
    pub const ENRICHMENT_ORDER: [ProviderTag; 3] = [Self::Baidu, Self::Tencent, Self::Caiyun];

    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Youdao => "Youdao",
            Self::Baidu => "Baidu",
            Self::Tencent => "Tencent",
            Self::Caiyun => "Caiyun",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        self.display_name().to_lowercase()
    }

    /// Sort key: primary first, then the fixed enrichment order
    pub fn priority(&self) -> usize {
        match self {
            Self::Youdao => 0,
            Self::Baidu => 1,
            Self::Tencent => 2,
            Self::Caiyun => 3,
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for ProviderTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "youdao" => Ok(Self::Youdao),
            "baidu" => Ok(Self::Baidu),
            "tencent" => Ok(Self::Tencent),
            "caiyun" => Ok(Self::Caiyun),
            _ => Err(anyhow::anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Raw payload returned by a provider, one case per backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "provider", content = "raw", rename_all = "lowercase")]
pub enum ProviderPayload {
    Youdao(YoudaoResult),
    Baidu(BaiduResult),
    Tencent(TencentResult),
    Caiyun(CaiyunResult),
}

impl ProviderPayload {
    pub fn tag(&self) -> ProviderTag {
        match self {
            Self::Youdao(_) => ProviderTag::Youdao,
            Self::Baidu(_) => ProviderTag::Baidu,
            Self::Tencent(_) => ProviderTag::Tencent,
            Self::Caiyun(_) => ProviderTag::Caiyun,
        }
    }
}

/// Successful response of one provider call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderResult {
    /// Request that produced this result
    pub query: QueryWordInfo,
    /// Flat, ordered translation candidates
    pub translations: Vec<String>,
    pub payload: ProviderPayload,
}

impl ProviderResult {
    pub fn tag(&self) -> ProviderTag {
        self.payload.tag()
    }

    /// Source and target language as reported by the provider
    ///
    /// Providers may resolve `auto` or override the requested pair; when the
    /// payload carries no usable pair the requested one is returned.
    pub fn reported_languages(&self) -> (LanguageId, LanguageId) {
        let requested = (self.query.from_language.clone(), self.query.to_language.clone());
        match &self.payload {
            ProviderPayload::Youdao(result) => result.language_pair().unwrap_or(requested),
            ProviderPayload::Baidu(result) => {
                let from = result.from.as_deref().and_then(|c| from_provider_code(ProviderTag::Baidu, c));
                let to = result.to.as_deref().and_then(|c| from_provider_code(ProviderTag::Baidu, c));
                (from.unwrap_or(requested.0), to.unwrap_or(requested.1))
            }
            ProviderPayload::Tencent(result) => {
                let from = result.source.as_deref().and_then(|c| from_provider_code(ProviderTag::Tencent, c));
                let to = result.target.as_deref().and_then(|c| from_provider_code(ProviderTag::Tencent, c));
                (from.unwrap_or(requested.0), to.unwrap_or(requested.1))
            }
            ProviderPayload::Caiyun(_) => requested,
        }
    }

    /// Candidates joined into one line; segmented providers are rejoined with a blank
    pub fn joined_text(&self) -> String {
        self.translations.join(" ")
    }
}

/// Outcome of a provider-backed language detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageDetectResult {
    pub provider: ProviderTag,
    /// Canonical id, `None` when the provider's code has no canonical counterpart
    pub detected_language: Option<LanguageId>,
    /// Code exactly as the provider reported it
    pub provider_language: String,
    /// `false` when the detector itself could not discriminate
    pub confirmed: bool,
    pub raw: ProviderPayload,
}

/// Common trait for all translation backends
///
/// Request construction, signing and response mapping are private to each
/// implementation; callers only see `ProviderResult` and `RequestErrorInfo`.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Which backend this is
    fn tag(&self) -> ProviderTag;

    /// Translate a word or phrase
    ///
    /// # Arguments
    /// * `query` - Text and canonical language pair
    ///
    /// # Returns
    /// * `Result<ProviderResult, RequestErrorInfo>` - Normalized result or typed error
    async fn translate(&self, query: &QueryWordInfo) -> Result<ProviderResult, RequestErrorInfo>;

    /// Whether the error is transient and the same request may be re-issued unchanged
    fn is_retryable(&self, _error: &RequestErrorInfo) -> bool {
        false
    }

    /// Whether the error means the provider could not work out the source language
    fn is_detection_ambiguity(&self, _error: &RequestErrorInfo) -> bool {
        false
    }
}

/// Provider-backed language detection
#[async_trait]
pub trait LanguageDetector: Send + Sync + Debug {
    async fn detect_language(&self, text: &str) -> Result<LanguageDetectResult, RequestErrorInfo>;
}

/// Build the HTTP client shared by one provider
///
/// Falls back to reqwest's default client, without the timeout, when the
/// builder fails; the fallback is logged.
pub(crate) fn build_client(timeout_secs: u64) -> Client {
    let timeout = client_timeout(timeout_secs);
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(
                "Cannot build HTTP client with a {} s timeout, using defaults: {}",
                timeout.as_secs(),
                e
            );
            Client::default()
        }
    }
}

/// Per-request timeout, at least one second
fn client_timeout(timeout_secs: u64) -> Duration {
    Duration::from_secs(timeout_secs.max(1))
}

/// Send a request and decode its JSON body
///
/// Non-success HTTP statuses become provider errors coded with the status;
/// bodies that do not match `T` become parse errors.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: ProviderTag,
    request: RequestBuilder,
) -> Result<T, RequestErrorInfo> {
    let started = Instant::now();
    let response = request
        .send()
        .await
        .map_err(|e| RequestErrorInfo::from_reqwest(provider, &e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| RequestErrorInfo::from_reqwest(provider, &e))?;
    debug!("{} responded {} in {} ms", provider, status, started.elapsed().as_millis());

    if !status.is_success() {
        return Err(RequestErrorInfo::api(provider, status.as_u16().to_string(), body));
    }

    serde_json::from_str(&body).map_err(|e| {
        RequestErrorInfo::parse(provider, format!("Failed to parse {} response: {}", provider, e))
    })
}

/// Compute the lowercase hex SHA256 of text
pub(crate) fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Accept either a JSON string or number and keep it as a string
pub(crate) fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
