use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RequestErrorInfo;
use crate::language_utils::{LanguageId, provider_code};
use crate::providers::{ProviderPayload, ProviderResult, ProviderTag, TranslationProvider, build_client, send_json, sha256_hex};
use crate::translation::model::QueryWordInfo;

/// Default Youdao open API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openapi.youdao.com/api";

/// Replayed request; safe to re-issue unchanged after a short wait
const RETRYABLE_CODE: &str = "207";

/// Unsupported language type; with `from = auto` it means detection failed
const UNSUPPORTED_LANGUAGE_CODE: &str = "102";

/// Youdao client: dictionary details plus translation
#[derive(Debug)]
pub struct Youdao {
    client: Client,
    app_key: String,
    app_secret: String,
    endpoint: String,
}

/// Youdao API response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YoudaoResult {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub translation: Vec<String>,
    /// Language pair actually used, e.g. `"en2zh-CHS"`
    #[serde(default)]
    pub l: String,
    #[serde(rename = "isWord", default)]
    pub is_word: Option<bool>,
    #[serde(default)]
    pub basic: Option<YoudaoBasic>,
    #[serde(default)]
    pub web: Option<Vec<YoudaoWebEntry>>,
}

/// Dictionary section of a Youdao response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YoudaoBasic {
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(rename = "us-phonetic", default)]
    pub us_phonetic: Option<String>,
    #[serde(rename = "uk-phonetic", default)]
    pub uk_phonetic: Option<String>,
    #[serde(default)]
    pub explains: Option<Vec<String>>,
    #[serde(default)]
    pub wfs: Option<Vec<YoudaoWordFormItem>>,
    #[serde(default)]
    pub exam_type: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YoudaoWordFormItem {
    #[serde(default)]
    pub wf: Option<YoudaoWordForm>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YoudaoWordForm {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YoudaoWebEntry {
    pub key: String,
    #[serde(default)]
    pub value: Vec<String>,
}

impl YoudaoResult {
    /// Split `l` ("from2to") into canonical ids
    pub fn language_pair(&self) -> Option<(LanguageId, LanguageId)> {
        let (from, to) = self.l.split_once('2')?;
        if from.is_empty() || to.is_empty() {
            return None;
        }
        Some((LanguageId::from(from), LanguageId::from(to)))
    }
}

/// Describe the Youdao error codes users hit most often
pub fn error_message(code: &str) -> &'static str {
    match code {
        "101" => "Missing required parameter",
        "102" => "Unsupported language type",
        "103" => "Text too long",
        "108" => "Invalid application key",
        "110" => "No valid instance bound to the application",
        "113" => "Query must not be empty",
        "202" => "Signature check failed",
        "206" => "Invalid timestamp",
        "207" => "Replayed request",
        "301" => "Dictionary lookup failed",
        "302" => "Translation lookup failed",
        "303" => "Server side exception",
        "401" => "Account balance overdue",
        "411" => "Access frequency limited",
        _ => "Youdao request failed",
    }
}

/// Input digest for v3 signing: full text when short, otherwise head + length + tail
fn truncate(q: &str) -> String {
    let chars: Vec<char> = q.chars().collect();
    let len = chars.len();
    if len <= 20 {
        return q.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[len - 10..].iter().collect();
    format!("{}{}{}", head, len, tail)
}

impl Youdao {
    /// Create a new Youdao client
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: build_client(timeout_secs),
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            endpoint: if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint },
        }
    }

    /// v3 signature: sha256(appKey + truncate(q) + salt + curtime + appSecret)
    fn sign(&self, q: &str, salt: &str, curtime: &str) -> String {
        sha256_hex(&format!("{}{}{}{}{}", self.app_key, truncate(q), salt, curtime, self.app_secret))
    }

    /// Turn a decoded body into a result or the error it carries
    ///
    /// Youdao reports failures with HTTP 200 and a non-zero `errorCode`.
    pub fn parse_response(query: &QueryWordInfo, body: YoudaoResult) -> Result<ProviderResult, RequestErrorInfo> {
        if body.error_code != "0" {
            error!("Youdao error {}: {}", body.error_code, error_message(&body.error_code));
            return Err(RequestErrorInfo::api(
                ProviderTag::Youdao,
                body.error_code.clone(),
                error_message(&body.error_code),
            ));
        }

        if body.translation.is_empty() {
            return Err(RequestErrorInfo::parse(ProviderTag::Youdao, "Youdao returned no translation"));
        }

        Ok(ProviderResult {
            query: query.clone(),
            translations: body.translation.clone(),
            payload: ProviderPayload::Youdao(body),
        })
    }
}

#[async_trait]
impl TranslationProvider for Youdao {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Youdao
    }

    async fn translate(&self, query: &QueryWordInfo) -> Result<ProviderResult, RequestErrorInfo> {
        let from = provider_code(ProviderTag::Youdao, &query.from_language)?;
        let to = provider_code(ProviderTag::Youdao, &query.to_language)?;

        let salt = uuid::Uuid::new_v4().to_string();
        let curtime = chrono::Utc::now().timestamp().to_string();
        let sign = self.sign(&query.word, &salt, &curtime);

        debug!("Youdao request: {} -> {} '{}'", from, to, query.word);
        let params = [
            ("q", query.word.as_str()),
            ("from", from),
            ("to", to),
            ("appKey", self.app_key.as_str()),
            ("salt", salt.as_str()),
            ("sign", sign.as_str()),
            ("signType", "v3"),
            ("curtime", curtime.as_str()),
        ];

        let body: YoudaoResult = send_json(ProviderTag::Youdao, self.client.post(&self.endpoint).form(&params)).await?;
        Self::parse_response(query, body)
    }

    fn is_retryable(&self, error: &RequestErrorInfo) -> bool {
        error.code == RETRYABLE_CODE
    }

    fn is_detection_ambiguity(&self, error: &RequestErrorInfo) -> bool {
        error.code == UNSUPPORTED_LANGUAGE_CODE
    }
}
