use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RequestErrorInfo;
use crate::language_utils::provider_code;
use crate::providers::{ProviderPayload, ProviderResult, ProviderTag, TranslationProvider, build_client, send_json};
use crate::translation::model::QueryWordInfo;

/// Default Caiyun translator endpoint
pub const DEFAULT_ENDPOINT: &str = "http://api.interpreter.caiyunai.com/v1/translator";

/// Caiyun client; the API only knows zh, en and ja
#[derive(Debug)]
pub struct Caiyun {
    client: Client,
    token: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct CaiyunRequest<'a> {
    source: &'a str,
    trans_type: String,
    request_id: &'a str,
    detect: bool,
}

/// Caiyun API response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CaiyunResult {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub rc: Option<i64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Caiyun {
    /// Create a new Caiyun client
    pub fn new(token: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: build_client(timeout_secs),
            token: token.into(),
            endpoint: if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint },
        }
    }

    /// Turn a decoded body into a result or the error it carries
    pub fn parse_response(query: &QueryWordInfo, body: CaiyunResult) -> Result<ProviderResult, RequestErrorInfo> {
        if let Some(message) = &body.message {
            let code = body.rc.map(|rc| rc.to_string()).unwrap_or_else(|| "error".to_string());
            return Err(RequestErrorInfo::api(ProviderTag::Caiyun, code, message.clone()));
        }

        let text = body
            .target
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RequestErrorInfo::parse(ProviderTag::Caiyun, "Caiyun returned no target"))?;

        Ok(ProviderResult {
            query: query.clone(),
            translations: vec![text],
            payload: ProviderPayload::Caiyun(body),
        })
    }
}

#[async_trait]
impl TranslationProvider for Caiyun {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Caiyun
    }

    async fn translate(&self, query: &QueryWordInfo) -> Result<ProviderResult, RequestErrorInfo> {
        let from = provider_code(ProviderTag::Caiyun, &query.from_language)?;
        let to = provider_code(ProviderTag::Caiyun, &query.to_language)?;

        let body = CaiyunRequest {
            source: &query.word,
            trans_type: format!("{}2{}", from, to),
            request_id: "wordlens",
            detect: true,
        };

        debug!("Caiyun request: {} '{}'", body.trans_type, query.word);
        let request = self
            .client
            .post(&self.endpoint)
            .header("x-authorization", format!("token {}", self.token))
            .json(&body);

        let body: CaiyunResult = send_json(ProviderTag::Caiyun, request).await?;
        Self::parse_response(query, body)
    }
}
