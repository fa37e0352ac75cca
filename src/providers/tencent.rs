use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::RequestErrorInfo;
use crate::language_utils::provider_code;
use crate::providers::{ProviderPayload, ProviderResult, ProviderTag, TranslationProvider, build_client, send_json, sha256_hex};
use crate::translation::model::QueryWordInfo;

/// Default Tencent machine translation endpoint
pub const DEFAULT_ENDPOINT: &str = "https://tmt.tencentcloudapi.com";

/// Default region for TMT requests
pub const DEFAULT_REGION: &str = "ap-guangzhou";

const SERVICE: &str = "tmt";
const ACTION: &str = "TextTranslate";
const VERSION: &str = "2018-03-21";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";

type HmacSha256 = Hmac<Sha256>;

/// Tencent TMT client
#[derive(Debug)]
pub struct Tencent {
    client: Client,
    secret_id: String,
    secret_key: String,
    region: String,
    endpoint: String,
    host: String,
}

/// `Response` object of a TMT reply
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TencentResult {
    #[serde(default)]
    pub target_text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub error: Option<TencentError>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TencentError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct TencentEnvelope {
    #[serde(rename = "Response")]
    response: TencentResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TextTranslateRequest<'a> {
    source_text: &'a str,
    source: &'a str,
    target: &'a str,
    project_id: i64,
}

fn hmac_sha256(key: &[u8], message: &str) -> Result<Vec<u8>, RequestErrorInfo> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| RequestErrorInfo::parse(ProviderTag::Tencent, format!("Invalid signing key: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Build the TC3-HMAC-SHA256 `Authorization` header value
///
/// Signs `content-type` and `host` only; `payload` must be the exact request body.
pub fn tc3_authorization(
    secret_id: &str,
    secret_key: &str,
    host: &str,
    payload: &str,
    timestamp: DateTime<Utc>,
) -> Result<String, RequestErrorInfo> {
    let date = timestamp.format("%Y-%m-%d").to_string();
    let signed_headers = "content-type;host";

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host,
        signed_headers,
        sha256_hex(payload)
    );
    let credential_scope = format!("{}/{}/tc3_request", date, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp.timestamp(),
        credential_scope,
        sha256_hex(&canonical_request)
    );

    let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, SERVICE)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    let signature = to_hex(&hmac_sha256(&secret_signing, &string_to_sign)?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, secret_id, credential_scope, signed_headers, signature
    ))
}

impl Tencent {
    /// Create a new Tencent client
    pub fn new(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint };
        let host = url::Url::parse(&endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "tmt.tencentcloudapi.com".to_string());
        let region = region.into();

        Self {
            client: build_client(timeout_secs),
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            region: if region.is_empty() { DEFAULT_REGION.to_string() } else { region },
            endpoint,
            host,
        }
    }

    /// Turn a decoded `Response` into a result or the error it carries
    pub fn parse_response(query: &QueryWordInfo, body: TencentResult) -> Result<ProviderResult, RequestErrorInfo> {
        if let Some(error) = &body.error {
            return Err(RequestErrorInfo::api(ProviderTag::Tencent, error.code.clone(), error.message.clone()));
        }

        let text = body
            .target_text
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RequestErrorInfo::parse(ProviderTag::Tencent, "Tencent returned no TargetText"))?;

        Ok(ProviderResult {
            query: query.clone(),
            translations: vec![text],
            payload: ProviderPayload::Tencent(body),
        })
    }
}

#[async_trait]
impl TranslationProvider for Tencent {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Tencent
    }

    async fn translate(&self, query: &QueryWordInfo) -> Result<ProviderResult, RequestErrorInfo> {
        let source = provider_code(ProviderTag::Tencent, &query.from_language)?;
        let target = provider_code(ProviderTag::Tencent, &query.to_language)?;

        let payload = serde_json::to_string(&TextTranslateRequest {
            source_text: &query.word,
            source,
            target,
            project_id: 0,
        })
        .map_err(|e| RequestErrorInfo::parse(ProviderTag::Tencent, e.to_string()))?;

        let now = Utc::now();
        let authorization = tc3_authorization(&self.secret_id, &self.secret_key, &self.host, &payload, now)?;

        debug!("Tencent request: {} -> {} '{}'", source, target, query.word);
        let request = self
            .client
            .post(&self.endpoint)
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", &self.host)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Timestamp", now.timestamp().to_string())
            .header("X-TC-Version", VERSION)
            .header("X-TC-Region", &self.region)
            .body(payload);

        let envelope: TencentEnvelope = send_json(ProviderTag::Tencent, request).await?;
        Self::parse_response(query, envelope.response)
    }
}
