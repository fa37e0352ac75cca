use async_trait::async_trait;
use log::{debug, warn};
use md5::{Digest, Md5};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RequestErrorInfo;
use crate::language_utils::{LanguageId, from_provider_code, provider_code};
use crate::providers::{
    LanguageDetectResult, LanguageDetector, ProviderPayload, ProviderResult, ProviderTag, TranslationProvider,
    build_client, de_opt_string_or_number, send_json,
};
use crate::translation::model::QueryWordInfo;

/// Default Baidu general translation endpoint
pub const DEFAULT_ENDPOINT: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

/// Pivot language for detection-by-translation
const DETECT_PIVOT: &str = "zh-CHS";

/// Baidu translate client
#[derive(Debug)]
pub struct Baidu {
    client: Client,
    app_id: String,
    app_secret: String,
    endpoint: String,
}

/// Baidu API response; error fields arrive with HTTP 200
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaiduResult {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub trans_result: Option<Vec<BaiduSegment>>,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
}

/// One translated paragraph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaiduSegment {
    pub src: String,
    pub dst: String,
}

impl Baidu {
    /// Create a new Baidu client
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: build_client(timeout_secs),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            endpoint: if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint },
        }
    }

    /// md5(appid + q + salt + secret)
    fn sign(&self, q: &str, salt: &str) -> String {
        let digest = Md5::digest(format!("{}{}{}{}", self.app_id, q, salt, self.app_secret).as_bytes());
        format!("{:x}", digest)
    }

    /// Turn a decoded body into a result or the error it carries
    pub fn parse_response(query: &QueryWordInfo, body: BaiduResult) -> Result<ProviderResult, RequestErrorInfo> {
        let translations: Vec<String> = body
            .trans_result
            .as_ref()
            .map(|segments| segments.iter().map(|s| s.dst.clone()).collect())
            .unwrap_or_default();

        if translations.is_empty() {
            // e.g. {"error_code":"54001","error_msg":"Invalid Sign"}
            let code = body.error_code.clone().unwrap_or_else(|| "unknown".to_string());
            let message = body.error_msg.clone().unwrap_or_else(|| "Baidu returned no translation".to_string());
            return Err(RequestErrorInfo::api(ProviderTag::Baidu, code, message));
        }

        Ok(ProviderResult {
            query: query.clone(),
            translations,
            payload: ProviderPayload::Baidu(body),
        })
    }

    /// Derive a detection result from an `auto` translation
    ///
    /// When Baidu cannot tell the language it echoes the text back, so the
    /// detection is unconfirmed if the reported pair or the first segment is unchanged.
    pub fn detection_from(result: ProviderResult) -> Result<LanguageDetectResult, RequestErrorInfo> {
        let ProviderPayload::Baidu(body) = &result.payload else {
            return Err(RequestErrorInfo::parse(ProviderTag::Baidu, "Unexpected payload for Baidu detection"));
        };

        let provider_language = body.from.clone().unwrap_or_default();
        let detected_language = from_provider_code(ProviderTag::Baidu, &provider_language);

        let same_pair = body.from.is_some() && body.from == body.to;
        let echoed = body
            .trans_result
            .as_ref()
            .and_then(|segments| segments.first())
            .is_none_or(|first| first.dst == first.src);

        Ok(LanguageDetectResult {
            provider: ProviderTag::Baidu,
            detected_language,
            provider_language,
            confirmed: !same_pair && !echoed,
            raw: result.payload,
        })
    }
}

#[async_trait]
impl TranslationProvider for Baidu {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Baidu
    }

    async fn translate(&self, query: &QueryWordInfo) -> Result<ProviderResult, RequestErrorInfo> {
        let from = provider_code(ProviderTag::Baidu, &query.from_language)?;
        let to = provider_code(ProviderTag::Baidu, &query.to_language)?;

        let salt = rand::rng().random_range(32768..65536).to_string();
        let sign = self.sign(&query.word, &salt);

        debug!("Baidu request: {} -> {} '{}'", from, to, query.word);
        let params = [
            ("q", query.word.as_str()),
            ("from", from),
            ("to", to),
            ("appid", self.app_id.as_str()),
            ("salt", salt.as_str()),
            ("sign", sign.as_str()),
        ];

        let body: BaiduResult = send_json(ProviderTag::Baidu, self.client.get(&self.endpoint).query(&params)).await?;
        Self::parse_response(query, body)
    }
}

#[async_trait]
impl LanguageDetector for Baidu {
    async fn detect_language(&self, text: &str) -> Result<LanguageDetectResult, RequestErrorInfo> {
        let query = QueryWordInfo::new(text, LanguageId::auto(), DETECT_PIVOT);
        let result = self.translate(&query).await?;
        let detection = Self::detection_from(result)?;

        if !detection.confirmed {
            warn!("Baidu detection of '{}' is unconfirmed ({})", text, detection.provider_language);
        }
        Ok(detection)
    }
}
