use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalogue::MessageRecord;
use crate::config::ProviderConfig;
use crate::error::Result;
use super::{TranslationError, TranslationGateway, check_request};

/// Environment variable consulted when the config has no api key
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest<'a> {
    pub q: Vec<&'a str>,
    pub source: &'a str,
    pub target: &'a str,
    pub format: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    pub data: TranslateData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateData {
    pub translations: Vec<TranslatedText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslatedText {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// Google Cloud Translation (v2) gateway.
///
/// Payloads are sent with `format=html` so inline XLIFF placeholders pass
/// through untranslated. Chunks are sent one after another, never in parallel.
pub struct GoogleTranslateGateway {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    batch_size: usize,
}

impl GoogleTranslateGateway {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty());

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            batch_size: config.batch_size.max(1),
        })
    }

    async fn translate_chunk(
        &self,
        chunk: &[MessageRecord],
        from_language: &str,
        to_language: &str,
    ) -> std::result::Result<Vec<String>, TranslationError> {
        let request = TranslateRequest {
            q: chunk.iter().map(|record| record.source.as_str()).collect(),
            source: from_language,
            target: to_language,
            format: "html",
        };

        let url = format!("{}/language/translate/v2", self.endpoint);
        debug!("Sending {} messages to {}", chunk.len(), url);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.query(&[("key", key.as_str())]);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TranslationError::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Provider(format!("Failed to parse response: {}", e)))?;

        Ok(body
            .data
            .translations
            .into_iter()
            .map(|item| item.translated_text)
            .collect())
    }
}

#[async_trait]
impl TranslationGateway for GoogleTranslateGateway {
    async fn translate(
        &self,
        records: &[MessageRecord],
        from_language: &str,
        to_language: &str,
    ) -> std::result::Result<Vec<MessageRecord>, TranslationError> {
        check_request(records, from_language, to_language)?;
        info!("Translating {} messages from {} to {}", records.len(), from_language, to_language);

        let mut translated = Vec::with_capacity(records.len());
        for chunk in records.chunks(self.batch_size) {
            let texts = self.translate_chunk(chunk, from_language, to_language).await?;
            translated.extend(align(chunk, texts)?);
        }

        Ok(translated)
    }
}

/// Map a non-success response to a gateway error. 429, and the 403 quota
/// reasons the API also uses, mean rate limiting.
pub fn classify_failure(status: StatusCode, body: &str) -> TranslationError {
    let quota_exceeded = status == StatusCode::FORBIDDEN
        && (body.contains("rateLimitExceeded") || body.contains("userRateLimitExceeded"));

    if status == StatusCode::TOO_MANY_REQUESTS || quota_exceeded {
        TranslationError::RateLimited
    } else {
        TranslationError::Provider(format!("Translation API error {}: {}", status, body.trim()))
    }
}

/// Pair provider output with the records it was produced for.
pub fn align(
    chunk: &[MessageRecord],
    texts: Vec<String>,
) -> std::result::Result<Vec<MessageRecord>, TranslationError> {
    if texts.len() != chunk.len() {
        return Err(TranslationError::Provider(format!(
            "Expected {} translations, received {}",
            chunk.len(),
            texts.len()
        )));
    }

    chunk
        .iter()
        .zip(texts)
        .map(|(record, text)| {
            if text.trim().is_empty() && !record.source.trim().is_empty() {
                Err(TranslationError::Untranslatable {
                    id: record.id.clone(),
                    reason: "provider returned an empty translation".to_string(),
                })
            } else {
                Ok(record.translated(text))
            }
        })
        .collect()
}
