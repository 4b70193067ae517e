// Translation gateway
//
// The sync engine only sees the `TranslationGateway` trait. Concrete providers
// are picked by the factory from configuration:
// - Google: Cloud Translation v2 REST API
// - Copy: offline provider that copies source text into the target

pub mod copy;
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalogue::MessageRecord;
use crate::config::{ProviderConfig, ProviderKind};
use crate::error::Result;

/// Failure reported by a translation provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// Quota exhausted (HTTP 429). Never retried.
    #[error("rate limit reached")]
    RateLimited,

    #[error("{0}")]
    Provider(String),

    #[error("message '{id}' could not be translated: {reason}")]
    Untranslatable { id: String, reason: String },
}

/// Batch translation of message records.
///
/// On success the result holds one record per input, in input order, with the
/// same ids and metadata and the translation set as `target`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationGateway: Send + Sync {
    async fn translate(
        &self,
        records: &[MessageRecord],
        from_language: &str,
        to_language: &str,
    ) -> std::result::Result<Vec<MessageRecord>, TranslationError>;
}

/// Reject requests no provider should ever see.
pub fn check_request(
    records: &[MessageRecord],
    from_language: &str,
    to_language: &str,
) -> std::result::Result<(), TranslationError> {
    if records.is_empty() {
        return Err(TranslationError::Provider("Nothing to translate".to_string()));
    }
    if from_language.trim().is_empty() || to_language.trim().is_empty() {
        return Err(TranslationError::Provider(
            "Source and target language codes are required".to_string(),
        ));
    }
    Ok(())
}

/// Factory for creating gateway instances
pub struct GatewayFactory;

impl GatewayFactory {
    pub fn create_gateway(config: &ProviderConfig) -> Result<Arc<dyn TranslationGateway>> {
        match config.kind {
            ProviderKind::Google => Ok(Arc::new(google::GoogleTranslateGateway::new(config)?)),
            ProviderKind::Copy => Ok(Arc::new(copy::CopyGateway)),
        }
    }
}
