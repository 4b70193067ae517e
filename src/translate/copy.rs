use async_trait::async_trait;
use tracing::debug;

use crate::catalogue::MessageRecord;
use super::{TranslationError, TranslationGateway, check_request};

/// Copy provider: every target becomes a copy of its source.
///
/// Seeds locale catalogues for human translators and allows dry runs without
/// network access.
pub struct CopyGateway;

#[async_trait]
impl TranslationGateway for CopyGateway {
    async fn translate(
        &self,
        records: &[MessageRecord],
        from_language: &str,
        to_language: &str,
    ) -> Result<Vec<MessageRecord>, TranslationError> {
        check_request(records, from_language, to_language)?;
        debug!("Copying {} messages from {} to {}", records.len(), from_language, to_language);

        Ok(records
            .iter()
            .map(|record| record.translated(record.source.clone()))
            .collect())
    }
}
