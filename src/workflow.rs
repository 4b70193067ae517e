use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::catalogue::{Catalogue, MessageRecord};
use crate::config::{Config, TranslatorConfig};
use crate::error::{Result, SyncError};
use crate::reconcile::{Reconciliation, reconcile, reconcile_strict};
use crate::repository::{CatalogueStore, FsCatalogueRepository, ProjectLayout};
use crate::translate::{GatewayFactory, TranslationGateway};

/// Result of updating one locale catalogue during an incremental sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub file_name: String,
    pub locale: String,
    pub appended: usize,
    /// New source messages the file already had; their translations are left alone
    pub kept: usize,
}

/// A locale catalogue that could not be updated. Sibling files are unaffected.
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: SyncError,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    /// Ids missing from the reference locale, now translated
    pub added: Vec<String>,
    /// Ids no longer in the source; reported only, never removed
    pub removed: Vec<String>,
    pub updated: Vec<FileUpdate>,
    pub failures: Vec<FileFailure>,
}

impl SyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.added.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub struct Workflow {
    config: TranslatorConfig,
    store: Arc<dyn CatalogueStore>,
    gateway: Arc<dyn TranslationGateway>,
}

impl Workflow {
    pub fn new(
        config: TranslatorConfig,
        store: Arc<dyn CatalogueStore>,
        gateway: Arc<dyn TranslationGateway>,
    ) -> Self {
        Self { config, store, gateway }
    }

    /// Workflow over the XLIFF files of the project at `root`.
    pub fn from_config<P: AsRef<Path>>(config: &Config, root: P) -> Result<Self> {
        let layout = ProjectLayout::new(root, &config.translator);
        let store = Arc::new(FsCatalogueRepository::new(layout));
        let gateway = GatewayFactory::create_gateway(&config.provider)?;
        Ok(Self::new(config.translator.clone(), store, gateway))
    }

    /// Translate the whole source catalogue into each target language and write
    /// one locale catalogue per language.
    ///
    /// Languages are processed one at a time in the given order, and the first
    /// failure stops the run. An empty `targets` uses the configured languages.
    /// Returns the names of the written files.
    pub async fn translate_all(&self, targets: &[String]) -> Result<Vec<String>> {
        let (from_language, configured) = self.config.languages()?;
        let targets = if targets.is_empty() { configured } else { targets };

        let source = self.store.load_source().await?;
        if source.is_empty() {
            return Err(SyncError::EmptyCatalogue);
        }
        let records: Vec<MessageRecord> = source.units.iter().map(MessageRecord::untranslated).collect();

        let mut written = Vec::with_capacity(targets.len());
        for (index, target) in targets.iter().enumerate() {
            info!("┌─ Translating {} messages to {} ({}/{}) ────────", records.len(), target, index + 1, targets.len());

            let translated = self
                .gateway
                .translate(&records, from_language, target)
                .await
                .map_err(|e| SyncError::from_translation(e, target))?;

            let name = self.store.locale_file_name(target);
            self.store.save(&name, &source.for_locale(target, translated)).await?;

            info!("└─ Created {}", name);
            written.push(name);
        }

        Ok(written)
    }

    /// Bring existing locale catalogues up to date with the source.
    ///
    /// The source is diffed against the catalogue of the first configured
    /// target language. Messages missing there are translated and merged into
    /// every locale catalogue. A rate-limit response aborts the pass; other
    /// failures are collected per file in the report.
    pub async fn sync_existing(&self) -> Result<SyncReport> {
        let (from_language, targets) = self.config.languages()?;
        let reference_locale = &targets[0];

        let source = self.store.load_source().await?;
        let reference = self.store.load_locale(reference_locale).await?;
        if source.is_empty() || reference.is_empty() {
            return Err(SyncError::EmptyCatalogue);
        }

        let reconciliation = self.reconcile(&source, &reference);
        let removed = reconciliation.removed_ids();
        if !removed.is_empty() {
            warn!(
                "{} messages in the {} catalogue no longer exist in the source and are kept: {}",
                removed.len(),
                reference_locale,
                removed.join(", ")
            );
        }

        if reconciliation.added.is_empty() {
            info!("No missing messages found in source catalogue");
            return Ok(SyncReport {
                removed,
                ..SyncReport::default()
            });
        }

        let names = self.store.list_locale_catalogue_names().await?;
        info!("Translating {} new messages into {} catalogues", reconciliation.added.len(), names.len());

        let job = Arc::new(LocaleJob {
            store: Arc::clone(&self.store),
            gateway: Arc::clone(&self.gateway),
            from_language: from_language.to_string(),
            added: reconciliation.added.iter().map(MessageRecord::untranslated).collect(),
            provider: Semaphore::new(1),
            aborted: AtomicBool::new(false),
        });

        let mut tasks = JoinSet::new();
        for name in names {
            let job = Arc::clone(&job);
            tasks.spawn(async move {
                let result = job.update_file(&name).await;
                (name, result)
            });
        }

        let mut report = SyncReport {
            added: reconciliation.added_ids(),
            removed,
            ..SyncReport::default()
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(Some(update)))) => report.updated.push(update),
                Ok((name, Ok(None))) => debug!("Skipped {} after abort", name),
                Ok((name, Err(e))) if e.is_rate_limited() => {
                    job.aborted.store(true, Ordering::SeqCst);
                    error!("Aborting sync while updating {}: {}", name, e);
                    // Writes already under way finish on their own
                    tasks.detach_all();
                    return Err(e);
                }
                Ok((name, Err(e))) => {
                    warn!("Failed to update {}: {}", name, e);
                    report.failures.push(FileFailure { file_name: name, error: e });
                }
                Err(e) => {
                    warn!("Locale update task failed: {}", e);
                    report.failures.push(FileFailure {
                        file_name: String::new(),
                        error: SyncError::Task(e.to_string()),
                    });
                }
            }
        }

        report.updated.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(report)
    }

    /// Diff the source against the reference locale without translating anything.
    pub async fn diff(&self) -> Result<Reconciliation> {
        let (_, targets) = self.config.languages()?;
        let source = self.store.load_source().await?;
        let reference = self.store.load_locale(&targets[0]).await?;
        Ok(self.reconcile(&source, &reference))
    }

    fn reconcile(&self, source: &Catalogue, reference: &Catalogue) -> Reconciliation {
        if self.config.strict_reconcile {
            reconcile_strict(source, reference)
        } else {
            reconcile(source, reference)
        }
    }
}

/// State shared by the per-file tasks of one incremental sync.
struct LocaleJob {
    store: Arc<dyn CatalogueStore>,
    gateway: Arc<dyn TranslationGateway>,
    from_language: String,
    added: Vec<MessageRecord>,
    /// One provider request at a time, granted in dispatch order
    provider: Semaphore,
    aborted: AtomicBool,
}

impl LocaleJob {
    /// Returns `None` when the pass was aborted before this file got its turn.
    async fn update_file(&self, name: &str) -> Result<Option<FileUpdate>> {
        // Queue for the provider first so turns follow dispatch order; the
        // file is read while waiting
        let (permit, catalogue) = tokio::join!(self.provider.acquire(), self.store.load_by_name(name));
        let permit = permit.map_err(|e| SyncError::Task(e.to_string()))?;
        if self.aborted.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let mut catalogue = catalogue?;

        let locale = catalogue
            .target_language
            .clone()
            .or_else(|| self.store.locale_from_file_name(name))
            .ok_or_else(|| SyncError::UnknownLocale(name.to_string()))?;

        let (missing, present): (Vec<&MessageRecord>, Vec<&MessageRecord>) =
            self.added.iter().partition(|record| !catalogue.contains(&record.id));
        if missing.is_empty() {
            debug!("{} already has all {} new messages", name, present.len());
            return Ok(Some(FileUpdate {
                file_name: name.to_string(),
                locale,
                appended: 0,
                kept: present.len(),
            }));
        }
        let batch: Vec<MessageRecord> = missing.into_iter().cloned().collect();

        debug!("Translating {} messages for {}", batch.len(), name);
        let translated = match self.gateway.translate(&batch, &self.from_language, &locale).await {
            Ok(translated) => translated,
            Err(e) => {
                let e = SyncError::from_translation(e, &locale);
                if e.is_rate_limited() {
                    self.aborted.store(true, Ordering::SeqCst);
                }
                return Err(e);
            }
        };
        drop(permit);

        if catalogue.target_language.is_none() {
            catalogue.target_language = Some(locale.clone());
        }
        let outcome = catalogue.merge(translated);
        self.store.save(name, &catalogue).await?;

        info!("Updated {} ({} appended)", name, outcome.appended);
        Ok(Some(FileUpdate {
            file_name: name.to_string(),
            locale,
            appended: outcome.appended,
            kept: present.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::translate::{MockTranslationGateway, TranslationError};

    /// Catalogues kept in memory, keyed by file name.
    struct MemoryStore {
        source: Catalogue,
        files: Mutex<BTreeMap<String, Catalogue>>,
        loads: Mutex<Vec<String>>,
        saves: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        fn new(source: Catalogue) -> Self {
            Self {
                source,
                files: Mutex::new(BTreeMap::new()),
                loads: Mutex::new(Vec::new()),
                saves: Mutex::new(Vec::new()),
            }
        }

        fn with_locale(self, locale: &str, ids: &[&str]) -> Self {
            let catalogue = self.source.for_locale(
                locale,
                ids.iter()
                    .map(|id| MessageRecord::new(*id, id.to_string()).translated(format!("{}-{}", locale, id)))
                    .collect(),
            );
            self.files
                .lock()
                .unwrap()
                .insert(format!("messages.{}.xlf", locale), catalogue);
            self
        }

        fn file(&self, name: &str) -> Catalogue {
            self.files.lock().unwrap()[name].clone()
        }

        fn saves(&self) -> Vec<String> {
            self.saves.lock().unwrap().clone()
        }

        fn loads(&self) -> Vec<String> {
            self.loads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogueStore for MemoryStore {
        async fn load_source(&self) -> Result<Catalogue> {
            Ok(self.source.clone())
        }

        async fn load_locale(&self, locale: &str) -> Result<Catalogue> {
            self.load_by_name(&self.locale_file_name(locale)).await
        }

        async fn list_locale_catalogue_names(&self) -> Result<Vec<String>> {
            Ok(self.files.lock().unwrap().keys().cloned().collect())
        }

        async fn load_by_name(&self, name: &str) -> Result<Catalogue> {
            self.loads.lock().unwrap().push(name.to_string());
            self.files.lock().unwrap().get(name).cloned().ok_or_else(|| SyncError::Read {
                path: name.to_string(),
                source: std::io::ErrorKind::NotFound.into(),
            })
        }

        async fn save(&self, name: &str, catalogue: &Catalogue) -> Result<()> {
            self.files.lock().unwrap().insert(name.to_string(), catalogue.clone());
            self.saves.lock().unwrap().push(name.to_string());
            Ok(())
        }

        fn locale_file_name(&self, locale: &str) -> String {
            format!("messages.{}.xlf", locale)
        }

        fn locale_from_file_name(&self, name: &str) -> Option<String> {
            crate::repository::legacy_locale_code(name)
        }
    }

    /// Yields inside every call, then notes which files the store had read by then.
    struct YieldingGateway {
        store: Arc<MemoryStore>,
        seen: Mutex<Vec<(String, Vec<String>)>>,
    }

    #[async_trait]
    impl TranslationGateway for YieldingGateway {
        async fn translate(
            &self,
            records: &[MessageRecord],
            _from_language: &str,
            to_language: &str,
        ) -> std::result::Result<Vec<MessageRecord>, TranslationError> {
            tokio::task::yield_now().await;
            self.seen
                .lock()
                .unwrap()
                .push((to_language.to_string(), self.store.loads()));
            Ok(records.iter().map(|r| r.translated(to_language)).collect())
        }
    }

    fn source(ids: &[&str]) -> Catalogue {
        Catalogue::new("en", ids.iter().map(|id| MessageRecord::new(*id, id.to_string())).collect())
    }

    fn config(targets: &[&str]) -> TranslatorConfig {
        let mut config = Config::default().translator;
        config.from_language = Some("en".to_string());
        config.to_language = targets.iter().map(|t| t.to_string()).collect();
        config
    }

    fn echo_gateway() -> MockTranslationGateway {
        let mut gateway = MockTranslationGateway::new();
        gateway.expect_translate().returning(|records, _from, to| {
            Ok(records
                .iter()
                .map(|record| record.translated(format!("{}-{}", to, record.source)))
                .collect())
        });
        gateway
    }

    #[tokio::test]
    async fn test_translate_all_writes_one_catalogue_per_language_in_order() {
        let store = Arc::new(MemoryStore::new(source(&["a", "b", "c"])));
        let workflow = Workflow::new(config(&["fr", "de"]), store.clone(), Arc::new(echo_gateway()));

        let written = workflow.translate_all(&[]).await.unwrap();

        assert_eq!(written, vec!["messages.fr.xlf", "messages.de.xlf"]);
        assert_eq!(store.saves(), written);
        for (locale, name) in [("fr", "messages.fr.xlf"), ("de", "messages.de.xlf")] {
            let catalogue = store.file(name);
            assert_eq!(catalogue.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
            assert_eq!(catalogue.target_language.as_deref(), Some(locale));
            assert_eq!(catalogue.units[2].target, Some(format!("{}-c", locale)));
        }
    }

    #[tokio::test]
    async fn test_translate_all_stops_at_first_failure() {
        let store = Arc::new(MemoryStore::new(source(&["a"])));
        let mut gateway = MockTranslationGateway::new();
        gateway
            .expect_translate()
            .withf(|_, _, to| to == "fr")
            .times(1)
            .returning(|records, _, _| Ok(records.iter().map(|r| r.translated("x")).collect()));
        gateway
            .expect_translate()
            .withf(|_, _, to| to == "de")
            .times(1)
            .returning(|_, _, _| Err(TranslationError::Provider("unsupported".to_string())));

        let workflow = Workflow::new(config(&["fr", "de", "es"]), store.clone(), Arc::new(gateway));
        let error = workflow.translate_all(&[]).await.unwrap_err();

        assert!(matches!(error, SyncError::Provider { ref locale, .. } if locale == "de"));
        assert_eq!(store.saves(), vec!["messages.fr.xlf"]);
    }

    #[tokio::test]
    async fn test_configuration_is_checked_before_any_io() {
        let store = Arc::new(MemoryStore::new(source(&["a"])));
        let mut gateway = MockTranslationGateway::new();
        gateway.expect_translate().times(0);
        let gateway = Arc::new(gateway);

        let mut missing_from = config(&["fr"]);
        missing_from.from_language = None;
        let workflow = Workflow::new(missing_from, store.clone(), gateway.clone());
        assert!(matches!(workflow.translate_all(&[]).await, Err(SyncError::NoFromLanguage)));

        let workflow = Workflow::new(config(&[]), store.clone(), gateway);
        assert!(matches!(workflow.sync_existing().await, Err(SyncError::NoToLanguage)));
        assert!(store.saves().is_empty());
    }

    #[tokio::test]
    async fn test_sync_appends_missing_message() {
        let store = Arc::new(MemoryStore::new(source(&["a", "b", "c"])).with_locale("fr", &["a", "b"]));
        let before = store.file("messages.fr.xlf");

        let mut gateway = MockTranslationGateway::new();
        gateway
            .expect_translate()
            .withf(|records, from, to| records.len() == 1 && records[0].id == "c" && from == "en" && to == "fr")
            .times(1)
            .returning(|records, _, _| Ok(vec![records[0].translated("texte c")]));

        let workflow = Workflow::new(config(&["fr"]), store.clone(), Arc::new(gateway));
        let report = workflow.sync_existing().await.unwrap();

        assert_eq!(report.added, vec!["c"]);
        assert!(report.removed.is_empty());
        assert_eq!(
            report.updated,
            vec![FileUpdate {
                file_name: "messages.fr.xlf".to_string(),
                locale: "fr".to_string(),
                appended: 1,
                kept: 0,
            }]
        );

        let fr = store.file("messages.fr.xlf");
        assert_eq!(fr.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(&fr.units[..2], &before.units[..]);
        assert_eq!(fr.units[2].target.as_deref(), Some("texte c"));
    }

    #[tokio::test]
    async fn test_sync_only_sends_ids_a_file_is_missing() {
        let store = Arc::new(
            MemoryStore::new(source(&["a", "b", "c", "d"]))
                .with_locale("fr", &["a", "b"])
                .with_locale("de", &["a", "b", "c"])
                .with_locale("es", &["a", "b", "c", "d"]),
        );
        let de_before = store.file("messages.de.xlf");
        let es_before = store.file("messages.es.xlf");

        let mut gateway = MockTranslationGateway::new();
        gateway
            .expect_translate()
            .withf(|records, _, to| to == "fr" && records.iter().map(|r| r.id.as_str()).eq(["c", "d"]))
            .times(1)
            .returning(|records, _, _| Ok(records.iter().map(|r| r.translated("fr")).collect()));
        gateway
            .expect_translate()
            .withf(|records, _, to| to == "de" && records.iter().map(|r| r.id.as_str()).eq(["d"]))
            .times(1)
            .returning(|records, _, _| Ok(records.iter().map(|r| r.translated("de")).collect()));
        gateway.expect_translate().withf(|_, _, to| to == "es").times(0);

        let workflow = Workflow::new(config(&["fr"]), store.clone(), Arc::new(gateway));
        let report = workflow.sync_existing().await.unwrap();

        let counts: Vec<_> = report
            .updated
            .iter()
            .map(|update| (update.file_name.as_str(), update.appended, update.kept))
            .collect();
        assert_eq!(
            counts,
            vec![("messages.de.xlf", 1, 1), ("messages.es.xlf", 0, 2), ("messages.fr.xlf", 2, 0)]
        );

        let de = store.file("messages.de.xlf");
        assert_eq!(&de.units[..3], &de_before.units[..]);
        assert_eq!(de.get("c").unwrap().target.as_deref(), Some("de-c"));
        assert_eq!(store.file("messages.es.xlf"), es_before);
        assert!(!store.saves().contains(&"messages.es.xlf".to_string()));
    }

    #[tokio::test]
    async fn test_sync_is_noop_when_counts_match() {
        let store = Arc::new(MemoryStore::new(source(&["a", "b"])).with_locale("fr", &["a", "b"]));
        let mut gateway = MockTranslationGateway::new();
        gateway.expect_translate().times(0);

        let workflow = Workflow::new(config(&["fr"]), store.clone(), Arc::new(gateway));
        let report = workflow.sync_existing().await.unwrap();

        assert!(report.is_up_to_date());
        assert!(store.saves().is_empty());
    }

    #[tokio::test]
    async fn test_stale_messages_are_reported_and_kept() {
        let store = Arc::new(MemoryStore::new(source(&["a"])).with_locale("fr", &["a", "old"]));
        let mut gateway = MockTranslationGateway::new();
        gateway.expect_translate().times(0);

        let workflow = Workflow::new(config(&["fr"]), store.clone(), Arc::new(gateway));
        let report = workflow.sync_existing().await.unwrap();

        assert!(report.is_up_to_date());
        assert_eq!(report.removed, vec!["old"]);
        assert_eq!(store.file("messages.fr.xlf").len(), 2);
    }

    #[tokio::test]
    async fn test_empty_catalogues_are_fatal() {
        let store = Arc::new(MemoryStore::new(source(&["a"])).with_locale("fr", &[]));
        let workflow = Workflow::new(config(&["fr"]), store, Arc::new(echo_gateway()));
        assert!(matches!(workflow.sync_existing().await, Err(SyncError::EmptyCatalogue)));
    }

    #[tokio::test]
    async fn test_strict_reconcile_sees_renames_with_equal_counts() {
        let store = Arc::new(MemoryStore::new(source(&["a", "new"])).with_locale("fr", &["a", "old"]));

        let workflow = Workflow::new(config(&["fr"]), store.clone(), Arc::new(echo_gateway()));
        assert!(workflow.diff().await.unwrap().is_in_sync());

        let mut strict = config(&["fr"]);
        strict.strict_reconcile = true;
        let workflow = Workflow::new(strict, store.clone(), Arc::new(echo_gateway()));
        let report = workflow.sync_existing().await.unwrap();

        assert_eq!(report.added, vec!["new"]);
        assert_eq!(report.removed, vec!["old"]);
        assert_eq!(store.file("messages.fr.xlf").ids().collect::<Vec<_>>(), vec!["a", "old", "new"]);
    }

    #[tokio::test]
    async fn test_provider_failure_on_one_file_does_not_stop_others() {
        let store = Arc::new(
            MemoryStore::new(source(&["a", "b"]))
                .with_locale("de", &["a"])
                .with_locale("fr", &["a"]),
        );
        let mut gateway = MockTranslationGateway::new();
        gateway.expect_translate().returning(|records, _, to| {
            if to == "de" {
                Err(TranslationError::Untranslatable {
                    id: "b".to_string(),
                    reason: "no text".to_string(),
                })
            } else {
                Ok(records.iter().map(|r| r.translated("fr")).collect())
            }
        });

        let workflow = Workflow::new(config(&["fr", "de"]), store.clone(), Arc::new(gateway));
        let report = workflow.sync_existing().await.unwrap();

        assert!(report.has_failures());
        assert_eq!(report.failures[0].file_name, "messages.de.xlf");
        assert!(matches!(report.failures[0].error, SyncError::Untranslatable { ref id, .. } if id == "b"));
        assert_eq!(report.updated.len(), 1);
        assert_eq!(store.file("messages.fr.xlf").len(), 2);
        assert_eq!(store.file("messages.de.xlf").len(), 1);
    }

    #[tokio::test]
    async fn test_files_are_read_while_waiting_for_the_provider() {
        let store = Arc::new(
            MemoryStore::new(source(&["a", "b"]))
                .with_locale("de", &["a"])
                .with_locale("es", &["a"])
                .with_locale("fr", &["a"]),
        );
        let gateway = Arc::new(YieldingGateway {
            store: store.clone(),
            seen: Mutex::new(Vec::new()),
        });

        let workflow = Workflow::new(config(&["de"]), store.clone(), gateway.clone());
        let report = workflow.sync_existing().await.unwrap();
        assert_eq!(report.updated.len(), 3);

        let seen = gateway.seen.lock().unwrap().clone();
        let locales: Vec<&str> = seen.iter().map(|(locale, _)| locale.as_str()).collect();
        assert_eq!(locales, vec!["de", "es", "fr"]);
        // Reference load, then every locale file before the first provider call returns
        assert_eq!(
            seen[0].1,
            vec!["messages.de.xlf", "messages.de.xlf", "messages.es.xlf", "messages.fr.xlf"]
        );
    }

    #[tokio::test]
    async fn test_rate_limit_aborts_remaining_files() {
        let store = Arc::new(
            MemoryStore::new(source(&["a", "b"]))
                .with_locale("de", &["a"])
                .with_locale("es", &["a"])
                .with_locale("fr", &["a"]),
        );
        let mut gateway = MockTranslationGateway::new();
        gateway
            .expect_translate()
            .withf(|_, _, to| to == "de")
            .times(1)
            .returning(|records, _, _| Ok(records.iter().map(|r| r.translated("de")).collect()));
        gateway
            .expect_translate()
            .withf(|_, _, to| to == "es")
            .times(1)
            .returning(|_, _, _| Err(TranslationError::RateLimited));
        gateway
            .expect_translate()
            .withf(|_, _, to| to == "fr")
            .times(0);

        let workflow = Workflow::new(config(&["de"]), store.clone(), Arc::new(gateway));
        let error = workflow.sync_existing().await.unwrap_err();

        assert!(error.is_rate_limited());
        assert!(matches!(error, SyncError::RateLimited { ref locale } if locale == "es"));
        assert_eq!(store.file("messages.fr.xlf").len(), 1);
        assert_eq!(store.file("messages.es.xlf").len(), 1);
    }
}
