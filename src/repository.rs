use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::catalogue::Catalogue;
use crate::config::TranslatorConfig;
use crate::error::{Result, SyncError};
use crate::xliff::{self, FILE_EXTENSION};

/// Where catalogues live for one project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub base_name: String,
}

impl ProjectLayout {
    pub fn new<P: AsRef<Path>>(root: P, config: &TranslatorConfig) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            source: root.join(&config.source),
            output_dir: root.join(&config.output_path),
            base_name: config.output_file_name.clone(),
            root,
        }
    }

    /// `<base>.<locale>.xlf`
    pub fn locale_file_name(&self, locale: &str) -> String {
        format!("{}.{}.{}", self.base_name, locale, FILE_EXTENSION)
    }

    pub fn catalogue_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Locale code encoded in a catalogue file name, if it follows the naming convention.
    pub fn locale_from_file_name(&self, name: &str) -> Option<String> {
        let locale = name
            .strip_prefix(self.base_name.as_str())?
            .strip_prefix('.')?
            .strip_suffix(FILE_EXTENSION)?
            .strip_suffix('.')?;
        (!locale.is_empty()).then(|| locale.to_string())
    }

    /// Path for log output, relative to the project root when possible.
    pub fn display(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.root)
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }
}

/// Second `.`-separated field of a file name, e.g. `fr` in `messages.fr.xlf`.
///
/// Kept for catalogues written by older tooling; breaks when the base name or
/// the locale code contains a dot.
pub fn legacy_locale_code(file_name: &str) -> Option<String> {
    file_name
        .split('.')
        .nth(1)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

/// Storage of source and locale catalogues.
#[async_trait]
pub trait CatalogueStore: Send + Sync {
    async fn load_source(&self) -> Result<Catalogue>;

    async fn load_locale(&self, locale: &str) -> Result<Catalogue>;

    /// File names of all locale catalogues, sorted.
    async fn list_locale_catalogue_names(&self) -> Result<Vec<String>>;

    async fn load_by_name(&self, name: &str) -> Result<Catalogue>;

    async fn save(&self, name: &str, catalogue: &Catalogue) -> Result<()>;

    /// File name a catalogue for `locale` is stored under.
    fn locale_file_name(&self, locale: &str) -> String;

    /// Locale code for a stored catalogue file name.
    fn locale_from_file_name(&self, name: &str) -> Option<String>;
}

/// Catalogue store backed by XLIFF files on disk.
pub struct FsCatalogueRepository {
    layout: ProjectLayout,
}

impl FsCatalogueRepository {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    async fn read_catalogue(&self, path: &Path) -> Result<Catalogue> {
        let display_path = self.layout.display(path);
        debug!("Reading catalogue {}", display_path);

        let content = fs::read_to_string(path).await.map_err(|e| SyncError::Read {
            path: display_path.clone(),
            source: e,
        })?;

        xliff::parse_catalogue(&content).map_err(|e| SyncError::Parse {
            path: display_path,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogueStore for FsCatalogueRepository {
    async fn load_source(&self) -> Result<Catalogue> {
        self.read_catalogue(&self.layout.source).await
    }

    async fn load_locale(&self, locale: &str) -> Result<Catalogue> {
        let path = self.layout.catalogue_path(&self.layout.locale_file_name(locale));
        self.read_catalogue(&path).await
    }

    async fn list_locale_catalogue_names(&self) -> Result<Vec<String>> {
        let dir = &self.layout.output_dir;
        let source = std::fs::canonicalize(&self.layout.source).ok();
        let mut names = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| SyncError::Read {
                path: self.layout.display(dir),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            // The source may sit in the output directory under a locale-shaped name
            let is_source = entry.path() == self.layout.source
                || (source.is_some() && std::fs::canonicalize(entry.path()).ok() == source);
            if is_source {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.layout.locale_from_file_name(&name).is_some() {
                names.push(name);
            }
        }

        names.sort();
        debug!("Found {} locale catalogues in {}", names.len(), self.layout.display(dir));
        Ok(names)
    }

    async fn load_by_name(&self, name: &str) -> Result<Catalogue> {
        self.read_catalogue(&self.layout.catalogue_path(name)).await
    }

    async fn save(&self, name: &str, catalogue: &Catalogue) -> Result<()> {
        let path = self.layout.catalogue_path(name);
        let display_path = self.layout.display(&path);
        let xml = xliff::to_xml(catalogue)?;

        fs::create_dir_all(&self.layout.output_dir)
            .await
            .map_err(|e| SyncError::Write {
                path: self.layout.display(&self.layout.output_dir),
                source: e,
            })?;

        // Write next to the target and rename, so readers never see half a file
        let dir = self.layout.output_dir.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut file = tempfile::NamedTempFile::new_in(&dir)?;
            file.write_all(xml.as_bytes())?;
            file.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| SyncError::Task(e.to_string()))?
        .map_err(|e| SyncError::Write {
            path: display_path.clone(),
            source: e,
        })?;

        info!("Wrote {} ({} messages)", display_path, catalogue.len());
        Ok(())
    }

    fn locale_file_name(&self, locale: &str) -> String {
        self.layout.locale_file_name(locale)
    }

    fn locale_from_file_name(&self, name: &str) -> Option<String> {
        self.layout
            .locale_from_file_name(name)
            .or_else(|| legacy_locale_code(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::MessageRecord;
    use crate::config::Config;

    fn repository(root: &Path) -> FsCatalogueRepository {
        FsCatalogueRepository::new(ProjectLayout::new(root, &Config::default().translator))
    }

    #[test]
    fn test_locale_file_naming() {
        let layout = ProjectLayout::new("/app", &Config::default().translator);

        assert_eq!(layout.locale_file_name("fr"), "messages.fr.xlf");
        assert_eq!(layout.catalogue_path("messages.fr.xlf"), PathBuf::from("/app/src/locale/messages.fr.xlf"));
        assert_eq!(layout.locale_from_file_name("messages.fr.xlf").as_deref(), Some("fr"));
        assert_eq!(layout.locale_from_file_name("messages.zh.Hant.xlf").as_deref(), Some("zh.Hant"));
        assert_eq!(layout.locale_from_file_name("messages.xlf"), None);
        assert_eq!(layout.locale_from_file_name("other.fr.xlf"), None);
        assert_eq!(layout.locale_from_file_name("messages.fr.json"), None);
    }

    #[test]
    fn test_legacy_locale_code_splits_on_dots() {
        assert_eq!(legacy_locale_code("messages.fr.xlf").as_deref(), Some("fr"));
        // The legacy rule truncates dotted codes
        assert_eq!(legacy_locale_code("messages.zh.Hant.xlf").as_deref(), Some("zh"));
        assert_eq!(legacy_locale_code("messages"), None);
    }

    #[tokio::test]
    async fn test_save_list_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let repository = repository(dir.path());
        let catalogue = Catalogue::new("en", vec![MessageRecord::new("a", "A").translated("Ah")]);

        repository.save("messages.fr.xlf", &catalogue.for_locale("fr", catalogue.units.clone())).await.unwrap();
        repository.save("messages.de.xlf", &catalogue.for_locale("de", catalogue.units.clone())).await.unwrap();
        std::fs::write(dir.path().join("src/locale/messages.xlf"), "<xliff/>").unwrap();
        std::fs::write(dir.path().join("src/locale/notes.txt"), "").unwrap();

        let names = repository.list_locale_catalogue_names().await.unwrap();
        assert_eq!(names, vec!["messages.de.xlf", "messages.fr.xlf"]);

        let fr = repository.load_locale("fr").await.unwrap();
        assert_eq!(fr.target_language.as_deref(), Some("fr"));
        assert_eq!(fr.units[0].target.as_deref(), Some("Ah"));
        assert_eq!(repository.load_by_name("messages.fr.xlf").await.unwrap(), fr);
    }

    #[tokio::test]
    async fn test_source_is_never_listed_as_a_locale() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default().translator;
        config.source = PathBuf::from("src/locale/messages.en.xlf");
        let repository = FsCatalogueRepository::new(ProjectLayout::new(dir.path(), &config));

        let catalogue = Catalogue::new("en", vec![MessageRecord::new("a", "A")]);
        repository.save("messages.en.xlf", &catalogue).await.unwrap();
        repository.save("messages.fr.xlf", &catalogue.for_locale("fr", catalogue.units.clone())).await.unwrap();

        let names = repository.list_locale_catalogue_names().await.unwrap();
        assert_eq!(names, vec!["messages.fr.xlf"]);
        assert_eq!(repository.load_source().await.unwrap(), catalogue);
    }

    #[tokio::test]
    async fn test_missing_output_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = repository(dir.path()).list_locale_catalogue_names().await;
        assert!(matches!(result, Err(SyncError::Read { .. })));
    }

    #[tokio::test]
    async fn test_malformed_catalogue_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/locale")).unwrap();
        std::fs::write(dir.path().join("src/locale/messages.xlf"), "<xliff><file><body></xliff>").unwrap();

        match repository(dir.path()).load_source().await {
            Err(SyncError::Parse { path, .. }) => assert!(path.ends_with("messages.xlf")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
