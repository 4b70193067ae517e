use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, SyncError};

/// Default project configuration file name
pub const CONFIG_FILE_NAME: &str = "xlf-sync.toml";
/// Configuration file name used by older JavaScript-based setups
pub const LEGACY_CONFIG_FILE_NAME: &str = "translator.config.json";
/// Base name of generated locale catalogues
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "messages";

fn default_output_file_name() -> String {
    DEFAULT_OUTPUT_FILE_NAME.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    100
}

fn default_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project name, shown in logs
    #[serde(default)]
    pub project: String,
    pub translator: TranslatorConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Language of the source catalogue
    #[serde(default)]
    pub from_language: Option<String>,
    /// Target languages; the first one is the reference for incremental sync
    #[serde(default)]
    pub to_language: Vec<String>,
    /// Source catalogue path, relative to the project root
    pub source: PathBuf,
    /// Directory holding locale catalogues, relative to the project root
    pub output_path: PathBuf,
    /// Locale catalogues are named `<output_file_name>.<locale>.xlf`
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
    /// Diff ids even when the source and reference have the same length
    #[serde(default)]
    pub strict_reconcile: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Google Cloud Translation v2
    Google,
    /// Copy source text into targets, no network
    Copy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Base URL of the translation API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key; falls back to the GOOGLE_TRANSLATE_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum messages per provider request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Google,
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: String::new(),
            translator: TranslatorConfig {
                from_language: None,
                to_language: Vec::new(),
                source: PathBuf::from("src/locale/messages.xlf"),
                output_path: PathBuf::from("src/locale"),
                output_file_name: default_output_file_name(),
                strict_reconcile: false,
            },
            provider: ProviderConfig::default(),
        }
    }
}

/// `translator.config.json` as written for the JavaScript tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyConfig {
    #[serde(default)]
    from_language: Option<String>,
    #[serde(default)]
    to_language: Vec<String>,
    source: String,
    output_path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PackageJson {
    name: Option<String>,
}

impl Config {
    /// Starter configuration written by `xlf-sync init`.
    pub fn template(project: &str) -> Self {
        let mut config = Self::default();
        config.project = project.to_string();
        config.translator.from_language = Some("en".to_string());
        config.translator.to_language = vec!["fr".to_string()];
        config
    }

    /// Load a TOML config, or the legacy JSON layout when the file ends in `.json`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("Failed to read config file: {}", e)))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            let project = path.parent().map(project_name_near).unwrap_or_default();
            return Self::from_legacy_json(&content, &project);
        }

        Ok(toml::from_str(&content)?)
    }

    pub fn from_legacy_json(content: &str, project: &str) -> Result<Self> {
        let legacy: LegacyConfig = serde_json::from_str(content)?;

        let mut config = Self::default();
        config.project = project.to_string();
        config.translator.from_language = legacy.from_language.filter(|lang| !lang.is_empty());
        config.translator.to_language = legacy.to_language;
        // Paths were appended to the app root verbatim, so "/src/..." is root-relative
        config.translator.source = PathBuf::from(legacy.source.trim_start_matches('/'));
        config.translator.output_path = PathBuf::from(legacy.output_path.trim_start_matches('/'));
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SyncError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SyncError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Look for a config file in `root`, preferring the TOML file.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        [CONFIG_FILE_NAME, LEGACY_CONFIG_FILE_NAME]
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(SyncError::NoProjectName);
        }
        self.translator.languages()?;
        Ok(())
    }
}

impl TranslatorConfig {
    /// The source language and the non-empty list of targets.
    pub fn languages(&self) -> Result<(&str, &[String])> {
        let from = self
            .from_language
            .as_deref()
            .filter(|lang| !lang.trim().is_empty())
            .ok_or(SyncError::NoFromLanguage)?;
        if self.to_language.is_empty() {
            return Err(SyncError::NoToLanguage);
        }
        Ok((from, &self.to_language))
    }
}

/// Project name from a sibling package.json, else the directory name.
fn project_name_near(dir: &Path) -> String {
    let from_package = std::fs::read_to_string(dir.join("package.json"))
        .ok()
        .and_then(|content| serde_json::from_str::<PackageJson>(&content).ok())
        .and_then(|package| package.name);

    from_package.unwrap_or_else(|| {
        let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
        std::fs::canonicalize(dir)
            .ok()
            .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
            .unwrap_or_default()
    })
}
