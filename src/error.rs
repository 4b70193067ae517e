use thiserror::Error;

use crate::translate::TranslationError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Add a project name, translated catalogues need somewhere to live")]
    NoProjectName,

    #[error("The language of the source catalogue is unknown, set translator.from_language")]
    NoFromLanguage,

    #[error("No target language configured, add at least one code to translator.to_language")]
    NoToLanguage,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XLIFF document: {0}")]
    Malformed(String),

    #[error("Malformed catalogue {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Duplicate message id '{0}'")]
    DuplicateId(String),

    #[error("Message catalogues or the source catalogue seem to be empty")]
    EmptyCatalogue,

    #[error("Cannot determine the locale of catalogue file '{0}'")]
    UnknownLocale(String),

    #[error("The translation provider is rate limiting requests for '{locale}', wait before trying again")]
    RateLimited { locale: String },

    #[error("Could not translate to '{locale}': {message}")]
    Provider { locale: String, message: String },

    #[error("Could not translate message '{id}' to '{locale}': {reason}")]
    Untranslatable {
        locale: String,
        id: String,
        reason: String,
    },

    #[error("Task failed: {0}")]
    Task(String),
}

impl SyncError {
    /// Attach the target locale to a gateway failure.
    pub fn from_translation(error: TranslationError, locale: &str) -> Self {
        let locale = locale.to_string();
        match error {
            TranslationError::RateLimited => Self::RateLimited { locale },
            TranslationError::Provider(message) => Self::Provider { locale, message },
            TranslationError::Untranslatable { id, reason } => {
                Self::Untranslatable { locale, id, reason }
            }
        }
    }

    /// Stable machine-readable code for configuration and provider failures.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::NoProjectName => Some(1000),
            Self::NoFromLanguage => Some(1001),
            Self::NoToLanguage => Some(1002),
            Self::RateLimited { .. } => Some(1003),
            Self::Provider { .. } | Self::Untranslatable { .. } => Some(1004),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
