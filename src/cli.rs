use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path (defaults to xlf-sync.toml or translator.config.json in the project root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project root that catalogue paths are relative to
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter xlf-sync.toml into the project root
    Init {
        /// Project name (defaults to the root directory name)
        #[arg(short, long)]
        project: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Translate the whole source catalogue into new locale catalogues
    Translate {
        /// Target languages (comma-separated), overrides the configured list
        #[arg(short, long)]
        target_langs: Option<String>,

        /// Translation provider (google, copy), overrides the configured one
        #[arg(long)]
        provider: Option<String>,
    },

    /// Add messages new in the source catalogue to every existing locale catalogue
    Sync {
        /// Compare message ids even when catalogue sizes match
        #[arg(long)]
        strict: bool,

        /// Translation provider (google, copy), overrides the configured one
        #[arg(long)]
        provider: Option<String>,
    },

    /// Show messages added to or removed from the source catalogue
    Diff {
        /// Compare message ids even when catalogue sizes match
        #[arg(long)]
        strict: bool,
    },
}

/// Split a comma-separated language list, dropping empty entries.
pub fn parse_language_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_list() {
        assert_eq!(parse_language_list("fr, de,,es "), vec!["fr", "de", "es"]);
        assert!(parse_language_list(" ").is_empty());
    }

    #[test]
    fn test_parse_sync_command() {
        let args = Args::parse_from(["xlf-sync", "-v", "--root", "app", "sync", "--strict"]);
        assert!(args.verbose);
        assert_eq!(args.root, PathBuf::from("app"));
        assert!(matches!(args.command, Commands::Sync { strict: true, provider: None }));
    }
}
