//! xlf-sync - XLIFF catalogue synchronization
//!
//! Command-line entry point: loads the project configuration, sets up logging
//! and runs one of the sync workflows.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xlf_sync::cli::{parse_language_list, Args, Commands};
use xlf_sync::config::{Config, ProviderKind, CONFIG_FILE_NAME};
use xlf_sync::error::SyncError;
use xlf_sync::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    let _guard = setup_logging(&args.root, args.verbose)?;

    if let Err(e) = run(args).await {
        match e.downcast_ref::<SyncError>().and_then(SyncError::code) {
            Some(code) => error!("Error {}: {}", code, e),
            None => error!("{:#}", e),
        }
        return Err(e);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let root = args.root.as_path();
    let config_path = args.config.as_deref();

    match args.command {
        Commands::Init { project, force } => {
            init_config(root, project.as_deref(), force)?;
        }
        Commands::Translate { target_langs, provider } => {
            let mut config = load_config(root, config_path)?;
            if let Some(provider) = provider {
                config.provider.kind = parse_provider_kind(&provider)?;
            }
            let targets = target_langs
                .as_deref()
                .map(parse_language_list)
                .unwrap_or_default();

            info!("Translating source catalogue of project '{}'", config.project);
            let workflow = Workflow::from_config(&config, root)?;
            let written = workflow.translate_all(&targets).await?;

            for name in &written {
                println!("created {}", name);
            }
        }
        Commands::Sync { strict, provider } => {
            let mut config = load_config(root, config_path)?;
            if let Some(provider) = provider {
                config.provider.kind = parse_provider_kind(&provider)?;
            }
            config.translator.strict_reconcile |= strict;

            info!("Checking locale catalogues of project '{}'", config.project);
            let workflow = Workflow::from_config(&config, root)?;
            let report = workflow.sync_existing().await?;

            if report.is_up_to_date() {
                println!("All catalogues are up to date");
            }
            for update in &report.updated {
                if update.appended == 0 {
                    println!("unchanged {} ({}): already has every new message", update.file_name, update.locale);
                    continue;
                }
                println!(
                    "updated {} ({}): {} added, {} existing translations kept",
                    update.file_name, update.locale, update.appended, update.kept
                );
            }
            if !report.removed.is_empty() {
                println!(
                    "{} messages no longer in the source were kept: {}",
                    report.removed.len(),
                    report.removed.join(", ")
                );
            }
            for failure in &report.failures {
                println!("failed {}: {}", failure.file_name, failure.error);
            }
            if report.has_failures() {
                bail!("{} locale catalogues could not be updated", report.failures.len());
            }
        }
        Commands::Diff { strict } => {
            let mut config = load_config(root, config_path)?;
            config.translator.strict_reconcile |= strict;
            let workflow = Workflow::from_config(&config, root)?;
            let diff = workflow.diff().await?;

            if diff.is_in_sync() {
                println!("No missing messages found in source catalogue");
            }
            for record in &diff.added {
                println!("+ {}", record.id);
            }
            for record in &diff.removed {
                println!("- {}", record.id);
            }
        }
    }

    info!("xlf-sync completed successfully");
    Ok(())
}

fn load_config(root: &Path, explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::discover(root).with_context(|| {
            format!(
                "No configuration found in {}, run `xlf-sync init` first",
                root.display()
            )
        })?,
    };

    info!("Loading configuration from {}", path.display());
    let config = Config::from_file(&path)?;
    config.validate()?;
    Ok(config)
}

fn init_config(root: &Path, project: Option<&str>, force: bool) -> Result<()> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite it", path.display());
    }

    let project = match project {
        Some(project) => project.to_string(),
        None => std::fs::canonicalize(root)?
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    if project.is_empty() {
        warn!("Could not derive a project name, edit {} before syncing", path.display());
    }

    Config::template(&project).save_to_file(&path)?;
    println!("wrote {}", path.display());
    Ok(())
}

/// Parse translation provider from string
fn parse_provider_kind(kind: &str) -> Result<ProviderKind> {
    match kind.to_lowercase().as_str() {
        "google" => Ok(ProviderKind::Google),
        "copy" => Ok(ProviderKind::Copy),
        _ => Err(SyncError::Config(format!(
            "Invalid provider '{}'. Valid providers: google, copy",
            kind
        ))
        .into()),
    }
}

/// Setup logging to both console and file
fn setup_logging(root: &Path, verbose: bool) -> Result<WorkerGuard> {
    let log_dir = root.join(".xlf-sync").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "xlf-sync.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("xlf-sync.log").display());

    Ok(guard)
}
