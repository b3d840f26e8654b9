//! Headless client for the LFME prediction service.
//!
//! Reads an image from disk, runs it through the shared intake rules, submits it
//! to `/api/predict` or `/api/predict-all` and renders the normalized result.

pub mod args;
pub mod client;
pub mod report;

use args::CliArgs;
use client::{load_image, PredictionClient};
use shared::{ApiConfig, CategoryTable, PipelineError, Translator};
use std::path::{Path, PathBuf};

pub const BASE_URL_ENV: &str = "LFME_API_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Usage error: {0}")]
    Usage(String),
}

/// Loads the client config, falling back to defaults when `path` does not exist,
/// then applies the base URL override if one is set.
pub fn resolve_config(path: &Path, base_url_override: Option<String>) -> Result<ApiConfig, CliError> {
    let config = if path.exists() {
        ApiConfig::load(path)?
    } else {
        log::info!("{} not found, using built-in defaults", path.display());
        ApiConfig::default()
    };

    match base_url_override.filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            log::info!("Base URL overridden by {}", BASE_URL_ENV);
            Ok(config.with_base_url(url)?)
        }
        None => Ok(config),
    }
}

pub fn load_config(path: &Path) -> Result<ApiConfig, CliError> {
    resolve_config(path, std::env::var(BASE_URL_ENV).ok())
}

/// Runs one prediction and returns the rendered report.
pub async fn run_with_config(args: &CliArgs, config: ApiConfig) -> Result<String, CliError> {
    let translator = Translator::embedded()?.with_locale(args.locale);
    let categories = CategoryTable::pacs();

    let file = load_image(&args.image)?;
    let request = args.build_request(&file)?;

    let mut client = PredictionClient::new(config, categories)?;
    let outcome = client.send(&request).await?;

    Ok(report::render(&outcome, &translator, args.top))
}

pub async fn run(args: &CliArgs) -> Result<String, CliError> {
    let config = load_config(&args.config)?;
    run_with_config(args, config).await
}
