use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use artifact_uploader::cli::{Args, Commands};
use artifact_uploader::cloud::s3::S3Gateway;
use artifact_uploader::config::DeployConfig;
use artifact_uploader::models::{object_key, CompiledTemplate};
use artifact_uploader::security::safe_error_message;
use artifact_uploader::upload::template::template_key;
use artifact_uploader::upload::{select, UploadOrchestrator};
use artifact_uploader::utils::size::format_kilobytes;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    if let Some(Commands::InitConfig { path }) = &args.command {
        info!("Creating sample configuration file at {}", path.display());
        DeployConfig::create_sample_config_file(path)?;
        info!("Configuration created successfully");
        return Ok(());
    }

    let config = load_and_process_config(&args)?;
    let artifact_directory = config.artifact_directory_name(Utc::now());

    if let Some(Commands::Plan) = &args.command {
        return print_plan(&config, &artifact_directory);
    }

    let template = load_template(&config.template_path()?)?;
    upload(&config, &artifact_directory, &template)?;

    info!("Upload completed successfully");
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Load configuration, expand environment variables and apply CLI overrides
fn load_and_process_config(args: &Args) -> Result<DeployConfig> {
    let mut config = DeployConfig::from_yaml_file(&args.config)?;
    config.process_environment_variables()?;
    args.apply_overrides(&mut config);
    config.validate()
        .context(format!("Invalid configuration in {}", args.config.display()))?;
    Ok(config)
}

fn load_template(path: &Path) -> Result<CompiledTemplate> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read compiled template: {}", path.display()))?;
    serde_json::from_str(&content)
        .context(format!("Compiled template {} is not valid JSON", path.display()))
}

fn print_plan(config: &DeployConfig, artifact_directory: &str) -> Result<()> {
    let selected = select(&config.package).map_err(|e| anyhow!(safe_error_message("Invalid packaging", &e)))?;

    info!("Bucket: {}", config.provider.bucket);
    info!("  {}", template_key(artifact_directory));
    for descriptor in &selected {
        let name = descriptor.file_name().unwrap_or_default();
        info!(
            "  {}  <- {} ({})",
            object_key(artifact_directory, &name),
            descriptor.source_path.display(),
            descriptor.kind
        );
    }
    Ok(())
}

fn upload(config: &DeployConfig, artifact_directory: &str, template: &CompiledTemplate) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let _guard = runtime.enter();

    let target = config.target();
    let gateway = S3Gateway::new(&target.region, config.provider.profile.as_deref())?;

    let orchestrator = UploadOrchestrator::new(Arc::new(gateway))
        .with_max_concurrent_uploads(config.max_concurrent_uploads);

    let report = runtime
        .block_on(orchestrator.run(&target, artifact_directory, template, &config.package))
        .map_err(|e| anyhow!(safe_error_message("Upload failed", &e)))?;

    info!(
        "Stored {} object(s), {} in total, under s3://{}/{}",
        report.artifacts.len() + 1,
        format_kilobytes(report.total_bytes()),
        target.bucket_name,
        artifact_directory
    );
    Ok(())
}
