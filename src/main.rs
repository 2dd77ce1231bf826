use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use recolor::{Color, Config, FormatRegistry, PipelineOrchestrator, RecolorError};

#[derive(Parser)]
#[command(
    name = "recolor",
    version,
    about = "Replace one exact color in an image",
    long_about = "Recolor decodes an image, replaces every pixel that exactly matches the target \
                  color (all four RGBA channels) with the replacement color, and saves the \
                  result, creating missing output directories."
)]
struct Cli {
    /// Source image path (PNG, JPEG)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Output image path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Color to replace, as R,G,B[,A] or #RRGGBB[AA]
    #[arg(short, long)]
    target: Option<Color>,

    /// Color to write instead, as R,G,B[,A] or #RRGGBB[AA]
    #[arg(short, long)]
    replacement: Option<Color>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the supported file extensions and exit
    #[arg(long)]
    list_formats: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.chain().find_map(|cause| cause.downcast_ref::<RecolorError>()) {
            Some(recolor_err) => {
                error!("{}", recolor_err.user_message());
                debug!("{:#}", err);
                ExitCode::from(recolor_err.exit_code())
            }
            None => {
                error!("{:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)
                .with_context(|| format!("could not load {}", config_path.display()))?
        }
        None => Config::default(),
    };

    // Command-line flags override the file
    if let Some(source) = cli.source {
        config.job.source = source;
    }
    if let Some(output) = cli.output {
        config.job.output = output;
    }
    if let Some(target) = cli.target {
        config.job.target = target;
    }
    if let Some(replacement) = cli.replacement {
        config.job.replacement = replacement;
    }
    config.validate().context("invalid configuration")?;

    let registry = Arc::new(FormatRegistry::with_options(&config.codecs));

    if cli.list_formats {
        for tag in registry.list_supported() {
            println!("{}", tag);
        }
        return Ok(());
    }

    info!("Starting recolor v{}", env!("CARGO_PKG_VERSION"));
    info!("Source: {:?}", config.job.source);
    info!("Output: {:?}", config.job.output);
    info!("Replacing {} with {}", config.job.target, config.job.replacement);

    let pipeline = PipelineOrchestrator::with_options(registry, config.pipeline);
    let outcome = pipeline.run(
        &config.job.source,
        &config.job.output,
        config.job.target,
        config.job.replacement,
    )?;

    info!(
        "Done: {} pixel(s) replaced in a {}x{} image",
        outcome.replaced, outcome.width, outcome.height
    );
    Ok(())
}
