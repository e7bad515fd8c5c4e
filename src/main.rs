use anyhow::{Context, Result};
use clap::Parser;
use gallerist::build::build_gallery;
use gallerist::config::Config;
use gallerist::prompt::LinePrompt;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Generate a static photo gallery page from a directory of captioned images
/// and deploy it.
#[derive(Parser)]
#[command(name = "gallerist", version)]
struct Cli {
    /// The directory to deploy the page and images to.
    #[arg(default_value = "build")]
    copy_to: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Getting the working directory")?;
    let config = Config::from_directory(&cwd, &cli.copy_to).context("Loading configuration")?;
    debug!(?config, "Loaded configuration");

    let summary = build_gallery(&config, &mut LinePrompt::stdio()).context("Building gallery")?;
    info!(
        "Built {} cards into {} and deployed to {}",
        summary.cards,
        summary.output_file.display(),
        summary.target_directory.display()
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
