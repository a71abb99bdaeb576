use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use region_eraser::{
    config::Config,
    inpaint::CommandModel,
    media::FfmpegTool,
    pipeline::{JobRequest, JobStatusSink, JsonFileStatusSink, NoopStatusSink, Pipeline},
};

#[derive(Parser)]
#[command(
    name = "region-eraser",
    version,
    about = "Remove time-bounded regions from a video by inpainting",
    long_about = "Region-Eraser extracts every frame of a video, masks the regions listed in a spec document, inpaints them batch by batch with an external video-completion model and remuxes the result with the original audio."
)]
struct Cli {
    /// Source video
    source: PathBuf,

    /// Spec document (JSON list of {startAt, endWith, regions})
    spec: PathBuf,

    /// Output video file path
    output: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame/mask pairs per model invocation
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Append-only progress file, truncated at start
    #[arg(long)]
    progress_log: Option<PathBuf>,

    /// JSON job-status record
    #[arg(long)]
    status_file: Option<PathBuf>,

    /// Keep scratch directories after the run
    #[arg(long)]
    keep_workdirs: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    info!("Starting Region-Eraser v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(batch_size) = cli.batch_size {
        config.pipeline.batch_size = batch_size;
    }
    if cli.progress_log.is_some() {
        config.progress.log_file = cli.progress_log.clone();
    }
    if cli.status_file.is_some() {
        config.status.file = cli.status_file.clone();
    }
    if cli.keep_workdirs {
        config.pipeline.keep_workdirs = true;
    }
    config.validate()?;

    let request = JobRequest::new(cli.source, cli.spec, cli.output);

    let media = FfmpegTool::new(config.media.clone());
    media.check_available()?;
    let model = CommandModel::new(config.model.clone());

    let status: Arc<dyn JobStatusSink> = match &config.status.file {
        Some(path) => Arc::new(JsonFileStatusSink::new(path.clone(), request.job_id())),
        None => Arc::new(NoopStatusSink),
    };

    let pipeline = Pipeline::new(config, Arc::new(media), Arc::new(model)).with_status_sink(status);

    // Every stage blocks on an external process
    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&request)).await?;

    match outcome {
        Ok(delivered) => {
            info!("Done! Output saved to: {:?}", delivered);
            Ok(())
        }
        Err(e) => {
            error!("{}", e.user_message());
            if e.is_caller_fixable() {
                warn!("Fix the inputs and run the job again");
            }
            Err(e.into())
        }
    }
}
