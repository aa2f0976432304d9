//! Subburn - Automatic Burned-in Subtitle Generation
//!
//! This is the main entry point for the Subburn application, which adds
//! burned-in subtitles to video files using whisper and ffmpeg.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subburn::cli::{Args, Commands};
use subburn::config::Config;
use subburn::transcribe::WhisperModel;
use subburn::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Run {
            input_dir,
            output_dir,
            model,
        } => {
            if let Some(dir) = input_dir {
                config.pipeline.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.pipeline.output_dir = dir;
            }
            if let Some(model) = model {
                config.transcriber.model = parse_model(&model)?;
            }

            let workflow = Workflow::new(config)?;
            workflow.run().await?;
        }
        Commands::Process {
            input,
            output_dir,
            model,
        } => {
            info!("Processing video file: {}", input.display());

            if let Some(dir) = output_dir {
                config.pipeline.output_dir = dir;
            }
            if let Some(model) = model {
                config.transcriber.model = parse_model(&model)?;
            }

            let workflow = Workflow::new(config)?;
            workflow.process_file(&input).await?;
        }
        Commands::Transcribe {
            input,
            output,
            language,
            model,
        } => {
            info!("Transcribing media file: {}", input.display());

            if let Some(model) = model {
                config.transcriber.model = parse_model(&model)?;
            }

            let workflow = Workflow::new(config)?;
            workflow
                .transcribe_media(&input, &output, language.as_deref())
                .await?;
        }
        Commands::Burn {
            video,
            subtitles,
            output,
        } => {
            info!("Burning subtitles into video: {}", video.display());

            let workflow = Workflow::new(config)?;
            workflow
                .burn_subtitle_file(&video, &subtitles, &output)
                .await?;
        }
    }

    info!("Subburn workflow completed successfully");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let app_dir = std::env::current_dir()?.join(".subburn");
    let log_dir = app_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "subburn.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::WARN };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Parse whisper model preset from string
fn parse_model(model: &str) -> Result<WhisperModel> {
    Ok(model.parse::<WhisperModel>()?)
}
