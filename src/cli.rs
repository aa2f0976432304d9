use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate the first video in the input directory and burn subtitles into it
    Run {
        /// Override the configured input directory
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Override the configured output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Whisper model preset (tiny, base, small, medium, large)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Burn subtitles into a specific video file
    Process {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the subtitled video
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Whisper model preset (tiny, base, small, medium, large)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Transcribe a media file and write an SRT subtitle file
    Transcribe {
        /// Input media file
        #[arg(short, long)]
        input: PathBuf,

        /// Output SRT file
        #[arg(short, long)]
        output: PathBuf,

        /// Source language hint
        #[arg(short, long)]
        language: Option<String>,

        /// Whisper model preset (tiny, base, small, medium, large)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Burn an existing subtitle file into a video
    Burn {
        /// Input video file
        #[arg(short, long)]
        video: PathBuf,

        /// Subtitle file (SRT or ASS)
        #[arg(short, long)]
        subtitles: PathBuf,

        /// Output video file
        #[arg(short, long)]
        output: PathBuf,
    },
}
