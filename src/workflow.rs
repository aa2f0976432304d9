use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, SubburnError};
use crate::locate::{find_first_video, VIDEO_EXTENSIONS};
use crate::media::{MediaEngineFactory, MediaEngineTrait};
use crate::subtitle::{build_overlays, format_srt_time, generate_srt, render_ass};
use crate::transcribe::{TranscriberFactory, TranscriberTrait};

/// Linear subtitle pipeline: locate, open, transcribe, build overlays,
/// render, burn. One file per run, no state kept between runs.
pub struct Workflow {
    config: Config,
    transcriber: Box<dyn TranscriberTrait>,
    media: Box<dyn MediaEngineTrait>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
        let media = MediaEngineFactory::create_engine(config.media.clone());

        // Check dependencies
        media.check_availability()?;

        Ok(Self {
            config,
            transcriber,
            media,
        })
    }

    /// Assemble a workflow from explicit components
    pub fn with_components(
        config: Config,
        transcriber: Box<dyn TranscriberTrait>,
        media: Box<dyn MediaEngineTrait>,
    ) -> Self {
        Self {
            config,
            transcriber,
            media,
        }
    }

    /// Locate the first video file in the input directory and subtitle it.
    ///
    /// An empty input directory is not an error: the situation is reported
    /// to the console and the run ends successfully.
    pub async fn run(&self) -> Result<()> {
        let input_dir = &self.config.pipeline.input_dir;

        fs::create_dir_all(input_dir).await?;
        fs::create_dir_all(&self.config.pipeline.output_dir).await?;

        println!("Looking for a video file in {}...", input_dir.display());

        match find_first_video(input_dir)? {
            Some(video_path) => {
                self.process_file(&video_path).await?;
                Ok(())
            }
            None => {
                println!("No video file found in {}", input_dir.display());
                println!(
                    "Place a video there with one of these extensions: .{}",
                    VIDEO_EXTENSIONS.join(", .")
                );
                Ok(())
            }
        }
    }

    /// Burn generated subtitles into a single video file.
    ///
    /// Returns the derived output path
    /// (`<output_dir>/<input-stem><suffix>.mp4`).
    pub async fn process_file(&self, input_path: &Path) -> Result<PathBuf> {
        if !input_path.exists() {
            return Err(SubburnError::FileNotFound(
                input_path.display().to_string(),
            ));
        }

        let file_name = input_path
            .file_name()
            .ok_or_else(|| SubburnError::Config("Invalid video filename".to_string()))?
            .to_string_lossy();
        let output_path = self.derive_output_path(input_path)?;

        fs::create_dir_all(&self.config.pipeline.output_dir).await?;

        println!("Processing video: {}", file_name);
        info!("Output path: {}", output_path.display());

        // The handle owns the render workspace; dropped on every exit path
        let video = self.media.open(input_path).await?;

        println!("Transcribing audio...");
        let transcription = self
            .transcriber
            .transcribe(input_path, self.config.transcriber.language.as_deref())
            .await?;

        println!(
            "Transcription completed. {} segments found:",
            transcription.segments.len()
        );
        for (index, segment) in transcription.segments.iter().enumerate() {
            println!(
                "[{}] {} --> {}  {}",
                index + 1,
                format_srt_time(segment.start),
                format_srt_time(segment.end),
                segment.text
            );
        }

        let overlays = build_overlays(
            &transcription.segments,
            video.dimensions(),
            &self.config.style,
        );
        let script = render_ass(&overlays, video.dimensions());
        let script_path = video.stage_file("overlays.ass", &script)?;

        println!("Compositing subtitles into video...");
        self.media
            .burn_subtitles(&video, &script_path, &output_path)
            .await?;

        println!("Subtitled video saved to {}", output_path.display());
        Ok(output_path)
    }

    /// Transcribe a media file and write an SRT subtitle file
    pub async fn transcribe_media(
        &self,
        input_path: &Path,
        output_path: &Path,
        language: Option<&str>,
    ) -> Result<()> {
        if !input_path.exists() {
            return Err(SubburnError::FileNotFound(
                input_path.display().to_string(),
            ));
        }

        let language = language.or(self.config.transcriber.language.as_deref());
        let transcription = self.transcriber.transcribe(input_path, language).await?;

        generate_srt(&transcription, output_path).await?;

        println!("Subtitles written to {}", output_path.display());
        Ok(())
    }

    /// Burn an existing subtitle file into a video
    pub async fn burn_subtitle_file(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        for path in [video_path, subtitle_path] {
            if !path.exists() {
                return Err(SubburnError::FileNotFound(path.display().to_string()));
            }
        }

        let video = self.media.open(video_path).await?;
        self.media
            .burn_subtitles(&video, subtitle_path, output_path)
            .await?;

        println!("Subtitled video saved to {}", output_path.display());
        Ok(())
    }

    fn derive_output_path(&self, input_path: &Path) -> Result<PathBuf> {
        let stem = input_path
            .file_stem()
            .ok_or_else(|| SubburnError::Config("Invalid video filename".to_string()))?
            .to_string_lossy();

        Ok(self.config.pipeline.output_dir.join(format!(
            "{}{}.mp4",
            stem, self.config.pipeline.output_suffix
        )))
    }
}
