use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use super::{MediaCommandBuilder, MediaEngineTrait, VideoHandle};
use crate::config::MediaConfig;
use crate::error::{Result, SubburnError};

/// ffprobe `-of json` output for a stream-geometry query
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Concrete media engine implementation (ffmpeg/ffprobe-based)
pub struct FfmpegEngine {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegEngine {
    /// Create a new ffmpeg engine
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path, &config.probe_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaEngineTrait for FfmpegEngine {
    /// Open a source video, probing its pixel dimensions via ffprobe
    async fn open(&self, video_path: &Path) -> Result<VideoHandle> {
        debug!("Probing video dimensions: {}", video_path.display());

        let command = self.command_builder.probe_dimensions(video_path);
        let stdout = command.execute_capture().await?;

        let probe: ProbeOutput = serde_json::from_str(&stdout)?;

        let stream = probe
            .streams
            .first()
            .ok_or_else(|| SubburnError::Media("No video stream found".to_string()))?;

        let (width, height) = match (stream.width, stream.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(SubburnError::Media(
                    "Video stream reports no dimensions".to_string(),
                ))
            }
        };

        info!(
            "Opened {} ({}x{})",
            video_path.display(),
            width,
            height
        );

        VideoHandle::new(video_path.to_path_buf(), width, height)
    }

    /// Burn a subtitle file into the video with fixed encode settings
    async fn burn_subtitles(
        &self,
        video: &VideoHandle,
        subtitle_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!(
            "Burning subtitles from {} into {} -> {}",
            subtitle_path.display(),
            video.path().display(),
            output_path.display()
        );

        let command = self.command_builder.burn_subtitles(
            video.path(),
            subtitle_path,
            output_path,
            &self.config.video_codec,
            &self.config.audio_codec,
            self.config.threads,
            &self.config.encode_options,
        );

        command.execute().await?;

        info!("Subtitle burn-in completed successfully");
        Ok(())
    }

    /// Check if the media engine is available
    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| SubburnError::Media(format!("Media engine not found: {}", e)))?;

        if output.status.success() {
            debug!("Media engine is available");
            Ok(())
        } else {
            Err(SubburnError::Media(
                "Media engine version check failed".to_string(),
            ))
        }
    }
}
