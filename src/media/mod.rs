// Media engine abstraction
//
// Wraps the ffmpeg/ffprobe binaries behind a trait so the workflow can be
// exercised without encoding anything. The VideoHandle owns the probed
// stream geometry plus a scoped scratch workspace for staged artifacts.

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::{Result, SubburnError};

/// An opened source video: path, pixel dimensions, and a temporary workspace.
///
/// The workspace holds intermediate render artifacts (the staged subtitle
/// script) and is deleted when the handle drops, on success and failure alike.
pub struct VideoHandle {
    path: PathBuf,
    width: u32,
    height: u32,
    workspace: TempDir,
}

impl VideoHandle {
    pub fn new(path: PathBuf, width: u32, height: u32) -> Result<Self> {
        let workspace = TempDir::new()
            .map_err(|e| SubburnError::Media(format!("Failed to create workspace: {}", e)))?;

        Ok(Self {
            path,
            width,
            height,
            workspace,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pixel dimensions of the first video stream
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Write a named file into the handle's workspace and return its path
    pub fn stage_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.workspace.path().join(name);
        std::fs::write(&path, content)
            .map_err(|e| SubburnError::Media(format!("Failed to stage {}: {}", name, e)))?;
        Ok(path)
    }
}

impl Drop for VideoHandle {
    fn drop(&mut self) {
        debug!("Releasing video handle for {}", self.path.display());
    }
}

/// Main trait for media engine operations
#[async_trait]
pub trait MediaEngineTrait: Send + Sync {
    /// Open a source video, probing its pixel dimensions
    async fn open(&self, video_path: &Path) -> Result<VideoHandle>;

    /// Burn a subtitle file into the video and encode to the output path
    async fn burn_subtitles(
        &self,
        video: &VideoHandle,
        subtitle_path: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Check if the media engine binaries are available
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media engine instances
pub struct MediaEngineFactory;

impl MediaEngineFactory {
    /// Create the default media engine implementation (ffmpeg-based)
    pub fn create_engine(config: MediaConfig) -> Box<dyn MediaEngineTrait> {
        Box::new(processor::FfmpegEngine::new(config))
    }
}
