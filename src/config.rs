use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SubburnError};
use crate::transcribe::WhisperModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub transcriber: TranscriberConfig,
    pub style: StyleConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned for the input video file
    pub input_dir: PathBuf,
    /// Directory where the subtitled video is written
    pub output_dir: PathBuf,
    /// Suffix appended to the input base name for the output file
    pub output_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper binary
    pub binary_path: String,
    /// Model preset to load
    pub model: WhisperModel,
    /// Source language hint; auto-detected when unset
    pub language: Option<String>,
}

/// Subtitle styling, matching the defaults of the original overlay renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Font family name
    pub font: String,
    /// Font size in points
    pub font_size: f32,
    /// Render text in bold
    pub bold: bool,
    /// Primary text colour in ASS &HAABBGGRR format
    pub color: String,
    /// Outline colour in ASS &HAABBGGRR format
    pub stroke_color: String,
    /// Outline width in pixels
    pub stroke_width: f32,
    /// Fraction of video width the text box may occupy
    pub width_ratio: f64,
    /// Vertical anchor as a fraction of video height
    pub vertical_ratio: f64,
    /// Fade-in duration in seconds
    pub fade_in: f64,
    /// Fade-out duration in seconds
    pub fade_out: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Path to ffprobe binary
    pub probe_path: String,
    /// Video codec for the final encode
    pub video_codec: String,
    /// Audio codec for the final encode
    pub audio_codec: String,
    /// Encoder thread count
    pub threads: u32,
    /// Additional encoding options appended verbatim,
    /// e.g. ["-preset", "medium", "-crf", "23"]
    pub encode_options: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig {
                input_dir: PathBuf::from("input"),
                output_dir: PathBuf::from("output"),
                output_suffix: "_subtitled".to_string(),
            },
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: WhisperModel::Base,
                language: None,
            },
            style: StyleConfig {
                font: "Arial".to_string(),
                font_size: 28.0,
                bold: true,
                color: "&H00FFFFFF".to_string(),
                stroke_color: "&H00000000".to_string(),
                stroke_width: 2.0,
                width_ratio: 0.9,
                vertical_ratio: 0.85,
                fade_in: 0.5,
                fade_out: 0.5,
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                probe_path: "ffprobe".to_string(),
                video_codec: "libx264".to_string(),
                audio_codec: "aac".to_string(),
                threads: 4,
                encode_options: vec![],
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubburnError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubburnError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubburnError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.pipeline.output_suffix, "_subtitled");
        assert_eq!(parsed.media.threads, 4);
        assert_eq!(parsed.style.width_ratio, 0.9);
        assert_eq!(parsed.style.vertical_ratio, 0.85);
    }

    #[test]
    fn test_malformed_config_surfaces_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "pipeline = \"not a table\"").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(SubburnError::Toml(_))));
    }

    #[test]
    fn test_default_style_matches_renderer_defaults() {
        let style = Config::default().style;
        assert_eq!(style.font, "Arial");
        assert!(style.bold);
        assert_eq!(style.fade_in, 0.5);
        assert_eq!(style.fade_out, 0.5);
    }
}
