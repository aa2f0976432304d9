// Transcription seam
//
// The concrete implementation shells out to the whisper CLI; the trait keeps
// the workflow testable without a model download. To add another speech
// service, parse its native output format and map it into `Transcription`.

pub mod whisper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::TranscriberConfig;
use crate::error::{Result, SubburnError};

/// A timestamped span of recognized speech.
///
/// Segments are produced in chronological order and are visible on screen
/// for exactly [start, end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Full transcription of one media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: Option<String>,
}

/// Whisper model presets, trading accuracy against load and inference cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
            WhisperModel::Large => "large",
        }
    }
}

impl fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WhisperModel {
    type Err = SubburnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(WhisperModel::Tiny),
            "base" => Ok(WhisperModel::Base),
            "small" => Ok(WhisperModel::Small),
            "medium" => Ok(WhisperModel::Medium),
            "large" => Ok(WhisperModel::Large),
            _ => Err(SubburnError::Config(format!(
                "Invalid whisper model '{}'. Valid models: tiny, base, small, medium, large",
                s
            ))),
        }
    }
}

/// Main trait for transcription operations
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Transcribe a media file into ordered, timestamped segments
    async fn transcribe(&self, media_path: &Path, language: Option<&str>) -> Result<Transcription>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the default transcriber implementation (whisper CLI)
    pub fn create_default(config: TranscriberConfig) -> Box<dyn TranscriberTrait> {
        Box::new(whisper::WhisperCliTranscriber::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parse_roundtrip() {
        for name in ["tiny", "base", "small", "medium", "large"] {
            let model: WhisperModel = name.parse().unwrap();
            assert_eq!(model.as_str(), name);
        }
    }

    #[test]
    fn test_model_parse_is_case_insensitive() {
        assert_eq!("Base".parse::<WhisperModel>().unwrap(), WhisperModel::Base);
    }

    #[test]
    fn test_model_parse_rejects_unknown() {
        assert!("enormous".parse::<WhisperModel>().is_err());
    }
}
