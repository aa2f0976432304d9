use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use super::{Segment, TranscriberTrait, Transcription};
use crate::config::TranscriberConfig;
use crate::error::{Result, SubburnError};

/// JSON document written by the whisper CLI with `--output_format json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    pub text: String,
    pub segments: Vec<WhisperSegment>,
    pub language: Option<String>,
}

/// Whisper CLI segment format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSegment {
    pub id: u64,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub temperature: Option<f64>,
    pub avg_logprob: Option<f64>,
    pub compression_ratio: Option<f64>,
    pub no_speech_prob: Option<f64>,
}

impl From<WhisperOutput> for Transcription {
    fn from(output: WhisperOutput) -> Self {
        let segments = output
            .segments
            .into_iter()
            .map(|seg| Segment {
                start: seg.start,
                end: seg.end,
                text: seg.text.trim().to_string(),
            })
            .collect();

        Transcription {
            text: output.text.trim().to_string(),
            segments,
            language: output.language,
        }
    }
}

/// Transcriber backed by the whisper CLI.
///
/// Model loading is handled by the CLI itself and may involve a large
/// one-time download; the run blocks until the child process exits.
pub struct WhisperCliTranscriber {
    config: TranscriberConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TranscriberTrait for WhisperCliTranscriber {
    async fn transcribe(&self, media_path: &Path, language: Option<&str>) -> Result<Transcription> {
        info!(
            "Transcribing {} with whisper model '{}'",
            media_path.display(),
            self.config.model
        );

        // Scratch directory for the CLI's JSON output, removed on drop
        let temp_dir = tempfile::tempdir()
            .map_err(|e| SubburnError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(media_path)
            .arg("--model")
            .arg(self.config.model.as_str())
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("json");

        let language = language.or(self.config.language.as_deref());
        if let Some(lang) = language {
            cmd.arg("--language").arg(lang);
        }

        debug!("Executing whisper command: {:?}", cmd);

        let output = cmd
            .output()
            .map_err(|e| SubburnError::Transcriber(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubburnError::Transcriber(format!(
                "Whisper failed: {}",
                stderr
            )));
        }

        // The CLI writes <input stem>.json into the output directory
        let media_stem = media_path
            .file_stem()
            .ok_or_else(|| SubburnError::Transcriber("Invalid media filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", media_stem.to_string_lossy()));

        let json_content = std::fs::read_to_string(&json_file).map_err(|e| {
            SubburnError::Transcriber(format!("Failed to read whisper output: {}", e))
        })?;

        let whisper_output: WhisperOutput = serde_json::from_str(&json_content)?;

        let transcription: Transcription = whisper_output.into();
        info!(
            "Transcription completed: {} segments",
            transcription.segments.len()
        );

        Ok(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_output_maps_to_transcription() {
        let json = r#"{
            "text": " hello world ",
            "segments": [
                {"id": 0, "start": 0.0, "end": 5.0, "text": " hello ",
                 "temperature": 0.0, "avg_logprob": -0.2,
                 "compression_ratio": 1.1, "no_speech_prob": 0.01},
                {"id": 1, "start": 5.0, "end": 10.0, "text": " world ",
                 "temperature": 0.0, "avg_logprob": -0.3,
                 "compression_ratio": 1.0, "no_speech_prob": 0.02}
            ],
            "language": "en"
        }"#;

        let output: WhisperOutput = serde_json::from_str(json).unwrap();
        let transcription: Transcription = output.into();

        assert_eq!(transcription.segments.len(), 2);
        assert_eq!(transcription.segments[0].text, "hello");
        assert_eq!(transcription.segments[0].start, 0.0);
        assert_eq!(transcription.segments[1].end, 10.0);
        assert_eq!(transcription.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_malformed_whisper_json_surfaces_json_error() {
        let err = serde_json::from_str::<WhisperOutput>("not json").unwrap_err();
        let err: SubburnError = err.into();
        assert!(matches!(err, SubburnError::Json(_)));
    }

    #[test]
    fn test_whisper_output_tolerates_missing_metrics() {
        let json = r#"{
            "text": "hi",
            "segments": [{"id": 0, "start": 0.0, "end": 1.0, "text": "hi"}],
            "language": null
        }"#;

        let output: WhisperOutput = serde_json::from_str(json).unwrap();
        assert!(output.segments[0].avg_logprob.is_none());
    }
}
