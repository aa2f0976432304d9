use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::{Result, SubburnError};

/// Abstract media engine command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media engine command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Set encoder thread count
    pub fn threads(self, count: u32) -> Self {
        self.arg("-threads").arg(count.to_string())
    }

    /// Add video filter
    pub fn video_filter<S: Into<String>>(self, filter: S) -> Self {
        self.arg("-vf").arg(filter)
    }

    /// Execute the command, discarding output
    pub async fn execute(&self) -> Result<()> {
        debug!("Executing media command: {} {:?}", self.binary_path, self.args);

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(&self.args);

        let output = cmd
            .output()
            .map_err(|e| SubburnError::Media(format!("Failed to execute media engine: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubburnError::Media(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(())
    }

    /// Execute the command and capture stdout
    pub async fn execute_capture(&self) -> Result<String> {
        debug!("Executing media command: {} {:?}", self.binary_path, self.args);

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(&self.args);

        let output = cmd
            .output()
            .map_err(|e| SubburnError::Media(format!("Failed to execute media engine: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubburnError::Media(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Builder for the media operations this pipeline performs
pub struct MediaCommandBuilder {
    binary_path: String,
    probe_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, probe_path: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            probe_path: probe_path.into(),
        }
    }

    /// Build a subtitle burn-in command with fixed codec and thread settings.
    ///
    /// The subtitles filter accepts both SRT and ASS input.
    pub fn burn_subtitles<P: AsRef<Path>>(
        &self,
        video_path: P,
        subtitle_path: P,
        output_path: P,
        video_codec: &str,
        audio_codec: &str,
        threads: u32,
        encode_options: &[String],
    ) -> MediaCommand {
        let mut cmd = MediaCommand::new(&self.binary_path, "Subtitle burn-in")
            .overwrite()
            .input(&video_path)
            .video_filter(format!(
                "subtitles={}",
                escape_filter_path(subtitle_path.as_ref())
            ))
            .video_codec(video_codec)
            .audio_codec(audio_codec)
            .threads(threads);

        for option in encode_options {
            cmd = cmd.arg(option);
        }

        cmd.output(output_path)
    }

    /// Build a stream-geometry probe command with JSON output
    pub fn probe_dimensions<P: AsRef<Path>>(&self, video_path: P) -> MediaCommand {
        MediaCommand::new(&self.probe_path, "Stream probe")
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("v:0")
            .arg("-show_entries")
            .arg("stream=width,height")
            .arg("-of")
            .arg("json")
            .output(video_path)
    }

    /// Build a version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}

/// Escape a path for use inside an ffmpeg filter expression.
///
/// Within a filter argument, backslashes, colons and quotes are
/// filter-syntax characters; commas and square brackets delimit the
/// filter graph itself.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
        .replace(',', "\\,")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_burn_command_arguments() {
        let builder = MediaCommandBuilder::new("ffmpeg", "ffprobe");
        let cmd = builder.burn_subtitles(
            PathBuf::from("in.mp4"),
            PathBuf::from("subs.ass"),
            PathBuf::from("out.mp4"),
            "libx264",
            "aac",
            4,
            &[],
        );

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec![
                "-y", "-i", "in.mp4", "-vf", "subtitles=subs.ass", "-c:v", "libx264", "-c:a",
                "aac", "-threads", "4", "out.mp4"
            ]
        );
    }

    #[test]
    fn test_burn_command_accepts_srt_subtitles() {
        let builder = MediaCommandBuilder::new("ffmpeg", "ffprobe");
        let cmd = builder.burn_subtitles(
            PathBuf::from("in.mp4"),
            PathBuf::from("subs.srt"),
            PathBuf::from("out.mp4"),
            "libx264",
            "aac",
            4,
            &[],
        );

        // The subtitles filter handles SRT directly; an ASS-only filter
        // would reject this input at runtime
        assert!(cmd.args.contains(&"subtitles=subs.srt".to_string()));
        assert!(!cmd.args.iter().any(|a| a.starts_with("ass=")));
    }

    #[test]
    fn test_burn_command_appends_encode_options() {
        let builder = MediaCommandBuilder::new("ffmpeg", "ffprobe");
        let options = vec!["-preset".to_string(), "medium".to_string()];
        let cmd = builder.burn_subtitles(
            PathBuf::from("in.mp4"),
            PathBuf::from("subs.ass"),
            PathBuf::from("out.mp4"),
            "libx264",
            "aac",
            4,
            &options,
        );

        let out_pos = cmd.args.iter().position(|a| a == "out.mp4").unwrap();
        let preset_pos = cmd.args.iter().position(|a| a == "-preset").unwrap();
        assert!(preset_pos < out_pos);
    }

    #[test]
    fn test_probe_command_uses_probe_binary() {
        let builder = MediaCommandBuilder::new("ffmpeg", "ffprobe");
        let cmd = builder.probe_dimensions(PathBuf::from("in.mp4"));

        assert_eq!(cmd.binary_path, "ffprobe");
        assert!(cmd.args.contains(&"stream=width,height".to_string()));
        assert_eq!(cmd.args.last().unwrap(), "in.mp4");
    }

    #[test]
    fn test_escape_filter_path() {
        assert_eq!(escape_filter_path(Path::new("a/b.ass")), "a/b.ass");
        assert_eq!(escape_filter_path(Path::new("C:\\tmp\\s.ass")), "C\\:\\\\tmp\\\\s.ass");
        assert_eq!(
            escape_filter_path(Path::new("my subs, final.ass")),
            "my subs\\, final.ass"
        );
        assert_eq!(escape_filter_path(Path::new("[draft].srt")), "\\[draft\\].srt");
    }
}
