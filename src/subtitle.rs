use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::config::StyleConfig;
use crate::error::Result;
use crate::transcribe::{Segment, Transcription};

/// Rendering and timing description for one subtitle's on-screen appearance.
///
/// Derived 1:1 from a transcription segment plus the styling configuration.
/// The text is visible for exactly [start, end), centered horizontally,
/// wrapped inside the horizontal margins and anchored above the bottom margin.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub font: String,
    pub font_size: f32,
    pub bold: bool,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width: f32,
    /// Pixels kept free on each side, capping the text box width
    pub margin_horizontal: u32,
    /// Pixels between the text anchor and the bottom edge
    pub margin_vertical: u32,
    /// Fade-in duration in seconds
    pub fade_in: f64,
    /// Fade-out duration in seconds
    pub fade_out: f64,
}

/// Build one overlay spec per segment for a video of the given pixel size.
pub fn build_overlays(
    segments: &[Segment],
    dimensions: (u32, u32),
    style: &StyleConfig,
) -> Vec<OverlaySpec> {
    let (width, height) = dimensions;

    // Text box capped at width_ratio of the frame, split evenly per side;
    // vertical anchor sits at vertical_ratio of the frame height.
    let margin_horizontal = ((1.0 - style.width_ratio) / 2.0 * width as f64).round() as u32;
    let margin_vertical = ((1.0 - style.vertical_ratio) * height as f64).round() as u32;

    segments
        .iter()
        .map(|segment| OverlaySpec {
            text: segment.text.trim().to_string(),
            start: segment.start,
            end: segment.end,
            font: style.font.clone(),
            font_size: style.font_size,
            bold: style.bold,
            color: style.color.clone(),
            stroke_color: style.stroke_color.clone(),
            stroke_width: style.stroke_width,
            margin_horizontal,
            margin_vertical,
            fade_in: style.fade_in,
            fade_out: style.fade_out,
        })
        .collect()
}

/// Render overlay specs as a complete ASS script sized to the video frame.
///
/// ASS is what ffmpeg's subtitle burn-in filter consumes natively, and its
/// `\fad` tag expresses the per-overlay linear fades.
pub fn render_ass(specs: &[OverlaySpec], dimensions: (u32, u32)) -> String {
    let (width, height) = dimensions;
    let mut out = String::new();

    out.push_str("[Script Info]\n");
    out.push_str("ScriptType: v4.00+\n");
    out.push_str(&format!("PlayResX: {}\n", width));
    out.push_str(&format!("PlayResY: {}\n\n", height));

    out.push_str("[V4+ Styles]\n");
    out.push_str("Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n");
    out.push_str(&format_style_line(specs.first()));

    out.push_str("\n[Events]\n");
    out.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");

    for spec in specs {
        let fade_in_ms = (spec.fade_in * 1000.0).round() as u64;
        let fade_out_ms = (spec.fade_out * 1000.0).round() as u64;

        out.push_str(&format!(
            "Dialogue: 0,{start},{end},Subburn,,0000,0000,0000,,{{\\fad({fi},{fo})}}{text}\n",
            start = format_ass_time(spec.start),
            end = format_ass_time(spec.end),
            fi = fade_in_ms,
            fo = fade_out_ms,
            text = escape_ass_text(&spec.text),
        ));
    }

    out
}

/// Format the single shared style line; a generic fallback when no events exist.
fn format_style_line(spec: Option<&OverlaySpec>) -> String {
    match spec {
        Some(spec) => format!(
            "Style: Subburn,{font},{size:.0},{primary},{primary},{outline},&H00000000,{bold},0,0,0,100,100,0,0,1,{stroke:.1},0,2,{ml:0>4},{mr:0>4},{mv:0>4},1\n",
            font = spec.font,
            size = spec.font_size,
            primary = spec.color,
            outline = spec.stroke_color,
            bold = if spec.bold { -1 } else { 0 },
            stroke = spec.stroke_width,
            ml = spec.margin_horizontal.min(9999),
            mr = spec.margin_horizontal.min(9999),
            mv = spec.margin_vertical.min(9999),
        ),
        None => "Style: Subburn,Arial,28,&H00FFFFFF,&H00FFFFFF,&H00000000,&H00000000,-1,0,0,0,100,100,0,0,1,2.0,0,2,0000,0000,0000,1\n".to_string(),
    }
}

/// Sanitize dialogue text for ASS: no control lines, no override blocks.
fn escape_ass_text(text: &str) -> String {
    text.replace('\r', "")
        .replace('\n', "\\N")
        .replace('{', "(")
        .replace('}', ")")
}

/// Format time in seconds to ASS time format (H:MM:SS.cc)
fn format_ass_time(seconds: f64) -> String {
    let total_centis = (seconds * 100.0).round() as u64;
    let hours = total_centis / 360_000;
    let minutes = (total_centis % 360_000) / 6_000;
    let secs = (total_centis % 6_000) / 100;
    let centis = total_centis % 100;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}

/// Format time in seconds to SRT time format (HH:MM:SS,mmm)
pub fn format_srt_time(seconds: f64) -> String {
    let total_milliseconds = (seconds * 1000.0).round() as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Generate an SRT subtitle file from a transcription
pub async fn generate_srt<P: AsRef<Path>>(
    transcription: &Transcription,
    output_path: P,
) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Generating SRT file: {}", output_path.display());

    let mut srt_content = String::new();

    for (index, segment) in transcription.segments.iter().enumerate() {
        srt_content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_srt_time(segment.start),
            format_srt_time(segment.end),
            segment.text.trim()
        ));
    }

    fs::write(output_path, srt_content).await?;

    info!("SRT file generated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn segment(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_format_srt_time() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(65.123), "00:01:05,123");
        assert_eq!(format_srt_time(3661.500), "01:01:01,500");
    }

    #[test]
    fn test_format_ass_time() {
        assert_eq!(format_ass_time(0.0), "0:00:00.00");
        assert_eq!(format_ass_time(5.0), "0:00:05.00");
        assert_eq!(format_ass_time(3661.5), "1:01:01.50");
    }

    #[test]
    fn test_one_overlay_per_segment_with_segment_window() {
        let style = Config::default().style;
        let segments = vec![
            segment(0.0, 5.0, "hello"),
            segment(5.0, 10.0, "world"),
            segment(12.5, 14.0, "again"),
        ];

        let overlays = build_overlays(&segments, (1920, 1080), &style);

        assert_eq!(overlays.len(), segments.len());
        for (overlay, segment) in overlays.iter().zip(&segments) {
            assert_eq!(overlay.start, segment.start);
            assert_eq!(overlay.end, segment.end);
        }
    }

    #[test]
    fn test_overlay_margins_encode_layout_ratios() {
        let style = Config::default().style;
        let overlays = build_overlays(&[segment(0.0, 1.0, "hi")], (1920, 1080), &style);

        // 90% width cap leaves 5% per side; 85% anchor leaves 15% below
        assert_eq!(overlays[0].margin_horizontal, 96);
        assert_eq!(overlays[0].margin_vertical, 162);
    }

    #[test]
    fn test_overlay_carries_styling_and_fades() {
        let style = Config::default().style;
        let overlays = build_overlays(&[segment(0.0, 1.0, "  hi  ")], (640, 480), &style);

        let overlay = &overlays[0];
        assert_eq!(overlay.text, "hi");
        assert_eq!(overlay.font, "Arial");
        assert!(overlay.bold);
        assert_eq!(overlay.stroke_width, 2.0);
        assert_eq!(overlay.fade_in, 0.5);
        assert_eq!(overlay.fade_out, 0.5);
    }

    #[test]
    fn test_render_ass_events_and_fades() {
        let style = Config::default().style;
        let segments = vec![segment(0.0, 5.0, "hello"), segment(5.0, 10.0, "world")];
        let overlays = build_overlays(&segments, (1280, 720), &style);

        let script = render_ass(&overlays, (1280, 720));

        assert!(script.contains("PlayResX: 1280"));
        assert!(script.contains("PlayResY: 720"));
        assert_eq!(script.matches("Dialogue:").count(), 2);
        assert!(script.contains("Dialogue: 0,0:00:00.00,0:00:05.00,Subburn,,0000,0000,0000,,{\\fad(500,500)}hello"));
        assert!(script.contains("Dialogue: 0,0:00:05.00,0:00:10.00,Subburn,,0000,0000,0000,,{\\fad(500,500)}world"));
    }

    #[test]
    fn test_render_ass_style_line_margins() {
        let style = Config::default().style;
        let overlays = build_overlays(&[segment(0.0, 1.0, "hi")], (1920, 1080), &style);

        let script = render_ass(&overlays, (1920, 1080));
        assert!(script.contains("Style: Subburn,Arial,28,&H00FFFFFF,&H00FFFFFF,&H00000000,&H00000000,-1,0,0,0,100,100,0,0,1,2.0,0,2,0096,0096,0162,1"));
    }

    #[test]
    fn test_render_ass_empty_specs_has_no_events() {
        let script = render_ass(&[], (1280, 720));
        assert_eq!(script.matches("Dialogue:").count(), 0);
        assert!(script.contains("[Events]"));
    }

    #[test]
    fn test_escape_ass_text() {
        assert_eq!(escape_ass_text("line1\nline2"), "line1\\Nline2");
        assert_eq!(escape_ass_text("{\\b1}bold"), "(\\b1)bold");
    }

    #[tokio::test]
    async fn test_generate_srt() {
        let dir = tempfile::tempdir().unwrap();
        let srt_path = dir.path().join("out.srt");

        let transcription = Transcription {
            text: "hello world".to_string(),
            segments: vec![segment(0.0, 5.0, "hello"), segment(5.0, 10.0, "world")],
            language: Some("en".to_string()),
        };

        generate_srt(&transcription, &srt_path).await.unwrap();

        let content = std::fs::read_to_string(&srt_path).unwrap();
        assert!(content.starts_with("1\n00:00:00,000 --> 00:00:05,000\nhello\n"));
        assert!(content.contains("2\n00:00:05,000 --> 00:00:10,000\nworld\n"));
    }
}
