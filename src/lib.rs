//! Subburn - Automatic Burned-in Subtitle Generation
//!
//! An automated pipeline for adding burned-in subtitles to video files:
//! whisper transcribes the audio track, each recognized segment becomes a
//! styled overlay, and ffmpeg composites the overlays into a new video.

pub mod cli;
pub mod config;
pub mod error;
pub mod locate;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod workflow;
