//! Tubely Processing Library
//!
//! Wrappers around the external media tools used by the upload pipeline:
//!
//! - [`FfprobeInspector`] classifies a staged video into an aspect-ratio bucket.
//! - [`FfmpegRemuxer`] rewrites an MP4 so its index precedes the media data.
//!
//! Both run their tool through a shared [`ProcessRunner`], which bounds how many
//! external processes run at once and kills any that exceed the configured timeout.

pub mod error;
pub mod inspector;
pub mod remux;
pub mod runner;

pub use error::ProcessingError;
pub use inspector::{parse_probe_output, FfprobeInspector, MediaInspector, StreamDimensions};
pub use remux::{faststart_output_path, FfmpegRemuxer, Remuxer};
pub use runner::ProcessRunner;
