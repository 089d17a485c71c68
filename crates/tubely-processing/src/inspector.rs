//! Aspect-ratio classification through ffprobe.

use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tubely_core::AspectRatio;

use crate::error::ProcessingError;
use crate::runner::ProcessRunner;

#[async_trait]
pub trait MediaInspector: Send + Sync {
    /// Classify the video at `path` into an aspect-ratio bucket.
    async fn aspect_ratio(&self, path: &Path) -> Result<AspectRatio, ProcessingError>;
}

/// Width and height of the first stream reported by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDimensions {
    pub width: i64,
    pub height: i64,
}

impl StreamDimensions {
    pub fn aspect_ratio(&self) -> Result<AspectRatio, ProcessingError> {
        AspectRatio::from_dimensions(self.width, self.height).ok_or(
            ProcessingError::InvalidDimensions {
                width: self.width,
                height: self.height,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: i64,
    #[serde(default)]
    height: i64,
}

/// Parse `-print_format json -show_streams` output and return the first stream's dimensions.
///
/// Streams without dimensions (audio, data) report 0x0.
pub fn parse_probe_output(stdout: &[u8]) -> Result<StreamDimensions, ProcessingError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::InvalidOutput(e.to_string()))?;

    let first = probe
        .streams
        .into_iter()
        .next()
        .ok_or(ProcessingError::NoStreams)?;

    Ok(StreamDimensions {
        width: first.width,
        height: first.height,
    })
}

/// [`MediaInspector`] backed by the ffprobe binary.
#[derive(Clone)]
pub struct FfprobeInspector {
    runner: ProcessRunner,
    ffprobe_path: String,
}

impl FfprobeInspector {
    pub fn new(runner: ProcessRunner, ffprobe_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffprobe_path: ffprobe_path.into(),
        }
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
    ))]
    pub async fn probe_dimensions(&self, path: &Path) -> Result<StreamDimensions, ProcessingError> {
        let output = self
            .runner
            .run(
                &self.ffprobe_path,
                [
                    OsStr::new("-v"),
                    OsStr::new("error"),
                    OsStr::new("-print_format"),
                    OsStr::new("json"),
                    OsStr::new("-show_streams"),
                    path.as_os_str(),
                ],
            )
            .await?;

        parse_probe_output(&output.stdout)
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    async fn aspect_ratio(&self, path: &Path) -> Result<AspectRatio, ProcessingError> {
        let dimensions = self.probe_dimensions(path).await?;
        let ratio = dimensions.aspect_ratio()?;
        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            aspect_ratio = %ratio,
            "Classified video"
        );
        Ok(ratio)
    }
}
