//! Fast-start remuxing through ffmpeg.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ProcessingError;
use crate::runner::ProcessRunner;

#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Write a copy of `input` with its index moved to the front and return the new path.
    ///
    /// Streams are copied, not re-encoded. `input` is left untouched.
    async fn fast_start(&self, input: &Path) -> Result<PathBuf, ProcessingError>;
}

/// Output path for the remuxed copy of `input`: same directory, `.processing` appended.
pub fn faststart_output_path(input: &Path) -> PathBuf {
    let mut name = input
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("upload"));
    name.push(".processing");
    input.with_file_name(name)
}

/// [`Remuxer`] backed by the ffmpeg binary.
#[derive(Clone)]
pub struct FfmpegRemuxer {
    runner: ProcessRunner,
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(runner: ProcessRunner, ffmpeg_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn fast_start(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
        let output = faststart_output_path(input);

        self.runner
            .run(
                &self.ffmpeg_path,
                [
                    OsStr::new("-i"),
                    input.as_os_str(),
                    OsStr::new("-c"),
                    OsStr::new("copy"),
                    OsStr::new("-movflags"),
                    OsStr::new("faststart"),
                    OsStr::new("-f"),
                    OsStr::new("mp4"),
                    output.as_os_str(),
                ],
            )
            .await?;

        Ok(output)
    }
}
