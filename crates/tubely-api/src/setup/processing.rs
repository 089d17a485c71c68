//! External media tool setup

use std::sync::Arc;

use tubely_core::Config;
use tubely_processing::{FfmpegRemuxer, FfprobeInspector, MediaInspector, ProcessRunner, Remuxer};

/// Inspector and remuxer sharing one bounded process runner.
pub fn setup_processing(config: &Config) -> (Arc<dyn MediaInspector>, Arc<dyn Remuxer>) {
    let runner = ProcessRunner::new(config.max_concurrent_processes, config.process_timeout());

    tracing::info!(
        ffprobe_path = %config.ffprobe_path,
        ffmpeg_path = %config.ffmpeg_path,
        max_concurrent_processes = config.max_concurrent_processes,
        process_timeout_secs = config.process_timeout_secs,
        "Media tools configured"
    );

    (
        Arc::new(FfprobeInspector::new(runner.clone(), config.ffprobe_path.clone())),
        Arc::new(FfmpegRemuxer::new(runner, config.ffmpeg_path.clone())),
    )
}
