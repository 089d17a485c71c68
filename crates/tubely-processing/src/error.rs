use thiserror::Error;
use tubely_core::AppError;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {timeout_secs}s")]
    TimedOut { tool: String, timeout_secs: u64 },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("process pool is closed")]
    PoolClosed,

    #[error("could not parse probe output: {0}")]
    InvalidOutput(String),

    #[error("probe reported no streams")]
    NoStreams,

    #[error("cannot classify dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::NoStreams => {
                AppError::NoStreams("The uploaded file contains no streams".to_string())
            }
            other => AppError::Processing(other.to_string()),
        }
    }
}
