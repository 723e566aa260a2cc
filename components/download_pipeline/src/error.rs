use media_downloader::DownloadError;
use thiserror::Error;

/// Errors that end a run early. Everything else is logged and counted.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Run aborted unexpectedly: {0}")]
    Panicked(String),
}
