use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The fetch tool binary could not be found. Aborts the whole run.
    #[error("Required tool not found: {0}")]
    ToolMissing(String),

    /// The fetch tool ran but exited unsuccessfully for this one track.
    #[error("Fetch tool exited with {}", exit_description(.code))]
    ToolExecutionFailed { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Whether the error should stop the run instead of just failing a track
    pub fn is_fatal(&self) -> bool {
        matches!(self, DownloadError::ToolMissing(_))
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Which search results to prefer for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStyle {
    /// Append " lyrics" to every query, which tends to find lyric videos
    /// with the plain studio recording instead of music videos.
    #[default]
    Lyrics,
    /// Search for the bare "artist - title".
    Instrumental,
}

impl SearchStyle {
    pub fn suffix(&self) -> &'static str {
        match self {
            SearchStyle::Lyrics => " lyrics",
            SearchStyle::Instrumental => "",
        }
    }
}

/// One invocation of the fetch tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Free-text search query, e.g. `"Daft Punk - One More Time lyrics"`
    pub query: String,

    /// Output path with the tool's `%(ext)s` placeholder for the extension
    pub output_template: PathBuf,
}

/// Captured text output of a successful (exit code 0) tool run
#[derive(Debug, Clone, Default)]
pub struct FetchOutput {
    pub stdout: String,
    pub stderr: String,
}

#[async_trait::async_trait]
pub trait Downloader {
    /// Check that the tool is installed before any track is attempted
    async fn check_available(&self) -> Result<(), DownloadError>;

    /// Search for the best match of `request.query` and store its audio at
    /// `request.output_template`
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutput, DownloadError>;
}

/// What happened to a single track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The target file was already there; the tool was not run.
    Skipped(PathBuf),

    /// The tool ran and the download is confirmed.
    Downloaded(PathBuf),

    /// The tool exited cleanly but neither its output nor the filesystem
    /// confirms a download.
    Unconfirmed { stdout: String, stderr: String },
}

impl TrackOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, TrackOutcome::Unconfirmed { .. })
    }
}
