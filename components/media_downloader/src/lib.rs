mod types;
mod utils;
mod ytdlp;

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use track_primitives::Track;

pub use types::{
    DownloadError, Downloader, FetchOutput, FetchRequest, SearchStyle, TrackOutcome,
};
pub use utils::{excerpt, AUDIO_EXTENSION};
pub use ytdlp::YtDlp;

/// Turns one playlist track into one audio file in an output directory
pub struct TrackDownloader {
    search: SearchStyle,
    downloader: Arc<dyn Downloader + Send + Sync>,
}

impl TrackDownloader {
    /// Create a TrackDownloader with a specific downloader implementation.
    ///
    /// Fails with [`DownloadError::ToolMissing`] if the tool is not installed.
    pub async fn new_with_downloader(
        search: SearchStyle,
        downloader: Arc<dyn Downloader + Send + Sync>,
    ) -> Result<Self, DownloadError> {
        downloader.check_available().await?;

        Ok(Self { search, downloader })
    }

    /// Download a single track into `output_dir`.
    ///
    /// An existing target file is never overwritten; it is reported as
    /// [`TrackOutcome::Skipped`] without running the tool. Otherwise
    /// `on_fetch` is called right before the tool starts. A tool that exits
    /// with a non-zero status yields [`DownloadError::ToolExecutionFailed`].
    pub async fn download<F>(
        &self,
        track: &Track,
        output_dir: &Path,
        on_fetch: F,
    ) -> Result<TrackOutcome, DownloadError>
    where
        F: FnOnce(),
    {
        let file_stem = track.file_stem();
        let target = utils::target_path(output_dir, &file_stem);

        if tokio::fs::try_exists(&target).await? {
            debug!("{} already exists, skipping", target.display());
            return Ok(TrackOutcome::Skipped(target));
        }

        let request = FetchRequest {
            query: format!("{}{}", track.display_name(), self.search.suffix()),
            output_template: utils::output_template(output_dir, &file_stem),
        };
        info!("Searching and downloading: {}", track);
        on_fetch();

        let output = self.downloader.fetch(&request).await?;
        let target_exists = tokio::fs::try_exists(&target).await?;

        if utils::confirms_download(&output.stdout, target_exists) {
            Ok(TrackOutcome::Downloaded(target))
        } else {
            Ok(TrackOutcome::Unconfirmed {
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }
}
