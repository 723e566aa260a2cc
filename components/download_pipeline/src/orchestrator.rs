//! One playlist, end to end.
//!
//! Name → folder → track listing → one download per track, strictly in that
//! order. Per-track problems are logged and counted; only a missing fetch
//! tool (or a bug) ends a run early. Every path out of [`Orchestrator::run`]
//! sends exactly one final `Finished` message.

use crate::error::PipelineError;
use crate::progress::ProgressSender;
use crate::run::{PlaylistRun, RunSettings, RunState, RunSummary};
use futures::FutureExt;
use media_downloader::{excerpt, DownloadError, TrackDownloader, TrackOutcome};
use playlist_resolver::{collect_tracks, resolve_name, PlaylistSource};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use track_primitives::{sanitize_filename, PlaylistId, Track};

/// How much of the tool's stderr ends up in the log for a failed track
const STDERR_EXCERPT_CHARS: usize = 500;

pub struct Orchestrator<S> {
    source: S,
    downloader: TrackDownloader,
    settings: RunSettings,
}

impl<S> Orchestrator<S>
where
    S: PlaylistSource + Send + Sync + 'static,
{
    pub fn new(source: S, downloader: TrackDownloader, settings: RunSettings) -> Self {
        Self {
            source,
            downloader,
            settings,
        }
    }

    /// Run on a background task. Progress arrives on the receiving end of
    /// `progress`; the handle yields the same result as [`Self::run`].
    pub fn spawn_run(
        self,
        playlist_id: PlaylistId,
        progress: ProgressSender,
    ) -> JoinHandle<Result<RunSummary, PipelineError>> {
        tokio::spawn(async move { self.run(&playlist_id, progress).await })
    }

    /// Download every track of one playlist.
    ///
    /// Whatever happens, the last message sent on `progress` is `Finished`,
    /// with `success` true only if tracks were found and none failed.
    pub async fn run(
        &self,
        playlist_id: &PlaylistId,
        progress: ProgressSender,
    ) -> Result<RunSummary, PipelineError> {
        let result = AssertUnwindSafe(self.execute(playlist_id, &progress))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(PipelineError::Panicked(panic_message(panic.as_ref()))));

        match result {
            Ok(summary) => {
                progress.finished(summary.is_success());
                Ok(summary)
            }
            Err(e) => {
                error!("Run for playlist {} aborted: {}", playlist_id, e);
                progress.log(format!("An unexpected error occurred: {}", e));
                progress.status("Error occurred");
                progress.finished(false);
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        playlist_id: &PlaylistId,
        progress: &ProgressSender,
    ) -> Result<RunSummary, PipelineError> {
        let mut run = PlaylistRun::new(playlist_id.clone());

        run.enter(RunState::FetchingName);
        progress.status("Fetching playlist name...");
        let resolved = resolve_name(&self.source, playlist_id).await;
        match &resolved.fallback {
            None => progress.log(format!("Found playlist: '{}'", resolved.name)),
            Some(e) => progress.log(format!(
                "Error fetching playlist name: {}. Using Playlist ID instead.",
                e
            )),
        }
        run.name = resolved.name;

        run.enter(RunState::CreatingDirectory);
        run.output_dir = self.settings.base_output_dir.join(folder_name(&run.name, playlist_id));
        create_output_directory(&run.output_dir, progress).await;

        run.enter(RunState::FetchingTracks);
        progress.log(format!(
            "Fetching tracks for playlist ID: {} ('{}')",
            playlist_id, run.name
        ));
        progress.status("Fetching tracks...");
        let listing = collect_tracks(&self.source, playlist_id, |loaded| {
            progress.status(format!("Fetching tracks... (Loaded {})", loaded))
        })
        .await;
        if let Some(e) = &listing.interrupted {
            progress.log(format!("Error fetching playlist tracks: {}", e));
        }
        run.tracks = listing.tracks;

        if run.tracks.is_empty() {
            progress.log("No tracks found or unable to fetch playlist details.");
            run.enter(RunState::Finished { success: false });
            return Ok(run.summary());
        }

        let total = run.tracks.len();
        progress.log(format!(
            "Found {} tracks. Starting download process into '{}'...",
            total,
            run.output_dir.display()
        ));
        info!("Downloading {} tracks of '{}'", total, run.name);

        for (index, track) in run.tracks.clone().iter().enumerate() {
            let current = index + 1;
            run.enter(RunState::DownloadingTracks { current, total });
            progress.status(format!("Downloading {}/{}: {}", current, total, track));
            progress.log(format!("--- Track {}/{} ---", current, total));

            let success = self.download_track(track, &run.output_dir, progress).await?;
            run.record(success);

            if current < total && !self.settings.track_delay.is_zero() {
                tokio::time::sleep(self.settings.track_delay).await;
            }
        }

        progress.log("--- Download Summary ---");
        progress.log(format!(
            "Successfully downloaded/skipped: {} tracks",
            run.succeeded
        ));
        progress.log(format!("Failed: {} tracks", run.failed));
        progress.log("Download process finished.");

        let summary = run.summary();
        run.enter(RunState::Finished {
            success: summary.is_success(),
        });
        Ok(summary)
    }

    /// `Ok(true/false)` for a track that worked or failed; `Err` only when
    /// the whole run has to stop.
    async fn download_track(
        &self,
        track: &Track,
        output_dir: &Path,
        progress: &ProgressSender,
    ) -> Result<bool, PipelineError> {
        let searching = || progress.log(format!("Searching and downloading: {}", track));

        match self.downloader.download(track, output_dir, searching).await {
            Ok(TrackOutcome::Skipped(path)) => {
                progress.log(format!("Skipped: '{}' already exists.", file_name(&path)));
                Ok(true)
            }
            Ok(TrackOutcome::Downloaded(path)) => {
                progress.log(format!("Downloaded: '{}'", file_name(&path)));
                Ok(true)
            }
            Ok(TrackOutcome::Unconfirmed { stdout, stderr }) => {
                warn!("Download of {} not confirmed", track);
                progress.log(format!(
                    "Warning: yt-dlp finished for '{}' but output file not confirmed.",
                    track
                ));
                if !stdout.is_empty() {
                    progress.log(format!("yt-dlp stdout:\n{}", stdout));
                }
                if !stderr.is_empty() {
                    progress.log(format!("yt-dlp stderr:\n{}", stderr));
                }
                Ok(false)
            }
            Err(DownloadError::ToolMissing(tool)) => {
                progress.log(format!(
                    "Error: '{}' not found. Make sure it's in your PATH.",
                    tool
                ));
                Err(DownloadError::ToolMissing(tool).into())
            }
            Err(DownloadError::ToolExecutionFailed { stderr, .. }) => {
                warn!("yt-dlp failed for {}", track);
                progress.log(format!("Error downloading '{}'. yt-dlp failed.", track));
                let stderr = if stderr.trim().is_empty() {
                    "No stderr output.".to_string()
                } else {
                    excerpt(&stderr, STDERR_EXCERPT_CHARS)
                };
                progress.log(format!("Error message (yt-dlp):\n{}", stderr));
                Ok(false)
            }
            Err(e) => {
                warn!("Download of {} failed: {}", track, e);
                progress.log(format!(
                    "An unexpected error occurred while downloading '{}': {}",
                    track, e
                ));
                Ok(false)
            }
        }
    }
}

/// Folder for a playlist; the id stands in for names that sanitize to nothing
fn folder_name(name: &str, playlist_id: &PlaylistId) -> String {
    let sanitized = sanitize_filename(name);
    if sanitized.is_empty() {
        sanitize_filename(playlist_id.as_str())
    } else {
        sanitized
    }
}

/// A folder that cannot be created is reported but does not stop the run;
/// the tracks will then fail one by one.
async fn create_output_directory(dir: &Path, progress: &ProgressSender) {
    match tokio::fs::create_dir_all(dir).await {
        Ok(()) => progress.log(format!("Downloads will be saved to: '{}'", dir.display())),
        Err(e) => {
            warn!("Could not create {}: {}", dir.display(), e);
            progress.log(format!(
                "Error creating directory '{}': {}. Downloads might fail or save elsewhere.",
                dir.display(),
                e
            ));
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic in download task".to_string())
}
