use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use track_primitives::{PlaylistId, Track};

/// Default folder all playlist folders are created in
pub const DEFAULT_OUTPUT_DIR: &str = "Spotify_Downloads";

/// Pause between two tracks, to go easy on the search service
pub const DEFAULT_TRACK_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Each playlist gets its own folder in here
    pub base_output_dir: PathBuf,
    pub track_delay: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            base_output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            track_delay: DEFAULT_TRACK_DELAY,
        }
    }
}

/// Where a run is. States are only ever entered in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    FetchingName,
    CreatingDirectory,
    FetchingTracks,
    DownloadingTracks { current: usize, total: usize },
    Finished { success: bool },
}

impl RunState {
    fn rank(&self) -> usize {
        match self {
            RunState::Idle => 0,
            RunState::FetchingName => 1,
            RunState::CreatingDirectory => 2,
            RunState::FetchingTracks => 3,
            RunState::DownloadingTracks { .. } => 4,
            RunState::Finished { .. } => 5,
        }
    }

    fn can_advance_to(&self, next: &RunState) -> bool {
        match (self, next) {
            (
                RunState::DownloadingTracks { current, .. },
                RunState::DownloadingTracks { current: next, .. },
            ) => next > current,
            _ => next.rank() > self.rank(),
        }
    }
}

/// Book-keeping of one pass over one playlist. Lives exactly as long as the
/// run; nothing is persisted.
#[derive(Debug)]
pub struct PlaylistRun {
    pub playlist_id: PlaylistId,
    pub name: String,
    pub output_dir: PathBuf,
    pub tracks: Vec<Track>,
    pub succeeded: usize,
    pub failed: usize,
    state: RunState,
}

impl PlaylistRun {
    pub fn new(playlist_id: PlaylistId) -> Self {
        Self {
            name: playlist_id.to_string(),
            playlist_id,
            output_dir: PathBuf::new(),
            tracks: Vec::new(),
            succeeded: 0,
            failed: 0,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Move to `next`. Going back to an earlier state is a bug.
    pub fn enter(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "illegal run transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!("Run {}: {:?} -> {:?}", self.playlist_id, self.state, next);
        self.state = next;
    }

    pub fn record(&mut self, success: bool) {
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            playlist_name: self.name.clone(),
            output_dir: self.output_dir.clone(),
            total: self.tracks.len(),
            succeeded: self.succeeded,
            failed: self.failed,
        }
    }
}

/// Final counters of a run, handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub playlist_name: String,
    pub output_dir: PathBuf,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    /// True when there was something to download and nothing failed
    pub fn is_success(&self) -> bool {
        self.total > 0 && self.failed == 0
    }
}
