use crate::error::ResolveError;
use async_trait::async_trait;
use track_primitives::{PlaylistId, Track};

/// One page of a playlist's track listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPage {
    pub tracks: Vec<Track>,

    /// Opaque cursor for the following page, `None` on the last page
    pub next: Option<String>,
}

/// Where playlists come from.
///
/// [`crate::SpotifySession`] talks to the Web API; tests substitute stubs.
#[async_trait]
pub trait PlaylistSource {
    /// Display name of the playlist
    async fn playlist_name(&self, id: &PlaylistId) -> Result<String, ResolveError>;

    /// First page when `cursor` is `None`, otherwise the page it points at
    async fn tracks_page(
        &self,
        id: &PlaylistId,
        cursor: Option<&str>,
    ) -> Result<TrackPage, ResolveError>;
}
