use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlaylistIdError {
    #[error("Not a playlist URL: {0}")]
    NotAPlaylist(String),
}

/// Identifier of a playlist on the streaming service, e.g. `37i9dQZF1DXcBWIGoYBM5M`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlaylistId {
    type Err = PlaylistIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract_playlist_id(s).ok_or_else(|| PlaylistIdError::NotAPlaylist(s.to_string()))
    }
}

/// Pull the playlist identifier out of a share URL or URI.
///
/// Accepts anything containing `playlist/<id>` (web links, with or without
/// a `?si=` tracking suffix) and `spotify:playlist:<id>` URIs. The id is the
/// run of ASCII alphanumerics after the marker; an empty run is no match.
///
/// ```
/// # use track_primitives::extract_playlist_id;
/// let id = extract_playlist_id("https://open.spotify.com/playlist/37i9dQZF1?si=abc").unwrap();
/// assert_eq!(id.as_str(), "37i9dQZF1");
/// assert!(extract_playlist_id("https://open.spotify.com/album/xyz").is_none());
/// ```
pub fn extract_playlist_id(url: &str) -> Option<PlaylistId> {
    const MARKERS: [&str; 2] = ["playlist/", "spotify:playlist:"];

    MARKERS.iter().find_map(|marker| {
        let start = url.find(marker)? + marker.len();
        let id: String = url[start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();

        (!id.is_empty()).then_some(PlaylistId(id))
    })
}
