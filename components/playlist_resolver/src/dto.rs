//! Wire formats of the accounts service and the Web API.
//!
//! Only the fields we ask for via `fields=` are modelled, and all of them
//! are optional: the API returns `null` tracks for removed or local items.

use crate::source::TrackPage;
use serde::Deserialize;
use track_primitives::Track;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<serde_json::Value>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistInfo {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistTracks {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackObject {
    pub name: Option<String>,
    pub artists: Option<Vec<ArtistObject>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistObject {
    pub name: Option<String>,
}

impl TrackObject {
    /// Items without a title or without any credited artist are dropped.
    /// Only the first artist is kept.
    fn into_track(self) -> Option<Track> {
        let title = self.name.filter(|name| !name.is_empty())?;
        let artist = self
            .artists?
            .into_iter()
            .next()?
            .name
            .filter(|name| !name.is_empty())?;

        Some(Track::new(artist, title))
    }
}

impl From<PlaylistTracks> for TrackPage {
    fn from(page: PlaylistTracks) -> Self {
        let tracks = page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(TrackObject::into_track)
            .collect();

        TrackPage {
            tracks,
            next: page.next,
        }
    }
}

impl ErrorBody {
    /// Human readable summary of either error shape the services use:
    /// `{"error": "invalid_client", "error_description": ...}` from the
    /// accounts service, `{"error": {"status": 401, "message": ...}}` from the API
    pub fn summary(&self) -> Option<String> {
        if let Some(description) = &self.error_description {
            return Some(description.clone());
        }

        match self.error.as_ref()? {
            serde_json::Value::String(code) => Some(code.clone()),
            serde_json::Value::Object(object) => object
                .get("message")
                .and_then(|message| message.as_str())
                .map(str::to_string),
            _ => None,
        }
    }
}
