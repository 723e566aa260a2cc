//! Fallback and paging policy on top of any [`PlaylistSource`].

use crate::error::ResolveError;
use crate::source::PlaylistSource;
use tracing::{debug, warn};
use track_primitives::{PlaylistId, Track};

/// Upper bound on followed cursors, so a misbehaving API cannot keep us
/// paging forever
pub const MAX_PAGES: usize = 10_000;

/// Playlist name, or the playlist id when the name could not be fetched
#[derive(Debug)]
pub struct ResolvedName {
    pub name: String,

    /// Why the id is used instead of the real name
    pub fallback: Option<ResolveError>,
}

/// Every track that could be listed, in playlist order
#[derive(Debug)]
pub struct TrackListing {
    pub tracks: Vec<Track>,

    /// The error that stopped paging early; `tracks` holds what came before it
    pub interrupted: Option<ResolveError>,
}

/// Fetch the display name of a playlist, falling back to its id
pub async fn resolve_name<S>(source: &S, id: &PlaylistId) -> ResolvedName
where
    S: PlaylistSource + Sync + ?Sized,
{
    match source.playlist_name(id).await {
        Ok(name) => ResolvedName {
            name,
            fallback: None,
        },
        Err(e) => {
            warn!("Could not fetch name of playlist {}: {}", id, e);
            ResolvedName {
                name: id.to_string(),
                fallback: Some(e),
            }
        }
    }
}

/// List all tracks of a playlist by following page cursors until the last
/// page.
///
/// A failing page ends the listing without discarding the tracks already
/// collected; nothing is retried. `on_page` receives the number of tracks
/// loaded so far each time another page is about to be requested.
pub async fn collect_tracks<S, F>(source: &S, id: &PlaylistId, mut on_page: F) -> TrackListing
where
    S: PlaylistSource + Sync + ?Sized,
    F: FnMut(usize),
{
    let mut tracks = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 0..MAX_PAGES {
        let page = match source.tracks_page(id, cursor.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Listing of playlist {} stopped after {} tracks: {}", id, tracks.len(), e);
                return TrackListing {
                    tracks,
                    interrupted: Some(e),
                };
            }
        };

        debug!("Page {} of playlist {}: {} tracks", page_number, id, page.tracks.len());
        tracks.extend(page.tracks);

        match page.next {
            Some(next) => {
                on_page(tracks.len());
                cursor = Some(next);
            }
            None => {
                return TrackListing {
                    tracks,
                    interrupted: None,
                }
            }
        }
    }

    TrackListing {
        tracks,
        interrupted: Some(ResolveError::TooManyPages(MAX_PAGES)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TrackPage;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves scripted pages; `None` entries fail with a network error
    struct PlaylistSourceStub {
        name: Option<&'static str>,
        pages: Vec<Option<Vec<Track>>>,
        cursors_seen: Mutex<Vec<Option<String>>>,
    }

    impl PlaylistSourceStub {
        fn new(name: Option<&'static str>, pages: Vec<Option<Vec<Track>>>) -> Self {
            Self {
                name,
                pages,
                cursors_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlaylistSource for PlaylistSourceStub {
        async fn playlist_name(&self, _id: &PlaylistId) -> Result<String, ResolveError> {
            self.name
                .map(str::to_string)
                .ok_or_else(|| ResolveError::Network("HTTP 404 Not Found: Resource not found".into()))
        }

        async fn tracks_page(
            &self,
            _id: &PlaylistId,
            cursor: Option<&str>,
        ) -> Result<TrackPage, ResolveError> {
            self.cursors_seen.lock().unwrap().push(cursor.map(str::to_string));

            let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let tracks = self.pages[index]
                .clone()
                .ok_or_else(|| ResolveError::Network("connection reset".into()))?;
            let next = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());

            Ok(TrackPage { tracks, next })
        }
    }

    fn playlist_id() -> PlaylistId {
        "https://open.spotify.com/playlist/abc123".parse().unwrap()
    }

    fn tracks(prefix: &str, count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track::new(format!("{} Artist", prefix), format!("Song {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_name_is_resolved() {
        let source = PlaylistSourceStub::new(Some("Road Trip"), vec![]);

        let resolved = resolve_name(&source, &playlist_id()).await;

        assert_eq!(resolved.name, "Road Trip");
        assert!(resolved.fallback.is_none());
    }

    #[tokio::test]
    async fn test_name_falls_back_to_id() {
        let source = PlaylistSourceStub::new(None, vec![]);

        let resolved = resolve_name(&source, &playlist_id()).await;

        assert_eq!(resolved.name, "abc123");
        assert_matches!(resolved.fallback, Some(ResolveError::Network(_)));
    }

    #[tokio::test]
    async fn test_all_pages_are_collected_in_order() {
        let source = PlaylistSourceStub::new(
            Some("Mix"),
            vec![Some(tracks("A", 100)), Some(tracks("B", 100)), Some(tracks("C", 7))],
        );
        let mut progress = Vec::new();

        let listing = collect_tracks(&source, &playlist_id(), |loaded| progress.push(loaded)).await;

        assert!(listing.interrupted.is_none());
        assert_eq!(listing.tracks.len(), 207);
        assert_eq!(listing.tracks[0], Track::new("A Artist", "Song 0"));
        assert_eq!(listing.tracks[100], Track::new("B Artist", "Song 0"));
        assert_eq!(listing.tracks[206], Track::new("C Artist", "Song 6"));
        assert_eq!(progress, vec![100, 200]);
        assert_eq!(
            *source.cursors_seen.lock().unwrap(),
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failing_page_keeps_partial_listing() {
        let source = PlaylistSourceStub::new(
            Some("Mix"),
            vec![Some(tracks("A", 100)), None, Some(tracks("C", 5))],
        );

        let listing = collect_tracks(&source, &playlist_id(), |_| {}).await;

        assert_eq!(listing.tracks.len(), 100);
        assert_matches!(listing.interrupted, Some(ResolveError::Network(msg)) if msg == "connection reset");
        // no retry, no skipping ahead
        assert_eq!(source.cursors_seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_first_page_yields_empty_listing() {
        let source = PlaylistSourceStub::new(Some("Mix"), vec![None]);

        let listing = collect_tracks(&source, &playlist_id(), |_| {}).await;

        assert!(listing.tracks.is_empty());
        assert!(listing.interrupted.is_some());
    }
}
