use crate::sanitize_filename;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a playlist: who performs it and what it is called.
///
/// Duplicates are allowed; a playlist that lists the same song twice yields
/// two equal tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// `"{artist} - {title}"`, unsanitized
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    /// File name (without extension) the track is stored under
    pub fn file_stem(&self) -> String {
        sanitize_filename(&self.display_name())
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}
