mod playlist_id;
mod sanitize;
mod track;

pub use playlist_id::{extract_playlist_id, PlaylistId, PlaylistIdError};
pub use sanitize::{sanitize_filename, MAX_NAME_BYTES};
pub use track::Track;
