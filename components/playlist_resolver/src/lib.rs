mod credentials;
mod dto;
mod error;
mod resolver;
mod session;
mod source;

pub use credentials::{
    is_valid_credential, Credentials, CLIENT_ID_KEY, CLIENT_SECRET_KEY, PLACEHOLDER_VALUES,
};
pub use error::ResolveError;
pub use resolver::{collect_tracks, resolve_name, ResolvedName, TrackListing, MAX_PAGES};
pub use session::{Endpoints, SpotifySession, API_BASE_URL, TOKEN_URL};
pub use source::{PlaylistSource, TrackPage};
