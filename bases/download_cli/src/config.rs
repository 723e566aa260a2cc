use crate::args::Args;
use download_pipeline::RunSettings;
use media_downloader::SearchStyle;
use playlist_resolver::{Credentials, ResolveError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use track_primitives::{PlaylistId, PlaylistIdError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Please enter a valid playlist URL")]
    InvalidUrl(#[source] PlaylistIdError),

    #[error("Credentials are missing or still set to placeholders; put CLIENT_ID and CLIENT_SECRET in .env or pass --client-id/--client-secret")]
    Credentials(#[source] ResolveError),
}

/// Everything one invocation needs, validated
#[derive(Debug, Clone)]
pub struct Config {
    pub playlist_id: PlaylistId,
    pub credentials: Credentials,
    pub search: SearchStyle,
    pub settings: RunSettings,
    pub ytdlp: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Create configuration from CLI arguments
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let credentials =
            Credentials::new(args.client_id.as_deref(), args.client_secret.as_deref())
                .map_err(ConfigError::Credentials)?;

        let playlist_id = args
            .url
            .trim()
            .parse::<PlaylistId>()
            .map_err(ConfigError::InvalidUrl)?;

        let search = if args.instrumental {
            SearchStyle::Instrumental
        } else {
            SearchStyle::Lyrics
        };

        Ok(Self {
            playlist_id,
            credentials,
            search,
            settings: RunSettings {
                base_output_dir: args.output_dir,
                track_delay: Duration::from_millis(args.delay_ms),
            },
            ytdlp: args.ytdlp,
            verbose: args.verbose,
        })
    }
}
