use clap::Parser;
use download_pipeline::DEFAULT_OUTPUT_DIR;
use std::path::PathBuf;

/// Download every track of a streaming playlist as MP3 via yt-dlp
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Playlist URL (https://open.spotify.com/playlist/...) or spotify:playlist: URI
    pub url: String,

    /// Directory the playlist folder is created in
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Search for the plain track instead of biasing towards lyric videos
    #[arg(long)]
    pub instrumental: bool,

    /// Pause between two tracks, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// yt-dlp executable to run
    #[arg(long, default_value = "yt-dlp")]
    pub ytdlp: PathBuf,

    /// Web API client id (also read from CLIENT_ID, e.g. in .env)
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Web API client secret (also read from CLIENT_SECRET, e.g. in .env)
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
