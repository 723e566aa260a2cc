use crate::config::Config;
use crate::output::OutputHandler;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use download_pipeline::{progress_channel, Orchestrator, ProgressMessage};
use media_downloader::{TrackDownloader, YtDlp};
use playlist_resolver::SpotifySession;
use std::sync::Arc;

pub struct App {
    config: Config,
    output: OutputHandler,
}

impl App {
    pub fn new(config: Config) -> Self {
        let output = OutputHandler::new(config.verbose);
        Self { config, output }
    }

    /// Authenticate, check for yt-dlp and download the playlist.
    ///
    /// `Ok(false)` means the run finished but some tracks failed; `Err` is
    /// reserved for problems that stop the run outright.
    pub async fn run(&self) -> Result<bool> {
        let session = SpotifySession::connect(&self.config.credentials)
            .await
            .map_err(|e| {
                if e.is_auth() {
                    eyre!(e).wrap_err("Authentication failed: invalid Client ID or Secret")
                } else {
                    eyre!(e).wrap_err("Could not reach the Web API; check your network connection")
                }
            })?;

        let downloader = TrackDownloader::new_with_downloader(
            self.config.search,
            Arc::new(YtDlp::new(&self.config.ytdlp)),
        )
        .await
        .wrap_err("yt-dlp is required; make sure it is installed and on your PATH")?;

        let orchestrator = Orchestrator::new(session, downloader, self.config.settings.clone());
        let (tx, mut rx) = progress_channel();

        self.output.print_run_start(&self.config.playlist_id);
        let handle = orchestrator.spawn_run(self.config.playlist_id.clone(), tx);

        let mut success = false;
        while let Some(message) = rx.recv().await {
            if let ProgressMessage::Finished { success: finished } = message {
                success = finished;
            }
            self.output.render(&message);
        }

        let summary = handle.await.wrap_err("download task failed")??;
        self.output.print_summary(&summary);

        Ok(success)
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
