mod app;
mod args;
mod config;
mod output;

use app::App;
use args::Args;
use clap::Parser;
use color_eyre::Result;
use config::Config;

const LOG_TARGETS: [&str; 4] = [
    "download_cli",
    "download_pipeline",
    "media_downloader",
    "playlist_resolver",
];

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // a missing .env is fine, credentials may come from the environment or flags
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::from_args(args)?;
    let app = App::new(config);

    match app.run().await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(error) => {
            app.print_error(&error);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr; stdout carries the progress log
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let default_filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
