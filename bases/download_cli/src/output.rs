use download_pipeline::{ProgressMessage, RunSummary};
use track_primitives::PlaylistId;

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_run_start(&self, playlist_id: &PlaylistId) {
        println!("Processing playlist: {}", playlist_id);
    }

    pub fn render(&self, message: &ProgressMessage) {
        match message {
            ProgressMessage::Log(text) => println!("{}", text),
            ProgressMessage::Status(text) => println!("Status: {}", text),
            ProgressMessage::Finished { success: true } => println!("Status: Finished"),
            ProgressMessage::Finished { success: false } => {
                println!("Status: Finished with errors")
            }
        }
    }

    pub fn print_summary(&self, summary: &RunSummary) {
        println!(
            "{}/{} tracks of '{}' in {}",
            summary.succeeded,
            summary.total,
            summary.playlist_name,
            summary.output_dir.display()
        );
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
