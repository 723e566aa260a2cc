mod error;
mod orchestrator;
mod progress;
mod run;

pub use error::PipelineError;
pub use orchestrator::Orchestrator;
pub use progress::{progress_channel, ProgressMessage, ProgressReceiver, ProgressSender};
pub use run::{
    PlaylistRun, RunSettings, RunState, RunSummary, DEFAULT_OUTPUT_DIR, DEFAULT_TRACK_DELAY,
};
