//! Ordered message channel from a download run to whoever displays it.

use std::fmt;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Something a run wants the user to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMessage {
    /// A line for the scrolling log
    Log(String),
    /// Replacement text for the one-line status display
    Status(String),
    /// The run is over; always the last message of a run
    Finished { success: bool },
}

impl fmt::Display for ProgressMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressMessage::Log(text) => write!(f, "log:{}", text),
            ProgressMessage::Status(text) => write!(f, "status:{}", text),
            ProgressMessage::Finished { success } => write!(f, "finished:{}", success),
        }
    }
}

/// Create the two ends of a progress channel.
///
/// The channel is unbounded, so a run never waits on a slow consumer.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, ProgressReceiver { rx })
}

/// Producing end, owned by the run. Not `Clone`: there is exactly one
/// producer, and [`ProgressSender::finished`] consumes it so nothing can be
/// sent after the final message.
#[derive(Debug)]
pub struct ProgressSender {
    tx: UnboundedSender<ProgressMessage>,
}

impl ProgressSender {
    pub fn log(&self, text: impl Into<String>) {
        self.send(ProgressMessage::Log(text.into()));
    }

    pub fn status(&self, text: impl Into<String>) {
        self.send(ProgressMessage::Status(text.into()));
    }

    pub fn finished(self, success: bool) {
        self.send(ProgressMessage::Finished { success });
    }

    fn send(&self, message: ProgressMessage) {
        debug!(target: "download_pipeline::progress", "{}", message);
        // a consumer that went away just stops listening; the run carries on
        let _ = self.tx.send(message);
    }
}

/// Consuming end, owned by the presentation layer
#[derive(Debug)]
pub struct ProgressReceiver {
    rx: UnboundedReceiver<ProgressMessage>,
}

impl ProgressReceiver {
    /// Wait for the next message. `None` once the sender is gone and every
    /// message has been received.
    pub async fn recv(&mut self) -> Option<ProgressMessage> {
        self.rx.recv().await
    }

    /// Next message if one is queued, without waiting
    pub fn try_recv(&mut self) -> Option<ProgressMessage> {
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
