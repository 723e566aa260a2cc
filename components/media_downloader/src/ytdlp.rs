use crate::types::{DownloadError, Downloader, FetchOutput, FetchRequest};
use crate::utils::AUDIO_EXTENSION;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Keeps a console window from flashing up for every track on Windows
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn binary_name(&self) -> String {
        self.binary.display().to_string()
    }
}

/// Command line for one search-and-fetch: take the single best search hit,
/// extract the audio and transcode it at the best quality.
pub(crate) fn fetch_args(request: &FetchRequest) -> Vec<OsString> {
    vec![
        format!("ytsearch1:{}", request.query).into(),
        "-x".into(),
        "--audio-format".into(),
        AUDIO_EXTENSION.into(),
        "--audio-quality".into(),
        "0".into(),
        "-o".into(),
        request.output_template.clone().into_os_string(),
        "--no-playlist".into(),
        "--encoding".into(),
        "utf-8".into(),
    ]
}

#[async_trait]
impl Downloader for YtDlp {
    async fn check_available(&self) -> Result<(), DownloadError> {
        which::which(&self.binary)
            .map(|_| ())
            .map_err(|_| DownloadError::ToolMissing(self.binary_name()))
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutput, DownloadError> {
        let args = fetch_args(request);
        debug!("Running {} {:?}", self.binary_name(), args);

        let mut command = Command::new(&self.binary);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let output = command.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DownloadError::ToolMissing(self.binary_name()),
            _ => DownloadError::Io(e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(DownloadError::ToolExecutionFailed {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(FetchOutput { stdout, stderr })
    }
}
