use std::path::{Path, PathBuf};

/// Extension of the transcoded audio files
pub const AUDIO_EXTENSION: &str = "mp3";

/// Lines yt-dlp prints when it has written (or found) the output file
const SUCCESS_MARKERS: [&str; 2] = ["has already been downloaded", "Destination:"];

/// Final location of a track with the given sanitized stem
pub fn target_path(output_dir: &Path, file_stem: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", file_stem, AUDIO_EXTENSION))
}

/// Output template handed to the tool; it substitutes the real extension
pub fn output_template(output_dir: &Path, file_stem: &str) -> PathBuf {
    output_dir.join(format!("{}.%(ext)s", file_stem))
}

/// Whether a clean tool exit actually produced the file.
///
/// A target that already exists counts as confirmation even when the tool
/// printed nothing recognizable. This is deliberately lenient: a file left
/// by an earlier partial run is indistinguishable from a fresh download.
pub fn confirms_download(stdout: &str, target_exists: bool) -> bool {
    target_exists || SUCCESS_MARKERS.iter().any(|marker| stdout.contains(marker))
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
