//! Discovery of the capturing tool's log files for `--all`

use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_PREFIX: &str = "typing-log-";
const LOG_EXTENSION: &str = "jsonl";

/// Directory the capturing tool writes to.
///
/// | Platform | Path |
/// |----------|------|
/// | Linux | `~/.local/share/TouchCursor/Logs` |
/// | macOS | `~/Library/Application Support/TouchCursor/Logs` |
/// | Windows | `%APPDATA%\TouchCursor\Logs` |
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("TouchCursor").join("Logs"))
}

/// Whether `path` looks like `typing-log-<date>-<session>.jsonl`.
pub fn is_typing_log(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(LOG_PREFIX))
        .unwrap_or(false);
    let ext_ok = path
        .extension()
        .map(|ext| ext == LOG_EXTENSION)
        .unwrap_or(false);
    name_ok && ext_ok
}

/// All typing logs directly under `dir`, sorted by file name.
///
/// Date-stamped names make this chronological order.
pub fn find_typing_logs(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read log directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_typing_log(path))
        .collect();
    files.sort();
    files
}
