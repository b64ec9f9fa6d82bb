//! Atomic replacement of the textfile collector output.
//!
//! Metrics are written to a temporary sibling first and renamed over the
//! target so the node exporter never observes a partially written file.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

/// Builds the temporary sibling path (`<file>.tmp`).
fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Writes `contents` to `path` atomically, creating parent directories as
/// needed.
pub async fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp = tmp_path(path);
    debug!("Temporarily writing metrics to {}", tmp.display());
    fs::write(&tmp, contents).await?;

    debug!("Moving {} to {}", tmp.display(), path.display());
    fs::rename(&tmp, path).await?;
    Ok(())
}
