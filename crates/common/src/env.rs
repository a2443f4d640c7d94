//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;
use tracing::debug;

/// Ensure the parent directory of a file-backed store exists.
pub fn ensure_data_dir(store_path: &Path) -> anyhow::Result<()> {
    let Some(dir) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if std::fs::metadata(dir).is_err() {
        debug!(dir = %dir.display(), "creating data directory");
    }
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    Ok(())
}
