use std::path::{Path, PathBuf};

use crate::Result;

/// Writes `contents` to `<index>.html` under `dir`, creating the directory if
/// needed. Indexes start at 1.
pub async fn write_numbered(dir: &Path, index: usize, contents: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{index}.html"));
    tokio::fs::write(&path, contents).await?;
    Ok(path)
}
