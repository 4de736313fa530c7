use std::{fs, io::Write, path::Path};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Reject "-" as an output path.
pub(crate) fn assert_not_stdout(path: &Path) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    Ok(())
}

/// Write `bytes` to `target` through a temp file in the same directory and
/// an atomic rename, refusing to replace an existing file unless `force`.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8], force: bool) -> Result<()> {
    let parent = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("create dir {}", parent.display()))?;
    if !force && target.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
    }

    let mut tmp = NamedTempFile::new_in(parent).context("create temp file")?;
    tmp.write_all(bytes)
        .with_context(|| format!("write {}", target.display()))?;
    tmp.as_file().sync_all().ok(); // best-effort fsync
    tmp.persist(target)
        .with_context(|| format!("rename to {}", target.display()))?;
    Ok(())
}
