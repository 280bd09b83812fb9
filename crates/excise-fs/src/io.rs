//! Text reads and atomic writes with file locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Removes the temp file on every exit path that did not complete the rename.
struct TempFileGuard {
    path: PathBuf,
    committed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.committed && self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temp file");
            }
        }
    }
}

fn temp_path_for(native_path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    native_path.with_file_name(temp_name)
}

/// Write content atomically to a file with locking.
///
/// A symlinked target is resolved so the file it points at is replaced and
/// the link survives. An existing target must open for writing; that handle
/// holds an exclusive advisory lock until the replacement is renamed into
/// place. The temp file never outlives a failed write. Permissions of an
/// existing target are carried over to the replacement.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = resolve_target(&path.to_native())?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let target_lock = lock_existing_target(&target)?;

    let temp_path = temp_path_for(&target);
    let guard = TempFileGuard::new(temp_path.clone());

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    drop(temp_file);

    if let Ok(metadata) = fs::metadata(&target) {
        fs::set_permissions(&temp_path, metadata.permissions())
            .map_err(|e| Error::io(&temp_path, e))?;
    }

    fs::rename(&temp_path, &target).map_err(|e| Error::io(&target, e))?;
    guard.commit();

    if let Some(file) = target_lock {
        FileExt::unlock(&file).map_err(|_| Error::LockFailed {
            path: target.clone(),
        })?;
    }

    tracing::debug!(path = %path, target = %target.display(), bytes = content.len(), "wrote file atomically");
    Ok(())
}

/// Follow a symlinked target to the file it names.
fn resolve_target(native_path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(native_path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::canonicalize(native_path).map_err(|e| Error::io(native_path, e))
        }
        _ => Ok(native_path.to_path_buf()),
    }
}

/// Open an existing target for writing and lock it. A missing target is fine.
fn lock_existing_target(target: &Path) -> Result<Option<File>> {
    let file = match OpenOptions::new().write(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(target, e)),
    };

    FileExt::lock_exclusive(&file).map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;
    Ok(Some(file))
}

/// Read a whole file as UTF-8 text.
///
/// Invalid UTF-8 surfaces as an I/O error of kind `InvalidData`.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    let content = fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))?;
    tracing::debug!(path = %path, bytes = content.len(), "read file");
    Ok(content)
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
