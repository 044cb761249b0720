//! Remote mirror trait and the filesystem mirror.

use crate::SyncResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A remote location holding one serialized copy of the store.
pub trait RemoteMirror {
    /// Fetch the stored snapshot. `Ok(None)` when nothing has been uploaded yet.
    fn download(&self) -> SyncResult<Option<Vec<u8>>>;

    /// Replace the stored snapshot.
    fn upload(&self, snapshot: &[u8]) -> SyncResult<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

impl<T: RemoteMirror + ?Sized> RemoteMirror for Box<T> {
    fn download(&self) -> SyncResult<Option<Vec<u8>>> {
        (**self).download()
    }

    fn upload(&self, snapshot: &[u8]) -> SyncResult<()> {
        (**self).upload(snapshot)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Mirror backed by a file, e.g. on a mounted network share.
#[derive(Debug, Clone)]
pub struct FsMirror {
    path: PathBuf,
}

impl FsMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RemoteMirror for FsMirror {
    fn download(&self) -> SyncResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn upload(&self, snapshot: &[u8]) -> SyncResult<()> {
        write_atomic(&self.path, snapshot)?;
        debug!(path = %self.path.display(), bytes = snapshot.len(), "Snapshot written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// Write `bytes` to `path` through a temp file in the same directory and a
/// rename, so readers see either the old or the new file.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> SyncResult<()> {
    let parent = parent_dir(path);
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
