//! Filesystem media store.
//!
//! Files are written below a single capability directory (`cap_std::fs::Dir`)
//! opened at startup, so no media path can reach outside the media root.
//! Blocking filesystem calls run on Tokio's blocking pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::{MediaPath, TraceId};
use crate::domain::ports::{MediaStore, MediaStoreError};

/// [`MediaStore`] backed by a directory on the local filesystem.
#[derive(Clone)]
pub struct FsMediaStore {
    root: Arc<Dir>,
}

impl FsMediaStore {
    /// Open `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be created or opened.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }
}

/// Relative path for `path`, rejecting segments that would leave the root.
fn relative_path(path: &MediaPath) -> Result<PathBuf, MediaStoreError> {
    let invalid = || MediaStoreError::invalid_path(path.as_ref());
    let mut relative = PathBuf::new();
    for segment in path.segments() {
        if segment == "." || segment == ".." || segment.contains('\\') {
            return Err(invalid());
        }
        relative.push(segment);
    }
    if relative.file_name().is_none() {
        return Err(invalid());
    }
    Ok(relative)
}

fn io_error(path: &Path, error: &io::Error) -> MediaStoreError {
    debug!(path = %path.display(), %error, "media store operation failed");
    MediaStoreError::io(format!("{}: {error}", path.display()))
}

async fn on_blocking_pool<T, F>(task: F) -> Result<T, MediaStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, MediaStoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(TraceId::carry(task))
        .await
        .map_err(|err| MediaStoreError::io(format!("media task failed: {err}")))?
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn save(&self, path: &MediaPath, bytes: &[u8]) -> Result<(), MediaStoreError> {
        let relative = relative_path(path)?;
        let root = Arc::clone(&self.root);
        let contents = bytes.to_vec();
        on_blocking_pool(move || {
            if let Some(parent) = relative.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                root.create_dir_all(parent)
                    .map_err(|err| io_error(parent, &err))?;
            }
            root.write(&relative, contents)
                .map_err(|err| io_error(&relative, &err))
        })
        .await
    }

    async fn delete(&self, path: &MediaPath) -> Result<(), MediaStoreError> {
        let relative = relative_path(path)?;
        let root = Arc::clone(&self.root);
        on_blocking_pool(move || match root.remove_file(&relative) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&relative, &error)),
        })
        .await
    }
}
