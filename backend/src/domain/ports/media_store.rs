//! Port for storing uploaded media files.

use async_trait::async_trait;

use crate::domain::MediaPath;

use super::define_port_error;

define_port_error! {
    /// Errors raised by media store adapters.
    pub enum MediaStoreError {
        /// The path escapes the media root or has no file name.
        InvalidPath { path: String } => "invalid media path: {path}",
        /// Filesystem operation failed.
        Io { message: String } => "media store I/O failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write `bytes` at `path`, creating parent directories and replacing any
    /// existing file.
    async fn save(&self, path: &MediaPath, bytes: &[u8]) -> Result<(), MediaStoreError>;

    /// Remove the file at `path`. Missing files are not an error.
    async fn delete(&self, path: &MediaPath) -> Result<(), MediaStoreError>;
}
