//! Inline image uploads and the media paths they are stored under.
//!
//! Clients send images as base64 text, optionally wrapped in a
//! `data:image/<type>;base64,` URL. The decoded bytes must carry a JPEG, PNG
//! or GIF signature; the declared media type in a data URL is ignored.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::domain::{UserId, Username};

const DATA_URL_PREFIX: &str = "data:image";
const DATA_URL_SEPARATOR: &str = ";base64,";

/// Reasons an inline image is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    #[error("image must not be empty")]
    Empty,
    #[error("data URL must contain a base64 payload")]
    MalformedDataUrl,
    #[error("image is not valid base64")]
    InvalidBase64,
    #[error("unsupported image format; use JPEG, PNG or GIF")]
    UnsupportedFormat,
}

/// Supported image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Detect the format from the leading signature bytes.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::detect(b"GIF89a..."), Some(ImageFormat::Gif));
    /// assert_eq!(ImageFormat::detect(b"plain text"), None);
    /// ```
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(PNG) {
            Some(Self::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else {
            None
        }
    }

    /// File extension used for stored files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }
}

/// Decoded image ready to be written to the media store.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Decode a base64 string or `data:image/...;base64,` URL.
    pub fn parse(raw: &str) -> Result<Self, ImageValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        let payload = if trimmed.starts_with(DATA_URL_PREFIX) {
            trimmed
                .split_once(DATA_URL_SEPARATOR)
                .map(|(_, payload)| payload)
                .ok_or(ImageValidationError::MalformedDataUrl)?
        } else {
            trimmed
        };
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|_| ImageValidationError::InvalidBase64)?;
        Self::from_bytes(bytes)
    }

    /// Wrap raw bytes after checking their signature.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageValidationError> {
        let format = ImageFormat::detect(&bytes).ok_or(ImageValidationError::UnsupportedFormat)?;
        Ok(Self { format, bytes })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Relative path of a stored media file, using `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaPath(String);

impl MediaPath {
    /// Wrap a path read from storage.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Fresh, collision-free location for a recipe image.
    pub fn for_recipe_image(format: ImageFormat) -> Self {
        Self(format!(
            "recipes/images/{}.{}",
            Uuid::new_v4(),
            format.extension()
        ))
    }

    /// Location of a user's avatar. Re-uploading with the same format
    /// overwrites the previous file.
    pub fn for_avatar(user_id: UserId, username: &Username, format: ImageFormat) -> Self {
        Self(format!(
            "users/avatars/{username}/user_{user_id}_avatar.{}",
            format.extension()
        ))
    }

    /// Path segments, for adapters that walk directories.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }
}

impl AsRef<str> for MediaPath {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
