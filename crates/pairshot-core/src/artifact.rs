//! The downloadable file produced from a merged result.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Filename offered for every download.
pub const DOWNLOAD_FILENAME: &str = "best-friends-photo.png";

/// MIME type of the merged image.
pub const DOWNLOAD_MIME_TYPE: &str = "image/png";

/// Errors that can occur while preparing a download.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    /// The stored result is not valid base64.
    #[error("merged image is not valid base64: {0}")]
    Decode(String),
}

/// A decoded file ready to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Suggested filename.
    pub filename: &'static str,
    /// MIME type for the Blob.
    pub mime_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    /// Decode a base64 PNG into an artifact named
    /// [`DOWNLOAD_FILENAME`].
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Decode`] if `base64` is malformed.
    pub fn from_base64(base64: &str) -> Result<Self, ArtifactError> {
        let bytes = BASE64
            .decode(base64.trim())
            .map_err(|e| ArtifactError::Decode(e.to_string()))?;
        Ok(Self {
            filename: DOWNLOAD_FILENAME,
            mime_type: DOWNLOAD_MIME_TYPE,
            bytes,
        })
    }

    /// A `data:` URL of the same contents, for inline preview.
    #[must_use]
    pub fn data_url_for(base64: &str) -> String {
        format!("data:{DOWNLOAD_MIME_TYPE};base64,{base64}")
    }
}
