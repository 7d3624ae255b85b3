//! [`FileSource`] over the files Dioxus hands to input and drop events.

use async_trait::async_trait;
use dioxus::html::FileData;
use pairshot_core::FileSource;

/// Image extensions recognized when the browser reports no MIME type.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
];

/// Guess an image MIME type from a filename's extension.
///
/// Some platforms drop the type on drag-and-drop, leaving only the name.
#[must_use]
pub fn mime_from_extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    IMAGE_EXTENSIONS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// A file chosen in the picker or dropped on an uploader.
pub struct BrowserFile(pub FileData);

#[async_trait(?Send)]
impl FileSource for BrowserFile {
    type Error = String;

    fn name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> Option<String> {
        self.0
            .content_type()
            .filter(|declared| !declared.is_empty())
            .or_else(|| mime_from_extension(&self.0.name()).map(str::to_owned))
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        self.0
            .read_bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_case_insensitively() {
        assert_eq!(mime_from_extension("me.PNG"), Some("image/png"));
        assert_eq!(mime_from_extension("holiday.photo.jpeg"), Some("image/jpeg"));
        assert_eq!(mime_from_extension("x.webp"), Some("image/webp"));
    }

    #[test]
    fn unknown_or_missing_extension_has_no_type() {
        assert_eq!(mime_from_extension("notes.txt"), None);
        assert_eq!(mime_from_extension("README"), None);
        assert_eq!(mime_from_extension("trailing."), None);
    }
}
