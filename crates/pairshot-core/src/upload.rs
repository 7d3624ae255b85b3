//! Upload capture: turn a user-supplied file into an [`UploadedImage`].
//!
//! Both the file picker and drag-and-drop funnel into one read path:
//! [`UploadCapture::begin_read`], then [`capture`], then
//! [`UploadCapture::finish_read`]. [`UploadCapture::submit_file`] runs all
//! three when the caller can hold `&mut` across the read; the Dioxus
//! uploader runs them separately because its state lives in a signal.
//!
//! Files whose declared type is not `image/*` are rejected before any
//! bytes are read. Rejections are never shown to the user; they are
//! returned to the caller and traced.

use std::fmt;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, MergeConfig};
use crate::types::UploadedImage;

/// A file offered by the picker or a drop.
///
/// Implemented by the browser layer over its native file handle, and by
/// in-memory fixtures in tests.
#[async_trait(?Send)]
pub trait FileSource {
    /// Error produced while reading the file contents.
    type Error: fmt::Display;

    /// Filename as reported by the host.
    fn name(&self) -> String;

    /// Declared MIME type, if the host reports one.
    fn mime_type(&self) -> Option<String>;

    /// Read the whole file. May suspend while the host loads the bytes.
    async fn read_bytes(&self) -> Result<Vec<u8>, Self::Error>;
}

/// Why a file was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejected {
    /// The declared type does not start with `image/`.
    #[error("not an image: {mime_type:?}")]
    NotAnImage {
        /// The declared type, empty when none was reported.
        mime_type: String,
    },

    /// The file has no contents.
    #[error("file is empty")]
    Empty,

    /// The file exceeds the configured limit.
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Configured maximum in bytes.
        limit: usize,
    },

    /// The host failed to read the file.
    #[error("failed to read file: {0}")]
    Read(String),

    /// A newer read, or a removal, started before this one finished.
    #[error("superseded by a newer upload")]
    Superseded,
}

/// Identifies one read started by [`UploadCapture::begin_read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadToken(u64);

/// Limits applied to every accepted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest accepted file in bytes.
    pub max_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<&MergeConfig> for UploadLimits {
    fn from(config: &MergeConfig) -> Self {
        Self {
            max_bytes: config.max_upload_bytes,
        }
    }
}

/// Validate, read, and encode a single file.
///
/// The type check happens before [`FileSource::read_bytes`] is called.
///
/// # Errors
///
/// Returns [`UploadRejected`] when the type is not `image/*`, the file is
/// empty or larger than `limits.max_bytes`, or reading fails.
pub async fn capture<F: FileSource + ?Sized>(
    file: &F,
    limits: UploadLimits,
) -> Result<UploadedImage, UploadRejected> {
    let mime_type = match file.mime_type() {
        Some(mime) if mime.starts_with("image/") => mime,
        other => {
            return Err(UploadRejected::NotAnImage {
                mime_type: other.unwrap_or_default(),
            });
        }
    };

    let bytes = file
        .read_bytes()
        .await
        .map_err(|e| UploadRejected::Read(e.to_string()))?;

    if bytes.is_empty() {
        return Err(UploadRejected::Empty);
    }
    if bytes.len() > limits.max_bytes {
        return Err(UploadRejected::TooLarge {
            size: bytes.len(),
            limit: limits.max_bytes,
        });
    }

    Ok(UploadedImage {
        base64: BASE64.encode(&bytes),
        mime_type,
        name: file.name(),
    })
}

/// State of one uploader: the current image, the drag highlight, and
/// the key of the underlying file input.
///
/// `on_change` is called with the new image after every accepted upload
/// and with `None` after [`clear`](Self::clear). It is never called for a
/// rejected file.
pub struct UploadCapture<N> {
    limits: UploadLimits,
    current: Option<UploadedImage>,
    dragging: bool,
    input_key: u64,
    latest_read: u64,
    on_change: N,
}

impl<N> fmt::Debug for UploadCapture<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCapture")
            .field("limits", &self.limits)
            .field("current", &self.current.as_ref().map(|i| &i.name))
            .field("dragging", &self.dragging)
            .field("input_key", &self.input_key)
            .field("latest_read", &self.latest_read)
            .finish_non_exhaustive()
    }
}

impl<N: FnMut(Option<UploadedImage>)> UploadCapture<N> {
    /// An empty uploader.
    pub const fn new(limits: UploadLimits, on_change: N) -> Self {
        Self {
            limits,
            current: None,
            dragging: false,
            input_key: 0,
            latest_read: 0,
            on_change,
        }
    }

    /// Start out holding `image` without notifying `on_change`.
    ///
    /// Used when the uploader is recreated for an image its owner
    /// already has.
    #[must_use]
    pub fn with_image(mut self, image: Option<UploadedImage>) -> Self {
        self.current = image;
        self
    }

    /// The accepted image, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&UploadedImage> {
        self.current.as_ref()
    }

    /// Whether a drag is hovering over the drop zone.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Key for the file input element. Changes on every
    /// [`clear`](Self::clear) so the same file can be picked again.
    #[must_use]
    pub const fn input_key(&self) -> u64 {
        self.input_key
    }

    /// The limits this uploader enforces.
    #[must_use]
    pub const fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// A drag entered (or moved over) the drop zone.
    pub const fn drag_enter(&mut self) {
        self.dragging = true;
    }

    /// A drag left the drop zone.
    pub const fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Register a read that is about to start. Any read started earlier
    /// becomes stale.
    pub const fn begin_read(&mut self) -> ReadToken {
        self.latest_read = self.latest_read.wrapping_add(1);
        ReadToken(self.latest_read)
    }

    /// Apply the outcome of the [`capture`] registered as `token`.
    ///
    /// # Errors
    ///
    /// Passes a rejection through without changing state. Returns
    /// [`UploadRejected::Superseded`] if another read or a
    /// [`clear`](Self::clear) happened since `token` was issued.
    pub fn finish_read(
        &mut self,
        token: ReadToken,
        outcome: Result<UploadedImage, UploadRejected>,
    ) -> Result<&UploadedImage, UploadRejected> {
        if token.0 != self.latest_read {
            tracing::debug!(token = token.0, latest = self.latest_read, "discarding superseded upload");
            return Err(UploadRejected::Superseded);
        }
        match outcome {
            Ok(image) => {
                tracing::debug!(name = %image.name, mime = %image.mime_type, "upload accepted");
                (self.on_change)(Some(image.clone()));
                let stored: &UploadedImage = self.current.insert(image);
                Ok(stored)
            }
            Err(rejected) => {
                match &rejected {
                    UploadRejected::NotAnImage { .. }
                    | UploadRejected::Empty
                    | UploadRejected::Superseded => {
                        tracing::debug!(%rejected, "upload ignored");
                    }
                    UploadRejected::TooLarge { .. } | UploadRejected::Read(_) => {
                        tracing::warn!(%rejected, "upload ignored");
                    }
                }
                Err(rejected)
            }
        }
    }

    /// Capture a file from the picker.
    ///
    /// # Errors
    ///
    /// Returns the [`UploadRejected`] reason; the current image and the
    /// callback are untouched in that case.
    pub async fn submit_file<F: FileSource + ?Sized>(
        &mut self,
        file: &F,
    ) -> Result<&UploadedImage, UploadRejected> {
        let token = self.begin_read();
        let outcome = capture(file, self.limits).await;
        self.finish_read(token, outcome)
    }

    /// Capture a dropped file. Ends the drag highlight first.
    ///
    /// # Errors
    ///
    /// Same as [`submit_file`](Self::submit_file).
    pub async fn drop_file<F: FileSource + ?Sized>(
        &mut self,
        file: &F,
    ) -> Result<&UploadedImage, UploadRejected> {
        self.drag_leave();
        self.submit_file(file).await
    }

    /// Drop the current image, reset the file input, and abandon any
    /// read still in progress.
    pub fn clear(&mut self) {
        self.current = None;
        self.input_key = self.input_key.wrapping_add(1);
        self.latest_read = self.latest_read.wrapping_add(1);
        (self.on_change)(None);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::*;

    /// In-memory file that counts how often its contents are read.
    struct MemoryFile {
        name: &'static str,
        mime: Option<&'static str>,
        bytes: Vec<u8>,
        reads: Cell<usize>,
    }

    impl MemoryFile {
        fn new(name: &'static str, mime: &'static str, bytes: &[u8]) -> Self {
            Self {
                name,
                mime: Some(mime),
                bytes: bytes.to_vec(),
                reads: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl FileSource for MemoryFile {
        type Error = std::convert::Infallible;

        fn name(&self) -> String {
            self.name.to_owned()
        }

        fn mime_type(&self) -> Option<String> {
            self.mime.map(str::to_owned)
        }

        async fn read_bytes(&self) -> Result<Vec<u8>, Self::Error> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.bytes.clone())
        }
    }

    struct BrokenFile;

    #[async_trait(?Send)]
    impl FileSource for BrokenFile {
        type Error = &'static str;

        fn name(&self) -> String {
            "broken.png".to_owned()
        }

        fn mime_type(&self) -> Option<String> {
            Some("image/png".to_owned())
        }

        async fn read_bytes(&self) -> Result<Vec<u8>, Self::Error> {
            Err("permission denied")
        }
    }

    type Log = Rc<RefCell<Vec<Option<UploadedImage>>>>;

    fn recording_capture(limits: UploadLimits) -> (UploadCapture<impl FnMut(Option<UploadedImage>)>, Log) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let capture = UploadCapture::new(limits, move |image| sink.borrow_mut().push(image));
        (capture, log)
    }

    #[test]
    fn png_is_encoded_as_base64() {
        let file = MemoryFile::new("me.png", "image/png", b"\x89PNG");
        let image = block_on(capture(&file, UploadLimits::default())).unwrap();
        assert_eq!(image.base64, "iVBORw==");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.name, "me.png");
    }

    #[test]
    fn text_file_is_rejected_without_reading_or_notifying() {
        let (mut uploader, log) = recording_capture(UploadLimits::default());
        let file = MemoryFile::new("notes.txt", "text/plain", b"hello");

        let outcome = block_on(uploader.submit_file(&file)).map(|_| ());

        assert_eq!(
            outcome,
            Err(UploadRejected::NotAnImage {
                mime_type: "text/plain".to_owned()
            })
        );
        assert_eq!(file.reads.get(), 0);
        assert!(uploader.current().is_none());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn missing_type_is_rejected() {
        let mut file = MemoryFile::new("mystery", "image/png", b"x");
        file.mime = None;
        let err = block_on(capture(&file, UploadLimits::default())).unwrap_err();
        assert!(matches!(err, UploadRejected::NotAnImage { ref mime_type } if mime_type.is_empty()));
    }

    #[test]
    fn oversized_and_empty_files_are_rejected() {
        let limits = UploadLimits { max_bytes: 4 };
        let big = MemoryFile::new("big.jpg", "image/jpeg", b"12345");
        assert_eq!(
            block_on(capture(&big, limits)).unwrap_err(),
            UploadRejected::TooLarge { size: 5, limit: 4 }
        );

        let empty = MemoryFile::new("empty.jpg", "image/jpeg", b"");
        assert_eq!(block_on(capture(&empty, limits)).unwrap_err(), UploadRejected::Empty);
    }

    #[test]
    fn read_failure_is_reported() {
        let err = block_on(capture(&BrokenFile, UploadLimits::default())).unwrap_err();
        assert_eq!(err, UploadRejected::Read("permission denied".to_owned()));
    }

    #[test]
    fn accepted_upload_notifies_and_replaces_previous() {
        let (mut uploader, log) = recording_capture(UploadLimits::default());
        let first = MemoryFile::new("a.png", "image/png", b"a");
        let second = MemoryFile::new("b.webp", "image/webp", b"b");

        block_on(uploader.submit_file(&first)).unwrap();
        block_on(uploader.submit_file(&second)).unwrap();

        assert_eq!(uploader.current().unwrap().name, "b.webp");
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].as_ref().unwrap().mime_type, "image/webp");
    }

    #[test]
    fn drag_flag_does_not_touch_data() {
        let (mut uploader, log) = recording_capture(UploadLimits::default());
        uploader.drag_enter();
        assert!(uploader.is_dragging());
        uploader.drag_leave();
        assert!(!uploader.is_dragging());

        uploader.drag_enter();
        let file = MemoryFile::new("drop.png", "image/png", b"d");
        block_on(uploader.drop_file(&file)).unwrap();
        assert!(!uploader.is_dragging());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn rejected_drop_still_ends_drag() {
        let (mut uploader, log) = recording_capture(UploadLimits::default());
        uploader.drag_enter();
        let file = MemoryFile::new("doc.pdf", "application/pdf", b"%PDF");
        assert!(block_on(uploader.drop_file(&file)).is_err());
        assert!(!uploader.is_dragging());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn overlapping_reads_keep_the_newest_file() {
        let (mut uploader, log) = recording_capture(UploadLimits::default());
        let slow = MemoryFile::new("slow.png", "image/png", b"a");
        let fast = MemoryFile::new("fast.png", "image/png", b"b");

        let slow_token = uploader.begin_read();
        let fast_token = uploader.begin_read();
        let fast_image = block_on(capture(&fast, uploader.limits()));
        let slow_image = block_on(capture(&slow, uploader.limits()));

        uploader.finish_read(fast_token, fast_image).unwrap();
        assert_eq!(
            uploader.finish_read(slow_token, slow_image).map(|_| ()),
            Err(UploadRejected::Superseded)
        );

        assert_eq!(uploader.current().unwrap().name, "fast.png");
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn clear_abandons_a_read_in_progress() {
        let (mut uploader, log) = recording_capture(UploadLimits::default());
        let file = MemoryFile::new("late.png", "image/png", b"l");

        let token = uploader.begin_read();
        uploader.clear();
        let outcome = block_on(capture(&file, uploader.limits()));

        assert!(uploader.finish_read(token, outcome).is_err());
        assert!(uploader.current().is_none());
        assert_eq!(*log.borrow(), vec![None]);
    }

    #[test]
    fn seeded_image_is_shown_without_notifying() {
        let (uploader, log) = recording_capture(UploadLimits::default());
        let image = UploadedImage {
            base64: "AAA".to_owned(),
            mime_type: "image/png".to_owned(),
            name: "kept.png".to_owned(),
        };

        let mut uploader = uploader.with_image(Some(image));

        assert_eq!(uploader.current().unwrap().name, "kept.png");
        assert!(log.borrow().is_empty());

        uploader.clear();
        assert!(uploader.current().is_none());
        assert_eq!(*log.borrow(), vec![None]);
    }

    #[test]
    fn clear_notifies_none_and_rekeys_input() {
        let (mut uploader, log) = recording_capture(UploadLimits::default());
        let file = MemoryFile::new("a.png", "image/png", b"a");
        block_on(uploader.submit_file(&file)).unwrap();
        let key = uploader.input_key();

        uploader.clear();

        assert!(uploader.current().is_none());
        assert_ne!(uploader.input_key(), key);
        assert_eq!(log.borrow().last(), Some(&None));

        // The same file can be picked again after clearing.
        block_on(uploader.submit_file(&file)).unwrap();
        assert_eq!(uploader.current().unwrap().name, "a.png");
    }
}
