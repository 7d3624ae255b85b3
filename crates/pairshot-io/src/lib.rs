//! pairshot-io: Browser I/O and Dioxus component library.
//!
//! Reads uploaded files, calls the image generation service over HTTP,
//! triggers Blob downloads, and provides the UI components for the
//! pairshot web application.

pub mod browser_file;
pub mod components;
pub mod download;
pub mod gemini;

pub use browser_file::BrowserFile;
pub use components::{BackgroundPicker, ImageUploader, ResultPanel};
pub use download::{DownloadError, save_artifact};
pub use gemini::GeminiMergeService;
