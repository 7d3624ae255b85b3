//! Dioxus UI components for pairshot.
//!
//! Provides the per-person image uploader, the background preset picker,
//! and the result panel.

mod background_picker;
mod result_panel;
mod uploader;

pub use background_picker::BackgroundPicker;
pub use result_panel::ResultPanel;
pub use uploader::ImageUploader;
