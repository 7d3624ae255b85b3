//! pairshot-core: Sans-IO core of the best friends photo merge.
//!
//! Holds everything that decides *what* happens:
//! upload capture -> session state machine -> merge request ->
//! result or error -> download artifact.
//!
//! This crate has **no browser or network dependencies**. File access
//! and image generation are reached through the [`FileSource`] and
//! [`MergeService`] traits; the implementations over the DOM and the
//! HTTP image service live in `pairshot-io`.

pub mod artifact;
pub mod config;
pub mod merge;
pub mod preset;
pub mod prompt;
pub mod session;
pub mod types;
pub mod upload;

pub use artifact::{ArtifactError, DOWNLOAD_FILENAME, DownloadArtifact};
pub use config::MergeConfig;
pub use merge::{MergeError, MergeRequest, MergeService, UNKNOWN_ERROR_MESSAGE, run_merge};
pub use preset::PresetId;
pub use prompt::merge_prompt;
pub use session::{Effect, Event, GenerationSession, Ticket, VALIDATION_MESSAGE};
pub use types::{Page, Phase, Slot, Slots, UploadedImage};
pub use upload::{FileSource, ReadToken, UploadCapture, UploadLimits, UploadRejected, capture};
