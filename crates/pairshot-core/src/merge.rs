//! The seam to the external image generation service.
//!
//! [`MergeService`] is implemented over HTTP in `pairshot-io` and by
//! mocks in tests. [`run_merge`] executes a [`MergeRequest`] and packages
//! the outcome as the event the session expects back.

use async_trait::async_trait;

use crate::session::{Event, Ticket};
use crate::types::UploadedImage;

/// Shown when a failed merge carries no description of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Everything the service needs for one merge.
///
/// Produced by the session on the `Setup -> Requesting` transition and
/// consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Identifies the request when its outcome comes back.
    pub ticket: Ticket,
    /// Person 1.
    pub first: UploadedImage,
    /// Person 2.
    pub second: UploadedImage,
    /// Background description from the selected preset.
    pub instruction: String,
}

/// Why the service did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// The service rejected the request and said why.
    #[error("{0}")]
    Service(String),

    /// Non-success HTTP status without a readable error body.
    #[error("the image service responded with HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request never completed.
    #[error("could not reach the image service: {0}")]
    Transport(String),

    /// The service answered but returned no image data.
    #[error("The model did not return an image. It may have declined the request; try different photos.")]
    NoImage,

    /// The response body could not be understood.
    #[error("unexpected response from the image service: {0}")]
    InvalidResponse(String),

    /// No API key was configured, so nothing was sent.
    #[error("no API key configured; rebuild with PAIRSHOT_API_KEY set")]
    MissingApiKey,

    /// The failure carried no description.
    #[error("An unknown error occurred.")]
    Unspecified,
}

impl MergeError {
    /// Text shown to the user, falling back to
    /// [`UNKNOWN_ERROR_MESSAGE`] when the error has nothing to say.
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_owned()
        } else {
            message
        }
    }
}

/// An image generation backend that composites two people into one photo.
#[async_trait(?Send)]
pub trait MergeService {
    /// Merge the two images onto the requested background.
    ///
    /// Returns the merged PNG as base64 text. May suspend for as long as
    /// the remote service takes.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError`] describing why no image was produced.
    async fn merge(&self, request: &MergeRequest) -> Result<String, MergeError>;
}

/// Execute `request` against `service` and wrap the outcome in the event
/// to dispatch back into the session.
pub async fn run_merge<S: MergeService + ?Sized>(service: &S, request: MergeRequest) -> Event {
    tracing::info!(ticket = %request.ticket, "merge request started");
    let outcome = service.merge(&request).await;
    match &outcome {
        Ok(image) => tracing::info!(ticket = %request.ticket, bytes = image.len(), "merge request finished"),
        Err(e) => tracing::warn!(ticket = %request.ticket, error = %e, "merge request failed"),
    }
    Event::MergeFinished {
        ticket: request.ticket,
        outcome,
    }
}
