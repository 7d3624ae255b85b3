//! Generation lifecycle controller.
//!
//! [`GenerationSession`] is an explicit state machine over [`Phase`]:
//!
//! ```text
//!            Merge (both slots filled)
//!   Setup ─────────────────────────────▶ Requesting
//!     ▲  ◀───────────── Cancel ──────────┘   │
//!     │                                      │ MergeFinished
//!     │            StartOver           ┌─────┴─────┐
//!     └──────────────────────────── Succeeded    Failed
//! ```
//!
//! Every input arrives through [`GenerationSession::dispatch`]. The only
//! transition with an outside effect is `Setup -> Requesting`, which
//! returns [`Effect::StartMerge`] exactly once; the caller runs it (see
//! [`run_merge`](crate::run_merge)) and dispatches the resulting
//! [`Event::MergeFinished`]. Completions are applied only if the request
//! was neither cancelled nor superseded, so a late answer from an
//! abandoned request never overwrites newer state.

use std::fmt;

use crate::artifact::{ArtifactError, DownloadArtifact};
use crate::merge::{MergeError, MergeRequest};
use crate::preset::PresetId;
use crate::types::{Page, Phase, Slot, Slots, UploadedImage};

/// Shown on the setup page when merge is attempted with a slot empty.
pub const VALIDATION_MESSAGE: &str = "Please upload both images before merging.";

/// Identifies one merge request within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticket(u64);

impl Ticket {
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An uploader accepted a new image or was cleared.
    ImageChanged {
        /// Which uploader.
        slot: Slot,
        /// The new image, `None` after removal.
        image: Option<UploadedImage>,
    },
    /// The user picked a background preset.
    PresetSelected(PresetId),
    /// The user asked for the photos to be merged.
    Merge,
    /// The user abandoned the running request.
    Cancel,
    /// A merge request completed.
    MergeFinished {
        /// The ticket of the [`MergeRequest`] that completed.
        ticket: Ticket,
        /// Base64 PNG on success.
        outcome: Result<String, MergeError>,
    },
    /// "Create another" / "Try again": discard everything.
    StartOver,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a StartMerge effect must be executed or the session stays in Requesting"]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Call the merge service with this request.
    StartMerge(MergeRequest),
}

/// Transient state of one merge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSession {
    images: Slots<UploadedImage>,
    preset: PresetId,
    phase: Phase,
    error: Option<String>,
    merged_image: Option<String>,
    cancelled: bool,
    ticket: Ticket,
    upload_epoch: u64,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationSession {
    /// A fresh session: setup page, no images, default preset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            images: Slots::new(),
            preset: PresetId::Gray,
            phase: Phase::Setup,
            error: None,
            merged_image: None,
            cancelled: false,
            ticket: Ticket(0),
            upload_epoch: 0,
        }
    }

    /// The image in `slot`, if any.
    #[must_use]
    pub const fn image(&self, slot: Slot) -> Option<&UploadedImage> {
        self.images.get(slot)
    }

    /// The selected background preset.
    #[must_use]
    pub const fn preset(&self) -> PresetId {
        self.preset
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The page to render.
    #[must_use]
    pub const fn page(&self) -> Page {
        self.phase.page()
    }

    /// Whether a request is in flight and nothing has landed yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Requesting)
    }

    /// Validation error (setup page) or generation error (result page).
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The merged photo as base64 PNG.
    #[must_use]
    pub fn merged_image(&self) -> Option<&str> {
        self.merged_image.as_deref()
    }

    /// Whether the most recent request was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Ticket of the most recent request.
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Changes on every [`Event::StartOver`]. Used to key the uploaders
    /// so they are recreated empty.
    #[must_use]
    pub const fn upload_epoch(&self) -> u64 {
        self.upload_epoch
    }

    /// Whether a merge would be accepted right now.
    #[must_use]
    pub const fn can_merge(&self) -> bool {
        matches!(self.phase, Phase::Setup) && self.images.is_complete()
    }

    /// Feed one event into the state machine.
    pub fn dispatch(&mut self, event: Event) -> Effect {
        let before = self.phase;
        let effect = match event {
            Event::ImageChanged { slot, image } => {
                self.set_image(slot, image);
                Effect::None
            }
            Event::PresetSelected(preset) => {
                self.select_preset(preset);
                Effect::None
            }
            Event::Merge => self.begin_merge(),
            Event::Cancel => {
                self.cancel();
                Effect::None
            }
            Event::MergeFinished { ticket, outcome } => {
                self.finish(ticket, outcome);
                Effect::None
            }
            Event::StartOver => {
                self.start_over();
                Effect::None
            }
        };
        if before != self.phase {
            tracing::debug!(from = %before, to = %self.phase, ticket = %self.ticket, "session transition");
        }
        effect
    }

    /// Decode the merged photo for download. No state change.
    ///
    /// Returns `Ok(None)` unless the session is [`Phase::Succeeded`].
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] if the stored image cannot be decoded.
    pub fn download(&self) -> Result<Option<DownloadArtifact>, ArtifactError> {
        match (&self.phase, &self.merged_image) {
            (Phase::Succeeded, Some(image)) => DownloadArtifact::from_base64(image).map(Some),
            _ => Ok(None),
        }
    }

    fn set_image(&mut self, slot: Slot, image: Option<UploadedImage>) {
        if self.phase != Phase::Setup {
            tracing::debug!(%slot, phase = %self.phase, "image change ignored outside setup");
            return;
        }
        self.images.set(slot, image);
    }

    fn select_preset(&mut self, preset: PresetId) {
        if self.phase != Phase::Setup {
            tracing::debug!(%preset, phase = %self.phase, "preset change ignored outside setup");
            return;
        }
        self.preset = preset;
    }

    fn begin_merge(&mut self) -> Effect {
        if self.phase != Phase::Setup {
            tracing::debug!(phase = %self.phase, "merge ignored, not in setup");
            return Effect::None;
        }
        let Some((first, second)) = self.images.both() else {
            self.error = Some(VALIDATION_MESSAGE.to_owned());
            return Effect::None;
        };
        let request = MergeRequest {
            ticket: self.ticket.next(),
            first: first.clone(),
            second: second.clone(),
            instruction: self.preset.instruction().to_owned(),
        };

        self.ticket = request.ticket;
        self.error = None;
        self.merged_image = None;
        self.cancelled = false;
        self.phase = Phase::Requesting;
        Effect::StartMerge(request)
    }

    fn cancel(&mut self) {
        if self.phase != Phase::Requesting {
            return;
        }
        self.cancelled = true;
        self.phase = Phase::Setup;
    }

    fn finish(&mut self, ticket: Ticket, outcome: Result<String, MergeError>) {
        if self.cancelled || self.phase != Phase::Requesting || ticket != self.ticket {
            tracing::debug!(
                %ticket,
                current = %self.ticket,
                cancelled = self.cancelled,
                "discarding stale merge result"
            );
            return;
        }
        match outcome {
            Ok(image) => {
                self.merged_image = Some(image);
                self.error = None;
                self.phase = Phase::Succeeded;
            }
            Err(e) => {
                self.error = Some(e.user_message());
                self.merged_image = None;
                self.phase = Phase::Failed;
            }
        }
    }

    fn start_over(&mut self) {
        let was_requesting = self.phase == Phase::Requesting;
        *self = Self {
            cancelled: was_requesting,
            ticket: self.ticket,
            upload_epoch: self.upload_epoch.wrapping_add(1),
            ..Self::new()
        };
    }
}
