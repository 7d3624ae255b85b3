//! Core data types shared by the upload capture and the session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An image the user has uploaded, held in memory as base64 text.
///
/// Replaced wholesale on re-upload and dropped on removal; never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// File contents, standard base64 alphabet with padding.
    pub base64: String,
    /// Declared MIME type, always starting with `image/`.
    pub mime_type: String,
    /// Original filename as reported by the browser.
    pub name: String,
}

impl UploadedImage {
    /// A `data:` URL suitable for an `<img src>` preview.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// One of the two upload positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Left-hand uploader, "Person 1".
    First,
    /// Right-hand uploader, "Person 2".
    Second,
}

impl Slot {
    /// Both slots in display order.
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// Heading shown above the slot's uploader.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::First => "Person 1",
            Self::Second => "Person 2",
        }
    }

    /// Stable DOM id for the slot's file input.
    #[must_use]
    pub const fn input_id(self) -> &'static str {
        match self {
            Self::First => "uploader1",
            Self::Second => "uploader2",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Storage for one optional value per [`Slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots<T> {
    values: [Option<T>; 2],
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slots<T> {
    /// Both slots empty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [None, None],
        }
    }

    /// The value in `slot`, if any.
    #[must_use]
    pub const fn get(&self, slot: Slot) -> Option<&T> {
        self.values[slot.index()].as_ref()
    }

    /// Replace the value in `slot`, returning the previous one.
    pub fn set(&mut self, slot: Slot, value: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.values[slot.index()], value)
    }

    /// Both values, or `None` if either slot is empty.
    #[must_use]
    pub const fn both(&self) -> Option<(&T, &T)> {
        match (&self.values[0], &self.values[1]) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// Whether both slots hold a value.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.both().is_some()
    }
}

/// Which of the two pages is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Uploaders, preset picker, merge button.
    Setup,
    /// Spinner, error, or merged photo.
    Result,
}

/// Lifecycle phase of a [`GenerationSession`](crate::GenerationSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Collecting inputs. Initial phase and the target of cancel/reset.
    Setup,
    /// A merge request is in flight.
    Requesting,
    /// The merged photo is available.
    Succeeded,
    /// The merge failed; the error message is available.
    Failed,
}

impl Phase {
    /// The page this phase is rendered on.
    #[must_use]
    pub const fn page(self) -> Page {
        match self {
            Self::Setup => Page::Setup,
            Self::Requesting | Self::Succeeded | Self::Failed => Page::Result,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Requesting => "requesting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_embeds_mime_and_payload() {
        let image = UploadedImage {
            base64: "AAA".to_owned(),
            mime_type: "image/png".to_owned(),
            name: "a.png".to_owned(),
        };
        assert_eq!(image.data_url(), "data:image/png;base64,AAA");
    }

    #[test]
    fn slots_report_completeness() {
        let mut slots = Slots::new();
        assert!(!slots.is_complete());
        slots.set(Slot::First, Some(1));
        assert!(!slots.is_complete());
        assert_eq!(slots.set(Slot::Second, Some(2)), None);
        assert_eq!(slots.both(), Some((&1, &2)));
        assert_eq!(slots.set(Slot::First, None), Some(1));
        assert!(slots.both().is_none());
    }

    #[test]
    fn only_setup_phase_is_on_setup_page() {
        assert_eq!(Phase::Setup.page(), Page::Setup);
        for phase in [Phase::Requesting, Phase::Succeeded, Phase::Failed] {
            assert_eq!(phase.page(), Page::Result, "{phase} should be on the result page");
        }
    }

    #[test]
    fn slot_ids_are_distinct() {
        assert_ne!(Slot::First.input_id(), Slot::Second.input_id());
        assert_eq!(Slot::ALL.len(), 2);
    }
}
