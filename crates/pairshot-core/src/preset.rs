//! Background presets offered on the setup page.
//!
//! Each [`PresetId`] names one studio backdrop. The preset's
//! [`instruction`](PresetId::instruction) is the free text handed to the
//! image generation service; the name and swatch are display-only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for one of the fixed background presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetId {
    /// Minimalist gray studio wall.
    #[default]
    Gray,
    /// Warm beige backdrop with soft lighting.
    Beige,
    /// Soft pastel blue background.
    Pastel,
    /// Brick wall of an industrial loft.
    Industrial,
}

impl PresetId {
    /// All presets in display order. The first one is the default.
    pub const ALL: [Self; 4] = [Self::Gray, Self::Beige, Self::Pastel, Self::Industrial];

    /// Stable identifier string.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Beige => "beige",
            Self::Pastel => "pastel",
            Self::Industrial => "industrial",
        }
    }

    /// Display name shown under the swatch.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gray => "Minimalist Gray",
            Self::Beige => "Warm Beige",
            Self::Pastel => "Pastel Blue",
            Self::Industrial => "Industrial Loft",
        }
    }

    /// Backdrop description sent to the generation service.
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Gray => "clean, aesthetic, minimalist gray studio-style wall",
            Self::Beige => "warm, cozy, beige-colored studio backdrop with soft lighting",
            Self::Pastel => "soft, pastel blue studio background",
            Self::Industrial => "textured brick wall of an industrial loft studio",
        }
    }

    /// CSS color for the preview swatch.
    #[must_use]
    pub const fn swatch(self) -> &'static str {
        match self {
            Self::Gray => "#cbd5e1",
            Self::Beige => "#fde68a",
            Self::Pastel => "#bae6fd",
            Self::Industrial => "#a8a29e",
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
