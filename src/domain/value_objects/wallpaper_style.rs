use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// How the desktop should lay out an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperStyle {
    #[default]
    Fill,
    Fit,
    Span,
    Tile,
    Center,
    Stretch,
}

impl WallpaperStyle {
    pub const ALL: [WallpaperStyle; 6] = [
        Self::Fill,
        Self::Fit,
        Self::Span,
        Self::Tile,
        Self::Center,
        Self::Stretch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Fit => "fit",
            Self::Span => "span",
            Self::Tile => "tile",
            Self::Center => "center",
            Self::Stretch => "stretch",
        }
    }
}

impl std::fmt::Display for WallpaperStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WallpaperStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownWallpaperStyle(s.to_string()))
    }
}
