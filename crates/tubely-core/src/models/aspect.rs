use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Coarse aspect-ratio bucket of a video.
///
/// Classification uses the integer quotient `width / height`: a quotient of 1 is
/// landscape, 0 is portrait, and anything else is `Other`. A 1000x100 video is
/// therefore `Other` and a 1200x1000 video is landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "other")]
    Other,
}

impl AspectRatio {
    /// Returns `None` when the dimensions cannot be classified (zero or negative height,
    /// negative width).
    pub fn from_dimensions(width: i64, height: i64) -> Option<Self> {
        if height <= 0 || width < 0 {
            return None;
        }
        Some(match width / height {
            1 => AspectRatio::Landscape,
            0 => AspectRatio::Portrait,
            _ => AspectRatio::Other,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Other => "other",
        }
    }

    /// Prefix of object keys holding videos in this bucket.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape_",
            AspectRatio::Portrait => "portrait_",
            AspectRatio::Other => "other_",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
