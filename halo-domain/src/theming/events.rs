use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a theme pass stopped before calling the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    Disabled,
    ExtractorUnavailable,
    NoWallpaper,
    WallpaperUnusable(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ThemePipelineEvent {
    PassSkipped { reason: SkipReason },
    PassFailed { wallpaper: PathBuf, message: String },
    ThemeApplied { wallpaper: PathBuf },
}
