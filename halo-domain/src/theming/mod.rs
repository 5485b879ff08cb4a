//! Automatic theming from the current wallpaper.

pub mod errors;
pub mod events;
pub mod extractor;
pub mod palette;
pub mod pipeline;

pub use errors::ThemingError;
pub use events::{SkipReason, ThemePipelineEvent};
pub use extractor::{ColorExtractor, MatugenExtractor};
pub use palette::{DerivedThemeColors, ExtractorOutput, Palette, ThemeSlot, ThemeVariants};
pub use pipeline::{PipelinePhase, PipelineSettings, ThemePipeline, ThemeTargets, AUTOTHEME_OPTION, WALLPAPER_OPTION};
