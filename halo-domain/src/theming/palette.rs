//! Extractor output and the colors derived from it.
//!
//! The extractor reports a Material palette per variant, roughly thirty
//! roles each. The shell consumes seven of them and spreads them over eight
//! theme slots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::ThemingError;
use crate::options::rows::is_hex_color;

/// Material role → hex color.
pub type Palette = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaletteVariants {
    pub light: Palette,
    pub dark: Palette,
}

/// Parsed stdout of the extractor: `{ "colors": { "light": {..}, "dark": {..} } }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractorOutput {
    pub colors: PaletteVariants,
}

impl ExtractorOutput {
    pub fn from_json(text: &str) -> Result<Self, ThemingError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn derive(&self) -> Result<ThemeVariants, ThemingError> {
        Ok(ThemeVariants {
            dark: DerivedThemeColors::from_palette("dark", &self.colors.dark)?,
            light: DerivedThemeColors::from_palette("light", &self.colors.light)?,
        })
    }
}

/// The eight theme slots, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeSlot {
    Widget,
    Border,
    Bg,
    Fg,
    PrimaryBg,
    PrimaryFg,
    ErrorBg,
    ErrorFg,
}

impl ThemeSlot {
    pub const APPLY_ORDER: [ThemeSlot; 8] = [
        ThemeSlot::Widget,
        ThemeSlot::Border,
        ThemeSlot::Bg,
        ThemeSlot::Fg,
        ThemeSlot::PrimaryBg,
        ThemeSlot::PrimaryFg,
        ThemeSlot::ErrorBg,
        ThemeSlot::ErrorFg,
    ];

    /// Option path below `theme.<variant>`.
    pub fn option_suffix(self) -> &'static str {
        match self {
            ThemeSlot::Widget => "widget",
            ThemeSlot::Border => "border",
            ThemeSlot::Bg => "bg",
            ThemeSlot::Fg => "fg",
            ThemeSlot::PrimaryBg => "primary.bg",
            ThemeSlot::PrimaryFg => "primary.fg",
            ThemeSlot::ErrorBg => "error.bg",
            ThemeSlot::ErrorFg => "error.fg",
        }
    }

    /// Material role the slot is derived from.
    pub fn source_role(self) -> &'static str {
        match self {
            ThemeSlot::Widget | ThemeSlot::Fg => "on_surface",
            ThemeSlot::Border => "outline",
            ThemeSlot::Bg => "surface",
            ThemeSlot::PrimaryBg => "primary",
            ThemeSlot::PrimaryFg => "on_primary",
            ThemeSlot::ErrorBg => "error",
            ThemeSlot::ErrorFg => "on_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedThemeColors {
    pub widget: String,
    pub border: String,
    pub bg: String,
    pub fg: String,
    pub primary_bg: String,
    pub primary_fg: String,
    pub error_bg: String,
    pub error_fg: String,
}

impl DerivedThemeColors {
    pub fn from_palette(variant: &str, palette: &Palette) -> Result<Self, ThemingError> {
        let role = |slot: ThemeSlot| -> Result<String, ThemingError> {
            let role = slot.source_role();
            let value = palette.get(role).ok_or_else(|| ThemingError::MissingRole {
                variant: variant.to_string(),
                role: role.to_string(),
            })?;
            if !is_hex_color(value) {
                return Err(ThemingError::InvalidColor {
                    variant: variant.to_string(),
                    role: role.to_string(),
                    value: value.clone(),
                });
            }
            Ok(value.clone())
        };
        Ok(Self {
            widget: role(ThemeSlot::Widget)?,
            border: role(ThemeSlot::Border)?,
            bg: role(ThemeSlot::Bg)?,
            fg: role(ThemeSlot::Fg)?,
            primary_bg: role(ThemeSlot::PrimaryBg)?,
            primary_fg: role(ThemeSlot::PrimaryFg)?,
            error_bg: role(ThemeSlot::ErrorBg)?,
            error_fg: role(ThemeSlot::ErrorFg)?,
        })
    }

    pub fn get(&self, slot: ThemeSlot) -> &str {
        match slot {
            ThemeSlot::Widget => &self.widget,
            ThemeSlot::Border => &self.border,
            ThemeSlot::Bg => &self.bg,
            ThemeSlot::Fg => &self.fg,
            ThemeSlot::PrimaryBg => &self.primary_bg,
            ThemeSlot::PrimaryFg => &self.primary_fg,
            ThemeSlot::ErrorBg => &self.error_bg,
            ThemeSlot::ErrorFg => &self.error_fg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeVariants {
    pub dark: DerivedThemeColors,
    pub light: DerivedThemeColors,
}
