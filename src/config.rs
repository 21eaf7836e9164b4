//! Render configuration.
//!
//! Loaded from JSON; every field is optional and falls back to the values
//! the snapshot layout was tuned with.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SheetshotError};

/// Top-level render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output resolution, pixels per inch. One width unit is one inch.
    pub dpi: f64,
    /// Height of one grid row, in inches.
    pub row_height: f64,
    /// Minimum height of the grid area, in inches.
    pub min_height: f64,
    pub heuristics: Heuristics,
    pub fonts: FontConfig,
    pub attribution: Attribution,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 300.0,
            row_height: 0.42,
            min_height: 1.0,
            heuristics: Heuristics::default(),
            fonts: FontConfig::default(),
            attribution: Attribution::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a config from a JSON string.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check that sizes are positive and finite.
    ///
    /// # Errors
    /// Returns [`SheetshotError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("dpi", self.dpi),
            ("row_height", self.row_height),
            ("min_height", self.min_height),
            ("heuristics.min_col_width", self.heuristics.min_col_width),
            ("heuristics.wrap_chars_per_unit", self.heuristics.wrap_chars_per_unit),
            ("heuristics.min_font_size", self.heuristics.min_font_size),
            ("attribution.font_size", self.attribution.font_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SheetshotError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.heuristics.max_font_size < self.heuristics.min_font_size {
            return Err(SheetshotError::Config(
                "heuristics.max_font_size is below min_font_size".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.attribution.opacity) {
            return Err(SheetshotError::Config(
                "attribution.opacity must be within 0..=1".to_string(),
            ));
        }
        Ok(())
    }

    /// Pixels per point at the configured resolution.
    pub fn px_per_point(&self) -> f64 {
        self.dpi / 72.0
    }
}

/// Empirically tuned sizing constants.
///
/// These are tunable parameters, not invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Column width per character of the longest value.
    pub width_per_char: f64,
    /// Narrowest column width.
    pub min_col_width: f64,
    /// Characters per width unit when wrapping.
    pub wrap_chars_per_unit: f64,
    /// Multiplier applied to an explicit source font size.
    pub explicit_size_scale: f64,
    /// Base for derived font size in merged cells.
    pub merged_size_base: f64,
    /// Base for derived font size in ordinary cells.
    pub plain_size_base: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Channel multiplier applied to the font color.
    pub text_darken: f64,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            width_per_char: 0.15,
            min_col_width: 1.6,
            wrap_chars_per_unit: 6.0,
            explicit_size_scale: 0.9,
            merged_size_base: 16.0,
            plain_size_base: 14.0,
            min_font_size: 10.0,
            max_font_size: 18.0,
            text_darken: 0.89,
        }
    }
}

/// Font files to use; `None` means search the usual system locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

/// Attribution label drawn in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribution {
    pub owner: String,
    /// Label text; `{owner}` is replaced with the owner name.
    pub template: String,
    /// Label size in points.
    pub font_size: f64,
    pub opacity: f32,
    pub enabled: bool,
}

impl Default for Attribution {
    fn default() -> Self {
        Self {
            owner: "sheetshot".to_string(),
            template: "Snapshot Generated by {owner}".to_string(),
            font_size: 9.0,
            opacity: 0.7,
            enabled: true,
        }
    }
}

impl Attribution {
    /// Label text with the owner substituted.
    pub fn label(&self) -> String {
        self.template.replace("{owner}", &self.owner)
    }

    /// Assert that the configured owner is `expected`.
    ///
    /// Nothing calls this implicitly; hosts that want the check run it
    /// when they build their config.
    ///
    /// # Errors
    /// Returns [`SheetshotError::Attribution`] on mismatch.
    pub fn verify(&self, expected: &str) -> Result<()> {
        if self.owner == expected {
            Ok(())
        } else {
            Err(SheetshotError::Attribution {
                expected: expected.to_string(),
                found: self.owner.clone(),
            })
        }
    }
}
