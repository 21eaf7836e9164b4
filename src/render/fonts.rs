//! Font loading for the raster canvas.
//!
//! Fonts come from the config when set; otherwise a short list of common
//! system locations is searched. Rendering can proceed without any font, in
//! which case text is skipped.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::FontConfig;
use crate::error::{Result, SheetshotError};

/// Regular-weight candidates, most preferred first.
const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Bold candidates, in the same family order as [`REGULAR_CANDIDATES`].
const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// The faces used to draw cell text.
pub struct FontBook {
    regular: FontVec,
    bold: Option<FontVec>,
    source: PathBuf,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("source", &self.source)
            .field("has_bold", &self.bold.is_some())
            .finish()
    }
}

impl FontBook {
    /// Build a font book from in-memory font data.
    ///
    /// # Errors
    /// Returns [`SheetshotError::Font`] if either face cannot be parsed.
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<Self> {
        let regular = parse_font(regular, "regular")?;
        let bold = bold.map(|b| parse_font(b, "bold")).transpose()?;
        Ok(Self {
            regular,
            bold,
            source: PathBuf::from("<memory>"),
        })
    }

    /// Load the configured fonts, or discover system fonts.
    ///
    /// Returns `Ok(None)` when nothing is configured and no system font is
    /// found.
    ///
    /// # Errors
    /// A font that was explicitly configured but cannot be read or parsed is
    /// an error.
    pub fn load(config: &FontConfig) -> Result<Option<Self>> {
        let (regular_path, family_index) = match &config.regular {
            Some(path) => (path.clone(), None),
            None => match discover(REGULAR_CANDIDATES) {
                Some((path, idx)) => (path, Some(idx)),
                None => return Ok(None),
            },
        };
        let regular = read_font(&regular_path)?;

        let bold = match &config.bold {
            Some(path) => Some(read_font(path)?),
            None => family_index
                .and_then(|idx| BOLD_CANDIDATES.get(idx))
                .map(Path::new)
                .filter(|p| p.exists())
                .and_then(|p| read_font(p).ok()),
        };

        tracing::debug!(
            regular = %regular_path.display(),
            bold = bold.is_some(),
            "loaded fonts"
        );

        Ok(Some(Self {
            regular,
            bold,
            source: regular_path,
        }))
    }

    /// Face for the requested weight, and whether it is a true bold face.
    pub fn face(&self, bold: bool) -> (&FontVec, bool) {
        match (&self.bold, bold) {
            (Some(face), true) => (face, true),
            _ => (&self.regular, false),
        }
    }

    /// Advance width of a single line of text in pixels.
    pub fn line_width(&self, text: &str, px: f32, bold: bool) -> f32 {
        let (font, _) = self.face(bold);
        let scaled = font.as_scaled(PxScale::from(px));
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }
}

fn discover(candidates: &[&str]) -> Option<(PathBuf, usize)> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, p)| (PathBuf::from(p), i))
        .find(|(p, _)| p.exists())
}

fn read_font(path: &Path) -> Result<FontVec> {
    let data = fs::read(path)
        .map_err(|e| SheetshotError::Font(format!("{}: {e}", path.display())))?;
    parse_font(data, &path.display().to_string())
}

fn parse_font(data: Vec<u8>, name: &str) -> Result<FontVec> {
    FontVec::try_from_vec(data)
        .map_err(|e| SheetshotError::Font(format!("invalid font data for {name}: {e}")))
}
