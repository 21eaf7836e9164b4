//! Color utilities for snapshot rendering.
//!
//! Colors arrive from the data source as normalized 0-1 channel triples and
//! are carried through the pipeline as 8-bit [`Rgb`] values.

/// Common colors used when a format field is missing.
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    /// Attribution label color.
    pub const LABEL_GRAY: Rgb = Rgb::new(0x40, 0x40, 0x40);
}

/// RGB color with u8 components for efficient color manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert normalized 0-1 channels to 8-bit by scaling and truncating.
    ///
    /// `0.5` maps to `127`, not `128`.
    pub fn from_unit(red: f64, green: f64, blue: f64) -> Self {
        Self {
            r: unit_to_u8(red),
            g: unit_to_u8(green),
            b: unit_to_u8(blue),
        }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Darken by multiplying every channel by `factor` and truncating.
    ///
    /// A factor below 1 darkens; black stays black.
    pub fn darken(self, factor: f64) -> Self {
        Self {
            r: Self::scale_component(self.r, factor),
            g: Self::scale_component(self.g, factor),
            b: Self::scale_component(self.b, factor),
        }
    }

    /// Convert to an `image` pixel with the given opacity (0.0 - 1.0).
    pub fn to_rgba(self, opacity: f32) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, unit_to_u8(f64::from(opacity))])
    }

    /// The cast is safe because we clamp to [0, 255] before converting.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn scale_component(value: u8, factor: f64) -> u8 {
        (f64::from(value) * factor).clamp(0.0, 255.0).floor() as u8
    }
}

impl Default for Rgb {
    fn default() -> Self {
        palette::BLACK
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Rgb::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(channel: f64) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0).floor() as u8
}
