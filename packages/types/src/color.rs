use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ColorError {
    #[error("invalid hex color `{0}`, expected #rgb or #rrggbb")]
    Format(String),
}

type ColorResult<T> = Result<T, ColorError>;

// the pattern accepted at the settings boundary
static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

// the stricter pattern the shade math works on, shorthand is not accepted
static LONG_HEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})$").unwrap()
});

/// A validated CSS hex color, either `#rgb` or `#rrggbb`.
///
/// The original casing is preserved, so a color always round-trips through
/// the store byte-for-byte.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct HexColor(pub(crate) String);

impl HexColor {
    /// Validates without taking ownership
    pub fn validate(s: impl AsRef<str>) -> ColorResult<()> {
        let s = s.as_ref();
        if HEX_COLOR_REGEX.is_match(s) {
            Ok(())
        } else {
            Err(ColorError::Format(s.to_string()))
        }
    }

    pub fn new(s: impl Into<String>) -> ColorResult<Self> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_shorthand(&self) -> bool {
        self.0.len() == 4
    }

    /// Expands `#abc` into `#aabbcc`, leaving long colors untouched
    pub fn to_long_form(&self) -> HexColor {
        if !self.is_shorthand() {
            return self.clone();
        }

        let mut long = String::with_capacity(7);
        long.push('#');
        for c in self.0.chars().skip(1) {
            long.push(c);
            long.push(c);
        }
        HexColor(long)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for HexColor {
    type Error = ColorError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 8-bit red/green/blue channels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `rrggbb` with an optional leading `#`.
    /// Shorthand colors are rejected, expand them first with [`HexColor::to_long_form`]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let captures = LONG_HEX_REGEX.captures(hex)?;
        let channel = |i: usize| u8::from_str_radix(&captures[i], 16).ok();

        Some(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Adds `round(255 * amount)` to every channel, saturating at 255
    pub fn lighten(self, amount: f64) -> Self {
        let delta = channel_delta(amount);
        self.map(|c| c.saturating_add(delta))
    }

    /// Subtracts `round(255 * amount)` from every channel, saturating at 0
    pub fn darken(self, amount: f64) -> Self {
        let delta = channel_delta(amount);
        self.map(|c| c.saturating_sub(delta))
    }

    fn map(self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }
}

// f64::round is half-away-from-zero, which equals half-up for the positive amounts used here
fn channel_delta(amount: f64) -> u8 {
    (255.0 * amount.clamp(0.0, 1.0)).round() as u8
}

/// Parse a hex color into channels, `None` if it is not a 6-digit color
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    Rgb::from_hex(hex)
}

/// Recompose channels into a lowercase, zero-padded `#rrggbb`
pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_hex()
}
