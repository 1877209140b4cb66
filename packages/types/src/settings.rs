use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use crate::color::HexColor;

/// The semantic purpose of a brand color, independent of its value
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum ColorRole {
    #[serde(rename = "primaryColor")]
    Primary,
    #[serde(rename = "secondaryColor")]
    Secondary,
    #[serde(rename = "tertiaryColor")]
    Tertiary,
    #[serde(rename = "successColor")]
    Success,
    #[serde(rename = "errorColor")]
    Error,
    #[serde(rename = "warningColor")]
    Warning,
}

impl ColorRole {
    pub const ALL: [ColorRole; 6] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Tertiary,
        ColorRole::Success,
        ColorRole::Error,
        ColorRole::Warning,
    ];

    /// The field name used on the wire and in the local cache
    pub const fn key(self) -> &'static str {
        match self {
            ColorRole::Primary => "primaryColor",
            ColorRole::Secondary => "secondaryColor",
            ColorRole::Tertiary => "tertiaryColor",
            ColorRole::Success => "successColor",
            ColorRole::Error => "errorColor",
            ColorRole::Warning => "warningColor",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary color",
            ColorRole::Secondary => "secondary color",
            ColorRole::Tertiary => "tertiary color",
            ColorRole::Success => "success color",
            ColorRole::Error => "error color",
            ColorRole::Warning => "warning color",
        }
    }

    pub const fn default_color(self) -> &'static str {
        match self {
            ColorRole::Primary => "#465fff",
            ColorRole::Secondary => "#ee46bc",
            ColorRole::Tertiary => "#91ff47",
            ColorRole::Success => "#12b76a",
            ColorRole::Error => "#f04438",
            ColorRole::Warning => "#f79009",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }
}

impl std::fmt::Display for ColorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = ThemeValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(ThemeValidationError::InvalidMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ThemeValidationError {
    #[error("Invalid {} format", .0.label())]
    InvalidColor(ColorRole),
    #[error("Unknown theme field: {0}")]
    UnknownField(String),
    #[error("Invalid expectedVersion, must be a non-negative integer")]
    InvalidVersion,
    #[error("Theme update must be a JSON object")]
    NotAnObject,
    #[error("Invalid theme mode `{0}`, expected light or dark")]
    InvalidMode(String),
}

/// The canonical brand color settings.
///
/// Missing fields deserialize to their defaults, so a stale or partial
/// payload is always merged over the documented defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub tertiary_color: HexColor,
    pub success_color: HexColor,
    pub error_color: HexColor,
    pub warning_color: HexColor,
    /// Stamped by the store on every accepted update
    pub updated_at: DateTime<Utc>,
    /// Incremented by the store on every accepted update
    pub version: u64,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        let color = |role: ColorRole| HexColor(role.default_color().to_string());

        Self {
            primary_color: color(ColorRole::Primary),
            secondary_color: color(ColorRole::Secondary),
            tertiary_color: color(ColorRole::Tertiary),
            success_color: color(ColorRole::Success),
            error_color: color(ColorRole::Error),
            warning_color: color(ColorRole::Warning),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            version: 0,
        }
    }
}

impl ThemeSettings {
    pub fn color(&self, role: ColorRole) -> &HexColor {
        match role {
            ColorRole::Primary => &self.primary_color,
            ColorRole::Secondary => &self.secondary_color,
            ColorRole::Tertiary => &self.tertiary_color,
            ColorRole::Success => &self.success_color,
            ColorRole::Error => &self.error_color,
            ColorRole::Warning => &self.warning_color,
        }
    }

    pub fn set_color(&mut self, role: ColorRole, color: HexColor) {
        let slot = match role {
            ColorRole::Primary => &mut self.primary_color,
            ColorRole::Secondary => &mut self.secondary_color,
            ColorRole::Tertiary => &mut self.tertiary_color,
            ColorRole::Success => &mut self.success_color,
            ColorRole::Error => &mut self.error_color,
            ColorRole::Warning => &mut self.warning_color,
        };
        *slot = color;
    }

    pub fn colors(&self) -> impl Iterator<Item = (ColorRole, &HexColor)> {
        ColorRole::ALL.into_iter().map(|role| (role, self.color(role)))
    }

    /// Overwrites every color present in the update, leaving the rest and the
    /// bookkeeping fields alone
    pub fn merge_colors(&mut self, update: &ThemeUpdate) {
        for (role, color) in update.colors() {
            self.set_color(role, color.clone());
        }
    }

    /// Records an accepted update: bumps the version and stamps a time that is
    /// strictly later than the previous one, even if the clock did not advance
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
        self.version += 1;
    }
}

/// A partial set of colors to merge into [`ThemeSettings`].
///
/// Deserializing validates every field against the settings schema: each key
/// must be a known color role holding a hex color. `updatedAt` and `version`
/// are owned by the store and ignored when sent back by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct ThemeUpdate {
    #[serde(flatten)]
    colors: BTreeMap<ColorRole, HexColor>,
    /// When set, the store only accepts the update if its current version matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl ThemeUpdate {
    const EXPECTED_VERSION_KEY: &'static str = "expectedVersion";
    const IGNORED_KEYS: [&'static str; 2] = ["updatedAt", "version"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, role: ColorRole, color: HexColor) -> Self {
        self.colors.insert(role, color);
        self
    }

    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn set_color(&mut self, role: ColorRole, color: HexColor) {
        self.colors.insert(role, color);
    }

    pub fn color(&self, role: ColorRole) -> Option<&HexColor> {
        self.colors.get(&role)
    }

    pub fn colors(&self) -> impl Iterator<Item = (ColorRole, &HexColor)> {
        self.colors.iter().map(|(role, color)| (*role, color))
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Validates a raw JSON payload against the settings schema
    pub fn from_json(value: Value) -> Result<Self, ThemeValidationError> {
        let Value::Object(mut fields) = value else {
            return Err(ThemeValidationError::NotAnObject);
        };

        let mut update = ThemeUpdate::new();

        for role in ColorRole::ALL {
            if let Some(value) = fields.remove(role.key()) {
                let color = value
                    .as_str()
                    .and_then(|s| HexColor::new(s).ok())
                    .ok_or(ThemeValidationError::InvalidColor(role))?;
                update.colors.insert(role, color);
            }
        }

        if let Some(value) = fields.remove(Self::EXPECTED_VERSION_KEY) {
            update.expected_version = match value {
                Value::Null => None,
                value => Some(value.as_u64().ok_or(ThemeValidationError::InvalidVersion)?),
            };
        }

        for key in Self::IGNORED_KEYS {
            fields.remove(key);
        }

        match fields.into_iter().next() {
            Some((key, _)) => Err(ThemeValidationError::UnknownField(key)),
            None => Ok(update),
        }
    }
}

impl TryFrom<Value> for ThemeUpdate {
    type Error = ThemeValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

/// The full object, as sent by clients that persist everything they hold
impl From<&ThemeSettings> for ThemeUpdate {
    fn from(settings: &ThemeSettings) -> Self {
        Self {
            colors: settings
                .colors()
                .map(|(role, color)| (role, color.clone()))
                .collect(),
            expected_version: None,
        }
    }
}
