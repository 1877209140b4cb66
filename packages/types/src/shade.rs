use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// One step of a tint/shade ramp, named after its Tailwind-style weight
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum ShadeStep {
    S25,
    S50,
    S100,
    S200,
    S300,
    S400,
    S500,
    S600,
    S700,
    S800,
    S900,
    S950,
}

/// How a step is derived from the base color
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShadeAdjust {
    Lighten(f64),
    Base,
    Darken(f64),
}

impl ShadeStep {
    pub const ALL: [ShadeStep; 12] = [
        ShadeStep::S25,
        ShadeStep::S50,
        ShadeStep::S100,
        ShadeStep::S200,
        ShadeStep::S300,
        ShadeStep::S400,
        ShadeStep::S500,
        ShadeStep::S600,
        ShadeStep::S700,
        ShadeStep::S800,
        ShadeStep::S900,
        ShadeStep::S950,
    ];

    pub const fn weight(self) -> u16 {
        match self {
            ShadeStep::S25 => 25,
            ShadeStep::S50 => 50,
            ShadeStep::S100 => 100,
            ShadeStep::S200 => 200,
            ShadeStep::S300 => 300,
            ShadeStep::S400 => 400,
            ShadeStep::S500 => 500,
            ShadeStep::S600 => 600,
            ShadeStep::S700 => 700,
            ShadeStep::S800 => 800,
            ShadeStep::S900 => 900,
            ShadeStep::S950 => 950,
        }
    }

    pub fn from_weight(weight: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.weight() == weight)
    }

    /// Fixed lookup table, the amounts are intentionally not linear in the weight
    pub const fn adjust(self) -> ShadeAdjust {
        match self {
            ShadeStep::S25 => ShadeAdjust::Lighten(0.9),
            ShadeStep::S50 => ShadeAdjust::Lighten(0.8),
            ShadeStep::S100 => ShadeAdjust::Lighten(0.6),
            ShadeStep::S200 => ShadeAdjust::Lighten(0.4),
            ShadeStep::S300 => ShadeAdjust::Lighten(0.2),
            ShadeStep::S400 => ShadeAdjust::Lighten(0.1),
            ShadeStep::S500 => ShadeAdjust::Base,
            ShadeStep::S600 => ShadeAdjust::Darken(0.1),
            ShadeStep::S700 => ShadeAdjust::Darken(0.2),
            ShadeStep::S800 => ShadeAdjust::Darken(0.3),
            ShadeStep::S900 => ShadeAdjust::Darken(0.4),
            ShadeStep::S950 => ShadeAdjust::Darken(0.5),
        }
    }
}

impl From<ShadeStep> for u16 {
    fn from(step: ShadeStep) -> Self {
        step.weight()
    }
}

impl TryFrom<u16> for ShadeStep {
    type Error = String;

    fn try_from(weight: u16) -> Result<Self, Self::Error> {
        ShadeStep::from_weight(weight).ok_or_else(|| format!("unknown shade step {weight}"))
    }
}

impl std::fmt::Display for ShadeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.weight())
    }
}

/// Colors derived from a single base, ordered from lightest to darkest.
/// An empty ramp means the base could not be shaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShadeRamp(BTreeMap<ShadeStep, String>);

impl ShadeRamp {
    pub fn get(&self, step: ShadeStep) -> Option<&str> {
        self.0.get(&step).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShadeStep, &str)> {
        self.0.iter().map(|(step, color)| (*step, color.as_str()))
    }
}

/// Derives the full ramp from a 6-digit base color (`#` optional).
///
/// Step 500 is the input string unchanged. Anything else, including `#rgb`
/// shorthand, produces an empty ramp rather than an error.
pub fn generate_ramp(base: &str) -> ShadeRamp {
    let Some(rgb) = Rgb::from_hex(base) else {
        return ShadeRamp::default();
    };

    ShadeRamp(
        ShadeStep::ALL
            .into_iter()
            .map(|step| {
                let color = match step.adjust() {
                    ShadeAdjust::Lighten(amount) => rgb.lighten(amount).to_hex(),
                    ShadeAdjust::Base => base.to_string(),
                    ShadeAdjust::Darken(amount) => rgb.darken(amount).to_hex(),
                };
                (step, color)
            })
            .collect(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::hex_to_rgb;

    #[test]
    fn ramp_for_default_primary() {
        let ramp = generate_ramp("#465fff");

        let expected = [
            (ShadeStep::S25, "#ffffff"),
            (ShadeStep::S50, "#ffffff"),
            (ShadeStep::S100, "#dff8ff"),
            (ShadeStep::S200, "#acc5ff"),
            (ShadeStep::S300, "#7992ff"),
            (ShadeStep::S400, "#6079ff"),
            (ShadeStep::S500, "#465fff"),
            (ShadeStep::S600, "#2c45e5"),
            (ShadeStep::S700, "#132ccc"),
            (ShadeStep::S800, "#0012b2"),
            (ShadeStep::S900, "#000099"),
            (ShadeStep::S950, "#00007f"),
        ];

        assert_eq!(ramp.len(), expected.len());
        for (step, color) in expected {
            assert_eq!(ramp.get(step), Some(color), "step {step}");
        }
    }

    #[test]
    fn base_step_is_verbatim() {
        for base in ["#465fff", "#EE46BC", "12b76a", "#000000", "#FFFFFF"] {
            assert_eq!(generate_ramp(base).get(ShadeStep::S500), Some(base));
        }
    }

    #[test]
    fn invalid_input_gives_empty_ramp() {
        for base in ["not-a-color", "", "#fff", "#12345", "#1234567", "#gggggg"] {
            assert!(generate_ramp(base).is_empty(), "{base}");
        }
    }

    #[test]
    fn ramp_is_deterministic() {
        assert_eq!(generate_ramp("#f79009"), generate_ramp("#f79009"));
    }

    #[test]
    fn steps_are_monotonic_per_channel() {
        for base in ["#465fff", "#ee46bc", "#91ff47", "#12b76a", "#f04438", "#808080"] {
            let rgb = hex_to_rgb(base).unwrap();
            let ramp = generate_ramp(base);

            for (step, color) in ramp.iter() {
                let shade = hex_to_rgb(color).unwrap();
                match step.adjust() {
                    ShadeAdjust::Lighten(_) => {
                        assert!(shade.r >= rgb.r && shade.g >= rgb.g && shade.b >= rgb.b)
                    }
                    ShadeAdjust::Darken(_) => {
                        assert!(shade.r <= rgb.r && shade.g <= rgb.g && shade.b <= rgb.b)
                    }
                    ShadeAdjust::Base => assert_eq!(shade, rgb),
                }
            }
        }
    }

    #[test]
    fn ramp_serializes_by_weight() {
        let json = serde_json::to_value(generate_ramp("#465fff")).unwrap();
        assert_eq!(json["500"], "#465fff");
        assert_eq!(json["950"], "#00007f");

        let back: ShadeRamp = serde_json::from_value(json).unwrap();
        assert_eq!(back, generate_ramp("#465fff"));
    }
}
