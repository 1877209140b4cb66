use std::{
    fmt::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use brandkit_types::{generate_ramp, ColorRole, HexColor, ShadeStep, ThemeSettings};
use dashmap::DashMap;

/// Ramp names, as they appear in `--color-{name}-{step}`
pub const BRAND: &str = "brand";
pub const THEME_PINK: &str = "theme-pink";
pub const SUCCESS: &str = "success";
pub const ERROR: &str = "error";
pub const WARNING: &str = "warning";

/// Something that can hold live named style variables, e.g. a document root
pub trait StyleSink: Send + Sync {
    fn set_property(&self, name: &str, value: &str);

    fn set_dark(&self, dark: bool);
}

pub fn property_name(ramp: &str, step: ShadeStep) -> String {
    format!("--color-{ramp}-{}", step.weight())
}

/// Writes the base colors and the derived brand ramps to the sink.
///
/// Step 500 of every ramp is the base exactly as stored. Shorthand bases are
/// expanded only to derive the other steps.
pub fn apply_settings(sink: &dyn StyleSink, settings: &ThemeSettings) {
    let bases = [
        (BRAND, ColorRole::Primary),
        (THEME_PINK, ColorRole::Secondary),
        (SUCCESS, ColorRole::Success),
        (ERROR, ColorRole::Error),
        (WARNING, ColorRole::Warning),
    ];

    for (ramp, role) in bases {
        sink.set_property(
            &property_name(ramp, ShadeStep::S500),
            settings.color(role).as_str(),
        );
    }

    for (ramp, base) in [
        (BRAND, &settings.primary_color),
        (THEME_PINK, &settings.secondary_color),
    ] {
        apply_ramp(sink, ramp, base);
    }
}

fn apply_ramp(sink: &dyn StyleSink, ramp: &str, base: &HexColor) {
    let ramp_shades = generate_ramp(base.to_long_form().as_str());
    for (step, shade) in ramp_shades.iter().filter(|(step, _)| *step != ShadeStep::S500) {
        sink.set_property(&property_name(ramp, step), shade);
    }
}

/// An in-memory sink that renders as a CSS block.
///
/// Clones share the same variables.
#[derive(Clone, Default)]
pub struct StyleSheet {
    properties: Arc<DashMap<String, String>>,
    dark: Arc<AtomicBool>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.properties.get(name).map(|value| value.clone())
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Variables are sorted by name so the output is stable
    pub fn render(&self) -> String {
        let mut properties: Vec<(String, String)> = self
            .properties
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        properties.sort();

        let scheme = if self.is_dark() { "dark" } else { "light" };

        let mut css = String::from(":root {\n");
        let _ = writeln!(css, "  color-scheme: {scheme};");
        for (name, value) in properties {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }
}

impl StyleSink for StyleSheet {
    fn set_property(&self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    fn set_dark(&self, dark: bool) {
        self.dark.store(dark, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn applies_bases_and_ramps() {
        let sheet = StyleSheet::new();
        apply_settings(&sheet, &ThemeSettings::default());

        assert_eq!(sheet.get("--color-brand-500").as_deref(), Some("#465fff"));
        assert_eq!(
            sheet.get("--color-theme-pink-500").as_deref(),
            Some("#ee46bc")
        );
        assert_eq!(sheet.get("--color-success-500").as_deref(), Some("#12b76a"));
        assert_eq!(sheet.get("--color-error-500").as_deref(), Some("#f04438"));
        assert_eq!(sheet.get("--color-warning-500").as_deref(), Some("#f79009"));
        assert_eq!(sheet.get("--color-brand-25").as_deref(), Some("#ffffff"));
        assert_eq!(sheet.get("--color-brand-950").as_deref(), Some("#00007f"));

        // two full ramps plus the three single base colors
        assert_eq!(sheet.len(), ShadeStep::ALL.len() * 2 + 3);

        // tertiary has no style variable
        assert!(sheet.render().find("#91ff47").is_none());
    }

    #[test]
    fn shorthand_base_keeps_its_form_and_gets_a_full_ramp() {
        let mut settings = ThemeSettings::default();
        settings.set_color(ColorRole::Primary, HexColor::new("#abc").unwrap());

        let sheet = StyleSheet::new();
        apply_settings(&sheet, &settings);

        assert_eq!(sheet.get("--color-brand-500").as_deref(), Some("#abc"));
        assert!(sheet.get("--color-brand-25").is_some());
        assert!(sheet.get("--color-brand-950").is_some());
        assert_eq!(sheet.len(), ShadeStep::ALL.len() * 2 + 3);
    }

    #[test]
    fn render_is_sorted_and_marks_the_scheme() {
        let sheet = StyleSheet::new();
        sheet.set_property("--b", "2");
        sheet.set_property("--a", "1");
        sheet.set_dark(true);

        assert_eq!(
            sheet.render(),
            ":root {\n  color-scheme: dark;\n  --a: 1;\n  --b: 2;\n}\n"
        );

        let shared = sheet.clone();
        shared.set_dark(false);
        assert!(!sheet.is_dark());
    }
}
