use serde::Deserialize;

use crate::api::error::VarnaError;
use crate::core::dna::DEFAULT_LABEL;
use crate::systems::sampler::GlyphStyle;

/// Configuration for the field, provided by the host at init.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Particles per pool (default: 3200).
    pub particle_count: usize,
    /// Fixed physics step in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Label shown when the input text is empty.
    pub default_label: String,
    /// CSS font family used to rasterize labels.
    pub font_family: String,
    /// CSS font weight used to rasterize labels.
    pub font_weight: u16,
    /// Hold glyph sampling until the host signals that fonts have loaded.
    pub wait_for_fonts: bool,
    /// Seed for the particle RNG. The web bridge picks one when absent.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 3200,
            fixed_dt: 1.0 / 60.0,
            default_label: DEFAULT_LABEL.to_string(),
            font_family: "serif".to_string(),
            font_weight: 900,
            wait_for_fonts: true,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Parse a (possibly partial) JSON config; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, VarnaError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace values the engine cannot run with.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.particle_count = self.particle_count.max(1);
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            self.fixed_dt = defaults.fixed_dt;
        }
        if self.default_label.trim().is_empty() {
            self.default_label = defaults.default_label;
        }
        if self.font_family.trim().is_empty() {
            self.font_family = defaults.font_family;
        }
        self
    }

    /// The label actually rendered for `text`: blank input falls back to the default label.
    pub fn resolve_label<'a>(&'a self, text: &'a str) -> &'a str {
        if text.trim().is_empty() {
            &self.default_label
        } else {
            text
        }
    }

    pub fn glyph_style(&self) -> GlyphStyle {
        GlyphStyle {
            family: self.font_family.clone(),
            weight: self.font_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = FieldConfig::from_json(r#"{ "particleCount": 500, "seed": 9 }"#).unwrap();
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.font_weight, 900);
        assert!(config.wait_for_fonts);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = FieldConfig::from_json("{ particleCount: ").unwrap_err();
        assert!(matches!(err, VarnaError::InvalidConfig(_)));
    }

    #[test]
    fn sanitize_repairs_unusable_values() {
        let config = FieldConfig::from_json(
            r#"{ "particleCount": 0, "fixedDt": -1.0, "defaultLabel": "  " }"#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 1);
        assert_eq!(config.fixed_dt, 1.0 / 60.0);
        assert_eq!(config.default_label, DEFAULT_LABEL);
    }

    #[test]
    fn blank_text_resolves_to_default_label() {
        let config = FieldConfig::default();
        assert_eq!(config.resolve_label(""), DEFAULT_LABEL);
        assert_eq!(config.resolve_label(" \t"), DEFAULT_LABEL);
        assert_eq!(config.resolve_label("আলো"), "আলো");
    }

    #[test]
    fn glyph_style_mirrors_font_settings() {
        let config = FieldConfig {
            font_family: "Hind Siliguri".into(),
            font_weight: 700,
            ..FieldConfig::default()
        };
        let style = config.glyph_style();
        assert_eq!(style.family, "Hind Siliguri");
        assert_eq!(style.weight, 700);
    }
}
