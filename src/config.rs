//! Field configuration.
//!
//! [`FieldConfig`] is built with chained `with_*` calls or loaded from JSON.
//! JSON keys use the camelCase names of the embedding props
//! (`particleCount`, `connectDistance`, ...); every key is optional.
//!
//! ```ignore
//! let config = FieldConfig::new()
//!     .with_particle_count(40)
//!     .with_connect_distance(100.0);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::{default_palette, Color};
use crate::error::{FieldError, Result};
use crate::interaction::InteractionField;
use crate::links::{LinkStrategy, LinkStyle};
use crate::physics::StepParams;

/// Configuration for one particle field.
///
/// `particle_count`, `colors` and `speed` are read when the particle set is
/// (re)built, so changes only show after the next resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Number of particles on the surface.
    pub particle_count: usize,
    /// Palette each particle picks its color from. Must not be empty.
    pub colors: Vec<Color>,
    /// Base velocity scale; spawn and re-seed velocities lie in `[-speed/2, speed/2]`.
    pub speed: f32,
    /// Particles closer than this are linked.
    pub connect_distance: f32,
    /// Per-tick velocity multiplier, in `(0, 1)`.
    pub damping: f32,
    /// Velocity components slower than this are re-seeded.
    pub min_speed: f32,
    /// Pointer repulsion.
    pub interaction: InteractionField,
    /// Link stroke.
    pub links: LinkStyle,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Clear color used by backends that own their whole surface.
    pub background: Color,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 80,
            colors: default_palette(),
            speed: 0.5,
            connect_distance: 120.0,
            damping: 0.99,
            min_speed: 0.1,
            interaction: InteractionField::default(),
            links: LinkStyle::default(),
            seed: None,
            background: Color::new(0.02, 0.02, 0.05),
        }
    }
}

impl FieldConfig {
    /// Default configuration: 80 particles, three colors, speed 0.5, links under 120 units.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_connect_distance(mut self, distance: f32) -> Self {
        self.connect_distance = distance;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_min_speed(mut self, min_speed: f32) -> Self {
        self.min_speed = min_speed;
        self
    }

    pub fn with_interaction(mut self, radius: f32, strength: f32) -> Self {
        self.interaction = InteractionField { radius, strength };
        self
    }

    pub fn with_link_style(mut self, links: LinkStyle) -> Self {
        self.links = links;
        self
    }

    pub fn with_link_strategy(mut self, strategy: LinkStrategy) -> Self {
        self.links.strategy = strategy;
        self
    }

    /// Fix the RNG seed for reproducible layouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Stepper parameters derived from this configuration.
    pub fn step_params(&self) -> StepParams {
        StepParams {
            speed: self.speed,
            damping: self.damping,
            min_speed: self.min_speed,
        }
    }

    /// Check every parameter. Called by the scheduler before the field starts.
    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() {
            return Err(FieldError::EmptyPalette);
        }
        positive("speed", self.speed)?;
        positive("connectDistance", self.connect_distance)?;
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(FieldError::InvalidParam(format!(
                "damping must be in (0, 1), got {}",
                self.damping
            )));
        }
        non_negative("minSpeed", self.min_speed)?;
        non_negative("interaction.radius", self.interaction.radius)?;
        non_negative("interaction.strength", self.interaction.strength)?;
        non_negative("links.opacity", self.links.opacity)?;
        positive("links.width", self.links.width)?;
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FieldError::InvalidParam(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FieldError::InvalidParam(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count, 80);
        assert_eq!(config.colors.len(), 3);
        assert_eq!(config.speed, 0.5);
        assert_eq!(config.connect_distance, 120.0);
        assert_eq!(config.interaction.radius, 150.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_palette_rejected() {
        let config = FieldConfig::new().with_colors([]);
        assert!(matches!(config.validate(), Err(FieldError::EmptyPalette)));
    }

    #[test]
    fn test_bad_numbers_rejected() {
        assert!(FieldConfig::new().with_speed(0.0).validate().is_err());
        assert!(FieldConfig::new().with_speed(f32::NAN).validate().is_err());
        assert!(FieldConfig::new().with_connect_distance(-1.0).validate().is_err());
        assert!(FieldConfig::new().with_damping(1.0).validate().is_err());
        assert!(FieldConfig::new().with_min_speed(-0.1).validate().is_err());
    }

    #[test]
    fn test_zero_particles_is_valid() {
        assert!(FieldConfig::new().with_particle_count(0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FieldConfig::from_json(
            r##"{ "particleCount": 40, "colors": ["#fff", "#06B6D4"], "seed": 7 }"##,
        )
        .unwrap();
        assert_eq!(config.particle_count, 40);
        assert_eq!(config.colors.len(), 2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.speed, 0.5);
        assert_eq!(config.links.opacity, 0.15);
    }

    #[test]
    fn test_json_bad_color() {
        let err = FieldConfig::from_json(r#"{ "colors": ["nope"] }"#).unwrap_err();
        assert!(matches!(err, FieldError::ConfigParse(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = FieldConfig::new().with_seed(3).with_particle_count(12);
        let json = config.to_json().unwrap();
        let back = FieldConfig::from_json(&json).unwrap();
        assert_eq!(back.particle_count, 12);
        assert_eq!(back.seed, Some(3));
        assert_eq!(back.colors.len(), config.colors.len());
    }
}
