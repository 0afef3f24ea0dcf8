//! Pointer repulsion.
//!
//! Particles within `radius` of the pointer are pushed away with a force
//! that falls off linearly from `strength` at the pointer to zero at the
//! radius. The push is added to velocity, so damping bleeds it off again
//! over the following ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Last known pointer position in surface coordinates.
///
/// A plain `Copy` value: input producers replace it wholesale and the tick
/// reads it once, so a reader never sees half an update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub position: Vec2,
}

impl Pointer {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }
}

/// Repulsion around the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionField {
    /// Distance at which the push fades to zero.
    pub radius: f32,
    /// Velocity added per tick at zero distance.
    pub strength: f32,
}

impl Default for InteractionField {
    fn default() -> Self {
        Self {
            radius: 150.0,
            strength: 0.02,
        }
    }
}

impl InteractionField {
    /// Velocity change for a particle at `position`.
    ///
    /// Zero outside the radius and when the pointer sits exactly on the particle.
    pub fn force_at(&self, position: Vec2, pointer: Pointer) -> Vec2 {
        let offset = position - pointer.position;
        let distance = offset.length();
        if distance <= 0.0 || distance >= self.radius {
            return Vec2::ZERO;
        }

        let falloff = (self.radius - distance) / self.radius;
        offset / distance * falloff * self.strength
    }

    /// Push `particle` away from the pointer.
    pub fn apply(&self, particle: &mut Particle, pointer: Pointer) {
        particle.velocity += self.force_at(particle.position, pointer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: 1.0,
            opacity: 1.0,
            color: Color::new(0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_pushes_away_from_pointer() {
        let field = InteractionField::default();
        let mut p = at(100.0, 0.0);
        field.apply(&mut p, Pointer::new(25.0, 0.0));
        // distance 75 -> falloff 0.5
        assert!((p.velocity.x - 0.01).abs() < 1e-6);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_outside_radius_no_force() {
        let field = InteractionField::default();
        assert_eq!(field.force_at(Vec2::new(300.0, 0.0), Pointer::default()), Vec2::ZERO);
        assert_eq!(field.force_at(Vec2::new(150.0, 0.0), Pointer::default()), Vec2::ZERO);
    }

    #[test]
    fn test_pointer_on_particle_no_force() {
        let field = InteractionField::default();
        let force = field.force_at(Vec2::new(40.0, 40.0), Pointer::new(40.0, 40.0));
        assert_eq!(force, Vec2::ZERO);
        assert!(force.is_finite());
    }

    #[test]
    fn test_force_grows_toward_pointer() {
        let field = InteractionField::default();
        let near = field.force_at(Vec2::new(10.0, 0.0), Pointer::default()).length();
        let far = field.force_at(Vec2::new(100.0, 0.0), Pointer::default()).length();
        assert!(near > far);
        assert!(near <= field.strength);
    }

    #[test]
    fn test_pointer_outside_surface_is_fine() {
        let field = InteractionField::default();
        let force = field.force_at(Vec2::new(5.0, 5.0), Pointer::new(-50.0, -50.0));
        assert!(force.x > 0.0 && force.y > 0.0);
    }
}
