//! Particle records and the particle store.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::color::Color;
use crate::error::{FieldError, Result};
use crate::physics::{random_component, Bounds};

/// One drifting point.
///
/// `size`, `opacity` and `color` are fixed when the particle is spawned;
/// position and velocity change every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rendering radius in surface units.
    pub size: f32,
    /// Alpha applied to the whole disc, in (0, 1].
    pub opacity: f32,
    pub color: Color,
}

/// The particles hosted by one surface.
///
/// Always rebuilt as a whole (see [`ParticleSet::initialize`]); nothing
/// adds or removes single particles.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    /// Spawn `count` particles uniformly over `bounds`.
    ///
    /// - velocity components in `[-speed/2, speed/2]`
    /// - size in `[1, 4)`
    /// - opacity in `[0.2, 0.7)`
    /// - color picked uniformly from `palette`
    pub fn initialize<R: Rng + ?Sized>(
        count: usize,
        bounds: Bounds,
        palette: &[Color],
        speed: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if palette.is_empty() {
            return Err(FieldError::EmptyPalette);
        }

        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let position = Vec2::new(
                rng.gen_range(0.0..bounds.width()),
                rng.gen_range(0.0..bounds.height()),
            );
            let velocity = Vec2::new(random_component(rng, speed), random_component(rng, speed));
            let size = rng.gen_range(1.0..4.0);
            let opacity = rng.gen_range(0.2..0.7);
            let color = *palette.choose(rng).ok_or(FieldError::EmptyPalette)?;

            particles.push(Particle {
                position,
                velocity,
                size,
                opacity,
                color,
            });
        }

        Ok(Self { particles })
    }

    /// Wrap existing particles, e.g. a hand-placed layout.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::default_palette;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_initialize_count_and_ranges() {
        let mut rng = SmallRng::seed_from_u64(11);
        let bounds = Bounds::new(640, 480).unwrap();
        let palette = default_palette();
        let set = ParticleSet::initialize(200, bounds, &palette, 0.5, &mut rng).unwrap();

        assert_eq!(set.len(), 200);
        for p in &set {
            assert!(bounds.contains(p.position));
            assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
            assert!((1.0..4.0).contains(&p.size));
            assert!((0.2..0.7).contains(&p.opacity));
            assert!(palette.contains(&p.color));
        }
    }

    #[test]
    fn test_initialize_zero() {
        let mut rng = SmallRng::seed_from_u64(0);
        let bounds = Bounds::new(10, 10).unwrap();
        let set = ParticleSet::initialize(0, bounds, &default_palette(), 0.5, &mut rng).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_empty_palette_is_error() {
        let mut rng = SmallRng::seed_from_u64(0);
        let bounds = Bounds::new(10, 10).unwrap();
        let err = ParticleSet::initialize(5, bounds, &[], 0.5, &mut rng).unwrap_err();
        assert!(matches!(err, FieldError::EmptyPalette));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let bounds = Bounds::new(300, 200).unwrap();
        let palette = default_palette();
        let a = ParticleSet::initialize(30, bounds, &palette, 0.5, &mut SmallRng::seed_from_u64(99)).unwrap();
        let b = ParticleSet::initialize(30, bounds, &palette, 0.5, &mut SmallRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }
}
