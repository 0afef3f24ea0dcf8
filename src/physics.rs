//! Per-tick particle motion.
//!
//! One call to [`step`] damps the velocity, re-seeds components that have
//! nearly stopped, integrates with a unit time step and wraps the position
//! onto the surface torus. There is no delta-time scaling: the field moves
//! a fixed amount per frame.

use glam::Vec2;
use rand::Rng;

use crate::particle::Particle;

/// Surface extent in surface units. Both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    /// Bounds for a `width` x `height` surface, or `None` when either side is
    /// zero or negative.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        (width > 0 && height > 0).then(|| Self {
            width: width as f32,
            height: height as f32,
        })
    }

    /// Same as [`Bounds::new`] for unsigned sizes as reported by windows and painters.
    pub fn from_size((width, height): (u32, u32)) -> Option<Self> {
        Self::new(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether `p` lies in `[0, width) x [0, height)`.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }
}

/// Stepper tuning, usually taken from [`FieldConfig::step_params`](crate::FieldConfig::step_params).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    /// Re-seeded components are drawn from `[-speed/2, speed/2]`.
    pub speed: f32,
    /// Velocity multiplier applied every tick.
    pub damping: f32,
    /// Components with a smaller magnitude are re-seeded.
    pub min_speed: f32,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            speed: 0.5,
            damping: 0.99,
            min_speed: 0.1,
        }
    }
}

/// Advance one particle by one tick.
pub fn step<R: Rng + ?Sized>(particle: &mut Particle, bounds: Bounds, params: &StepParams, rng: &mut R) {
    particle.velocity *= params.damping;

    // Keep drifting: a stalled axis gets a fresh random component.
    if particle.velocity.x.abs() < params.min_speed {
        particle.velocity.x = random_component(rng, params.speed);
    }
    if particle.velocity.y.abs() < params.min_speed {
        particle.velocity.y = random_component(rng, params.speed);
    }

    particle.position += particle.velocity;
    particle.position = wrap(particle.position, bounds);
}

/// Wrap a position onto the torus, each axis independently.
///
/// Leaving past the far edge lands on `0`; leaving past `0` lands just
/// inside the far edge, so the result is always strictly below the bound.
pub fn wrap(mut position: Vec2, bounds: Bounds) -> Vec2 {
    position.x = wrap_axis(position.x, bounds.width);
    position.y = wrap_axis(position.y, bounds.height);
    position
}

fn wrap_axis(value: f32, bound: f32) -> f32 {
    if value >= bound {
        0.0
    } else if value < 0.0 {
        below(bound)
    } else {
        value
    }
}

/// Largest f32 strictly below a positive `bound`.
fn below(bound: f32) -> f32 {
    f32::from_bits(bound.to_bits() - 1)
}

/// Uniform sample from `[-speed/2, speed/2]`.
pub(crate) fn random_component<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> f32 {
    let half = speed.abs() * 0.5;
    rng.gen_range(-half..=half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn particle(position: Vec2, velocity: Vec2) -> Particle {
        Particle {
            position,
            velocity,
            size: 2.0,
            opacity: 0.5,
            color: Color::new(1.0, 1.0, 1.0),
        }
    }

    fn square(side: i32) -> Bounds {
        Bounds::new(side, side).unwrap()
    }

    #[test]
    fn test_bounds_reject_degenerate() {
        assert!(Bounds::new(0, 10).is_none());
        assert!(Bounds::new(10, -4).is_none());
        assert!(Bounds::from_size((0, 0)).is_none());
        assert!(Bounds::from_size((u32::MAX, 1)).is_some());
    }

    #[test]
    fn test_damping_applied_before_integration() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut p = particle(Vec2::new(50.0, 50.0), Vec2::new(2.0, -2.0));
        step(&mut p, square(100), &StepParams::default(), &mut rng);
        assert!((p.velocity.x - 1.98).abs() < 1e-6);
        assert!((p.velocity.y + 1.98).abs() < 1e-6);
        assert!((p.position.x - 51.98).abs() < 1e-4);
        assert!((p.position.y - 48.02).abs() < 1e-4);
    }

    #[test]
    fn test_slow_component_reseeded_independently() {
        let mut rng = SmallRng::seed_from_u64(2);
        let params = StepParams::default();
        let mut p = particle(Vec2::new(50.0, 50.0), Vec2::new(0.05, 1.0));
        step(&mut p, square(100), &params, &mut rng);
        assert!((p.velocity.y - 0.99).abs() < 1e-6);
        assert!(p.velocity.x.abs() <= params.speed * 0.5);
    }

    #[test]
    fn test_wrap_far_edge_to_zero() {
        let b = square(100);
        assert_eq!(wrap(Vec2::new(100.5, 50.0), b), Vec2::new(0.0, 50.0));
        assert_eq!(wrap(Vec2::new(10.0, 100.0), b), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_wrap_near_edge_stays_inside() {
        let b = square(100);
        let p = wrap(Vec2::new(-0.3, -7.0), b);
        assert!(p.x < 100.0 && p.x > 99.99);
        assert!(p.y < 100.0 && p.y > 99.99);
        assert!(b.contains(p));
    }

    #[test]
    fn test_wrap_axes_independent() {
        let b = Bounds::new(200, 100).unwrap();
        let p = wrap(Vec2::new(250.0, 40.0), b);
        assert_eq!(p, Vec2::new(0.0, 40.0));
    }

    #[test]
    fn test_random_component_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = random_component(&mut rng, 0.5);
            assert!((-0.25..=0.25).contains(&v));
        }
        assert_eq!(random_component(&mut rng, 0.0), 0.0);
    }
}
