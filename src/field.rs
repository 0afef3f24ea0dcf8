//! The simulation context.
//!
//! A [`Field`] owns everything one animated surface needs: configuration,
//! bounds, particles, the latest pointer snapshot and the RNG. The frame
//! scheduler owns a `Field` while it runs and passes it by reference into
//! each tick; embedders that run their own loop can drive one directly.
//!
//! ```ignore
//! let mut field = Field::new(FieldConfig::default(), (800, 600))?;
//! loop {
//!     field.set_pointer(pointer);
//!     field.tick(&mut surface);
//! }
//! ```

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::interaction::Pointer;
use crate::links::render_links;
use crate::particle::ParticleSet;
use crate::physics::{self, Bounds};
use crate::render::render_particles;
use crate::surface::Surface;

/// One particle field bound to one surface.
#[derive(Debug)]
pub struct Field {
    config: FieldConfig,
    /// Configuration waiting for the next rebuild.
    next_config: Option<FieldConfig>,
    /// `None` while the surface has no usable size.
    bounds: Option<Bounds>,
    particles: ParticleSet,
    pointer: Pointer,
    rng: SmallRng,
}

impl Field {
    /// Validate `config` and spawn particles over a `size` surface.
    ///
    /// A zero-sized surface is accepted; the field stays empty and idle
    /// until [`Field::resize`] gives it a usable size.
    pub fn new(config: FieldConfig, size: (u32, u32)) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut field = Self {
            config,
            next_config: None,
            bounds: None,
            particles: ParticleSet::default(),
            pointer: Pointer::default(),
            rng,
        };
        field.rebuild(Bounds::from_size(size))?;
        Ok(field)
    }

    /// Resize the surface. Discards every particle and spawns a fresh set.
    ///
    /// Zero or negative sizes keep the current particles but suspend
    /// updates and drawing until a valid size arrives.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.rebuild(Bounds::new(width, height))
    }

    /// Replace the configuration. Takes effect at the next rebuild.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<()> {
        config.validate()?;
        self.next_config = Some(config);
        Ok(())
    }

    fn rebuild(&mut self, bounds: Option<Bounds>) -> Result<()> {
        let Some(bounds) = bounds else {
            log::warn!("surface has no usable size; particle field suspended");
            self.bounds = None;
            return Ok(());
        };

        if let Some(next) = self.next_config.take() {
            self.config = next;
        }

        self.particles = ParticleSet::initialize(
            self.config.particle_count,
            bounds,
            &self.config.colors,
            self.config.speed,
            &mut self.rng,
        )?;
        self.bounds = Some(bounds);
        log::debug!(
            "spawned {} particles over {}x{}",
            self.particles.len(),
            bounds.width(),
            bounds.height()
        );
        Ok(())
    }

    /// Replace the pointer snapshot read by the next update.
    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// Move every particle by one tick: pointer push first, then damping,
    /// re-seeding, integration and wrap. Returns `false` while suspended.
    pub fn update(&mut self) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };

        let params = self.config.step_params();
        let interaction = self.config.interaction;
        let pointer = self.pointer;
        for particle in self.particles.iter_mut() {
            interaction.apply(particle, pointer);
            physics::step(particle, bounds, &params, &mut self.rng);
        }
        true
    }

    /// Clear `surface`, then draw links and particles. Returns `false`
    /// (leaving the surface untouched) while suspended.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> bool {
        if self.bounds.is_none() {
            return false;
        }

        surface.clear();
        render_links(
            self.particles.as_slice(),
            self.config.connect_distance,
            &self.config.links,
            surface,
        );
        render_particles(&self.particles, surface);
        true
    }

    /// One full update-then-draw cycle.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.update() && self.draw(surface)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Whether the last resize left the field without a usable size.
    pub fn is_suspended(&self) -> bool {
        self.bounds.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::surface::{DrawCommand, DrawList};

    fn config() -> FieldConfig {
        FieldConfig::new().with_particle_count(25).with_seed(42)
    }

    #[test]
    fn test_new_spawns_configured_count() {
        let field = Field::new(config(), (400, 300)).unwrap();
        assert_eq!(field.particles().len(), 25);
        assert_eq!(field.bounds(), Bounds::new(400, 300));
    }

    #[test]
    fn test_new_rejects_empty_palette() {
        let err = Field::new(config().with_colors([]), (400, 300)).unwrap_err();
        assert!(matches!(err, FieldError::EmptyPalette));
    }

    #[test]
    fn test_zero_size_starts_suspended() {
        let mut field = Field::new(config(), (0, 0)).unwrap();
        assert!(field.is_suspended());
        assert!(field.particles().is_empty());

        let mut list = DrawList::new(0, 0);
        assert!(!field.tick(&mut list));
        assert!(list.commands().is_empty());

        field.resize(200, 100).unwrap();
        assert_eq!(field.particles().len(), 25);
        assert!(field.tick(&mut list));
    }

    #[test]
    fn test_invalid_resize_suspends_then_recovers() {
        let mut field = Field::new(config(), (200, 200)).unwrap();
        let before: Vec<_> = field.particles().iter().map(|p| p.position).collect();

        field.resize(-5, 100).unwrap();
        assert!(field.is_suspended());
        assert!(!field.update());
        let after: Vec<_> = field.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);

        field.resize(50, 50).unwrap();
        assert!(!field.is_suspended());
        assert_eq!(field.particles().len(), 25);
        let bounds = field.bounds().unwrap();
        assert!(field.particles().iter().all(|p| bounds.contains(p.position)));
    }

    #[test]
    fn test_reconfigure_applies_on_rebuild() {
        let mut field = Field::new(config(), (200, 200)).unwrap();
        field
            .reconfigure(config().with_particle_count(7))
            .unwrap();
        assert_eq!(field.particles().len(), 25);
        field.resize(200, 200).unwrap();
        assert_eq!(field.particles().len(), 7);
        assert_eq!(field.config().particle_count, 7);
    }

    #[test]
    fn test_reconfigure_validates() {
        let mut field = Field::new(config(), (200, 200)).unwrap();
        assert!(field.reconfigure(config().with_colors([])).is_err());
    }

    #[test]
    fn test_draw_order_links_then_particles() {
        let mut field = Field::new(config().with_connect_distance(1000.0), (100, 100)).unwrap();
        let mut list = DrawList::new(100, 100);
        assert!(field.tick(&mut list));

        let commands = list.commands();
        assert_eq!(commands[0], DrawCommand::Clear);
        let first_disc = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Disc { .. }))
            .unwrap();
        assert!(commands[1..first_disc]
            .iter()
            .all(|c| matches!(c, DrawCommand::Line { .. })));
        assert_eq!(list.discs().count(), 25);
        // every pair is within 1000 units on a 100x100 surface
        assert_eq!(list.lines().count(), 25 * 24 / 2);
    }

    #[test]
    fn test_pointer_pushes_particles() {
        let quiet = config().with_interaction(150.0, 0.0);
        let pushy = config().with_interaction(150.0, 5.0);
        let mut a = Field::new(quiet, (300, 300)).unwrap();
        let mut b = Field::new(pushy, (300, 300)).unwrap();
        let pointer = Pointer::new(150.0, 150.0);
        a.set_pointer(pointer);
        b.set_pointer(pointer);
        a.update();
        b.update();

        let moved = a
            .particles()
            .iter()
            .zip(b.particles().iter())
            .any(|(p, q)| p.velocity != q.velocity);
        assert!(moved);
    }
}
