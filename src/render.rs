//! Particle drawing.

use crate::particle::Particle;
use crate::surface::Surface;

/// Draw one particle as a soft disc: its color at the center fading to
/// transparent at `size`, scaled by the particle's opacity.
///
/// The surface's global alpha is restored afterwards, so the opacity never
/// leaks into the next draw call.
pub fn render_particle<S: Surface + ?Sized>(particle: &Particle, surface: &mut S) {
    let saved = surface.global_alpha();
    surface.set_global_alpha(particle.opacity);
    surface.fill_radial_gradient(particle.position, particle.size, particle.color);
    surface.set_global_alpha(saved);
}

/// Draw every particle in order.
pub fn render_particles<'a, S, I>(particles: I, surface: &mut S)
where
    S: Surface + ?Sized,
    I: IntoIterator<Item = &'a Particle>,
{
    for particle in particles {
        render_particle(particle, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::surface::{DrawCommand, DrawList};
    use glam::Vec2;

    fn dot(x: f32, opacity: f32) -> Particle {
        Particle {
            position: Vec2::new(x, 5.0),
            velocity: Vec2::ZERO,
            size: 3.0,
            opacity,
            color: Color::new(0.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_disc_uses_particle_opacity() {
        let mut list = DrawList::new(20, 20);
        render_particle(&dot(4.0, 0.4), &mut list);
        assert_eq!(
            list.commands(),
            &[DrawCommand::Disc {
                center: Vec2::new(4.0, 5.0),
                radius: 3.0,
                color: Color::new(0.0, 1.0, 1.0),
                alpha: 0.4,
            }]
        );
    }

    #[test]
    fn test_global_alpha_restored() {
        let mut list = DrawList::new(20, 20);
        list.set_global_alpha(0.8);
        render_particle(&dot(1.0, 0.3), &mut list);
        assert_eq!(list.global_alpha(), 0.8);
    }

    #[test]
    fn test_opacity_does_not_leak_between_particles() {
        let mut list = DrawList::new(20, 20);
        render_particles(&[dot(1.0, 0.2), dot(2.0, 0.6)], &mut list);

        let alphas: Vec<f32> = list
            .discs()
            .map(|c| match c {
                DrawCommand::Disc { alpha, .. } => *alpha,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(alphas, vec![0.2, 0.6]);
        assert_eq!(list.global_alpha(), 1.0);
    }
}
