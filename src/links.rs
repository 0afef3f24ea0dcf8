//! Connection lines between nearby particles.
//!
//! Every unordered pair `(i, j)` with `i < j` closer than the threshold gets
//! one line whose alpha fades linearly from `opacity` at zero distance to
//! nothing at the threshold.
//!
//! The exhaustive scan is O(n²), which is fine at the intended population
//! of a few hundred particles. [`LinkStrategy::Grid`] buckets particles into
//! threshold-sized cells first; it produces exactly the same links in
//! exactly the same order.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::color::Color;
use crate::particle::Particle;
use crate::surface::Surface;

/// How candidate pairs are found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkStrategy {
    /// Test every pair.
    #[default]
    Exhaustive,
    /// Only test pairs in neighboring grid cells.
    Grid,
}

/// Appearance of connection lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
    pub color: Color,
    /// Alpha of a link between two coincident particles.
    pub opacity: f32,
    /// Stroke width in surface units.
    pub width: f32,
    pub strategy: LinkStrategy,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            color: Color::from_rgb8(107, 33, 182),
            opacity: 0.15,
            width: 1.0,
            strategy: LinkStrategy::Exhaustive,
        }
    }
}

/// One pair of linked particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub i: usize,
    pub j: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

/// Alpha for two particles `distance` apart. Zero at or beyond `threshold`.
#[inline]
pub fn link_alpha(distance: f32, threshold: f32, opacity: f32) -> f32 {
    (1.0 - distance / threshold).max(0.0) * opacity
}

/// All links, ordered by `i` then `j`.
pub fn find_links(particles: &[Particle], threshold: f32, style: &LinkStyle) -> Vec<Link> {
    let pairs = match style.strategy {
        LinkStrategy::Exhaustive => exhaustive_pairs(particles, threshold),
        LinkStrategy::Grid => grid_pairs(particles, threshold),
    };

    pairs
        .into_iter()
        .map(|(i, j, distance)| Link {
            i,
            j,
            from: particles[i].position,
            to: particles[j].position,
            alpha: link_alpha(distance, threshold, style.opacity),
        })
        .collect()
}

/// Draw every link onto `surface`.
pub fn render_links<S: Surface + ?Sized>(
    particles: &[Particle],
    threshold: f32,
    style: &LinkStyle,
    surface: &mut S,
) {
    for link in find_links(particles, threshold, style) {
        surface.stroke_line(link.from, link.to, style.color, link.alpha, style.width);
    }
}

fn exhaustive_pairs(particles: &[Particle], threshold: f32) -> Vec<(usize, usize, f32)> {
    let mut pairs = Vec::new();
    for (i, a) in particles.iter().enumerate() {
        for (j, b) in particles.iter().enumerate().skip(i + 1) {
            let distance = (a.position - b.position).length();
            if distance < threshold {
                pairs.push((i, j, distance));
            }
        }
    }
    pairs
}

fn grid_pairs(particles: &[Particle], threshold: f32) -> Vec<(usize, usize, f32)> {
    // Float-to-int casts saturate, so tiny thresholds pin far cells to the
    // edge of the i64 range; neighbor lookups must not step past it.
    let cell_of = |p: Vec2| {
        (
            (p.x / threshold).floor() as i64,
            (p.y / threshold).floor() as i64,
        )
    };

    let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, p) in particles.iter().enumerate() {
        cells.entry(cell_of(p.position)).or_default().push(i);
    }

    let mut pairs = Vec::new();
    for (i, a) in particles.iter().enumerate() {
        let (cx, cy) = cell_of(a.position);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let (Some(nx), Some(ny)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                let Some(bucket) = cells.get(&(nx, ny)) else {
                    continue;
                };
                for &j in bucket {
                    if j <= i {
                        continue;
                    }
                    let distance = (a.position - particles[j].position).length();
                    if distance < threshold {
                        pairs.push((i, j, distance));
                    }
                }
            }
        }
    }

    pairs.sort_unstable_by_key(|&(i, j, _)| (i, j));
    pairs
}
