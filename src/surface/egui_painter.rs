//! Draw the field into an egui [`Painter`](egui::Painter).
//!
//! Lets an egui app put the field behind its own widgets, the way a login
//! or register screen would:
//!
//! ```ignore
//! egui::CentralPanel::default().show(ctx, |ui| {
//!     let mut surface = EguiSurface::new(ui.painter());
//!     field.tick(&mut surface);
//!     ctx.request_repaint();
//! });
//! ```
//!
//! Coordinates are relative to the painter's clip rect. `clear` is a no-op
//! because egui rebuilds its shape list every frame anyway.

use egui::epaint::{Mesh, Vertex, WHITE_UV};
use egui::{Color32, Painter, Pos2, Shape, Stroke};
use glam::Vec2;

use crate::color::Color;
use crate::surface::Surface;

/// Triangles per disc.
const DISC_SEGMENTS: u32 = 24;

pub struct EguiSurface<'a> {
    painter: &'a Painter,
    global_alpha: f32,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a Painter) -> Self {
        Self {
            painter,
            global_alpha: 1.0,
        }
    }

    fn to_pos(&self, p: Vec2) -> Pos2 {
        self.painter.clip_rect().min + egui::vec2(p.x, p.y)
    }
}

fn color32(color: Color, alpha: f32) -> Color32 {
    let [r, g, b] = color.to_rgb8();
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Triangle fan with `color` at the center and a transparent rim.
fn disc_mesh(center: Pos2, radius: f32, color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.vertices.push(Vertex {
        pos: center,
        uv: WHITE_UV,
        color,
    });
    for i in 0..DISC_SEGMENTS {
        let angle = i as f32 / DISC_SEGMENTS as f32 * std::f32::consts::TAU;
        mesh.vertices.push(Vertex {
            pos: center + radius * egui::vec2(angle.cos(), angle.sin()),
            uv: WHITE_UV,
            color: Color32::TRANSPARENT,
        });
    }
    for i in 0..DISC_SEGMENTS {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % DISC_SEGMENTS);
    }
    mesh
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> (u32, u32) {
        let rect = self.painter.clip_rect();
        (rect.width().max(0.0) as u32, rect.height().max(0.0) as u32)
    }

    fn clear(&mut self) {}

    fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Color) {
        let mesh = disc_mesh(self.to_pos(center), radius, color32(color, self.global_alpha));
        self.painter.add(Shape::mesh(mesh));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f32, width: f32) {
        let stroke = Stroke::new(width, color32(color, alpha * self.global_alpha));
        self.painter
            .line_segment([self.to_pos(from), self.to_pos(to)], stroke);
    }
}
