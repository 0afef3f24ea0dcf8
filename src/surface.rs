//! The drawing surface abstraction.
//!
//! The field only needs four primitives: clear, a radial-gradient disc, a
//! straight line with alpha, and a global alpha that scales everything
//! drawn while it is set. [`DrawList`] records them for the GPU backend
//! and for tests; `EguiSurface` (feature `egui`) paints them directly.

use glam::Vec2;

use crate::color::Color;

#[cfg(feature = "egui")]
pub mod egui_painter;

/// A 2D canvas the field can draw on.
pub trait Surface {
    /// Size in surface units.
    fn size(&self) -> (u32, u32);

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Alpha multiplier applied to every following draw call.
    fn global_alpha(&self) -> f32;

    fn set_global_alpha(&mut self, alpha: f32);

    /// Disc of `radius` around `center`, `color` at the center fading to
    /// fully transparent at the rim.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Color);

    /// Line from `from` to `to`.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f32, width: f32);
}

/// One recorded draw call. Alpha values already include the global alpha
/// that was set when the call was made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear,
    Disc {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        alpha: f32,
        width: f32,
    },
}

/// A surface that records draw calls instead of painting them.
#[derive(Debug, Clone)]
pub struct DrawList {
    size: (u32, u32),
    global_alpha: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            global_alpha: 1.0,
            commands: Vec::new(),
        }
    }

    /// Track a resized target.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Everything recorded since the last [`Surface::clear`].
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn discs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for DrawList {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
            alpha: self.global_alpha,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f32, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            alpha: alpha * self.global_alpha,
            width,
        });
    }
}
