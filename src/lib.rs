//! # driftfield
//!
//! An ambient 2D particle field: soft colored dots drifting across a
//! surface, pushed away by the pointer, with faint lines between close
//! neighbors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> driftfield::Result<()> {
//!     AmbientField::new()
//!         .with_config(
//!             FieldConfig::new()
//!                 .with_particle_count(40)
//!                 .with_connect_distance(120.0),
//!         )
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Ticks
//!
//! Every frame runs one tick. A tick:
//!
//! 1. pushes particles near the pointer away from it,
//! 2. damps velocity and re-seeds components that have nearly stopped,
//! 3. moves each particle and wraps it around the edges,
//! 4. clears the surface, draws links, then draws particles.
//!
//! Motion is per tick, not per second, so the field runs at the display's
//! frame rate.
//!
//! ### Surfaces
//!
//! Drawing goes through the [`Surface`] trait. [`DrawList`] records calls
//! (the windowed runner replays them on the GPU); with the `egui` feature,
//! `EguiSurface` paints straight into an egui `Painter`.
//!
//! ### Embedding
//!
//! [`Field`] is the whole simulation and can be ticked from any loop.
//! [`FrameScheduler`] adds the start/cancel lifecycle on top of a
//! [`FrameSource`], and takes pointer and resize events through an
//! [`InputSender`] from any thread.
//!
//! ## Configuration
//!
//! [`FieldConfig`] round-trips through JSON with camelCase keys:
//!
//! ```json
//! {
//!   "particleCount": 40,
//!   "colors": ["#6B21B6", "#06B6D4", "#FF7A59"],
//!   "speed": 0.5,
//!   "connectDistance": 120
//! }
//! ```

mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod input;
pub mod interaction;
pub mod links;
pub mod particle;
pub mod physics;
pub mod render;
pub mod scheduler;
pub mod surface;
pub mod time;

pub use app::{AmbientField, RedrawFrames};
pub use color::Color;
pub use config::FieldConfig;
pub use error::{FieldError, GpuError, Result};
pub use field::Field;
pub use glam::Vec2;
pub use input::{InputEvent, InputSender};
pub use interaction::{InteractionField, Pointer};
pub use links::{LinkStrategy, LinkStyle};
pub use particle::{Particle, ParticleSet};
pub use physics::{Bounds, StepParams};
pub use scheduler::{FrameId, FrameScheduler, FrameSource, ManualFrames, SchedulerState};
pub use surface::{DrawCommand, DrawList, Surface};
#[cfg(feature = "egui")]
pub use surface::egui_painter::EguiSurface;

/// Run a field in its own window with `config` until the window closes.
pub fn run(config: FieldConfig) -> Result<()> {
    AmbientField::new().with_config(config).run()
}

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::AmbientField;
    pub use crate::color::Color;
    pub use crate::config::FieldConfig;
    pub use crate::field::Field;
    pub use crate::interaction::Pointer;
    pub use crate::links::{LinkStrategy, LinkStyle};
    pub use crate::scheduler::{FrameScheduler, FrameSource, ManualFrames};
    pub use crate::surface::{DrawList, Surface};
    pub use crate::Vec2;
    #[cfg(feature = "egui")]
    pub use crate::surface::egui_painter::EguiSurface;
    #[cfg(feature = "egui")]
    pub use egui;
}
